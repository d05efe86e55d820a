use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The authenticated caller as seen by the resume pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    /// Linked resume record, if the user has created one.
    pub resume_id: Option<Uuid>,
    /// Whether `<id>.tex` has already been created in the remote store.
    pub is_resume_file: bool,
}
