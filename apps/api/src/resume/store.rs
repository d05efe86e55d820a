//! Persistence seam for users and their resume records.
//!
//! Schema:
//! - `users(id uuid, resume_id uuid null, is_resume_file bool)`
//! - `resumes(id uuid, intro jsonb, edu jsonb, exp jsonb, projects jsonb,
//!   ach jsonb, skills jsonb, profiles jsonb, updated_at timestamptz)`

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::resume::{ResumeRecord, ResumeRow};
use crate::models::user::UserRow;

#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn find_user(&self, user_id: Uuid) -> Result<Option<UserRow>, sqlx::Error>;

    async fn find_resume(&self, resume_id: Uuid) -> Result<Option<ResumeRecord>, sqlx::Error>;

    /// Records that `<user_id>.tex` now exists in the remote store.
    async fn mark_remote_file(&self, user_id: Uuid) -> Result<(), sqlx::Error>;
}

pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn find_user(&self, user_id: Uuid) -> Result<Option<UserRow>, sqlx::Error> {
        sqlx::query_as::<_, UserRow>("SELECT id, resume_id, is_resume_file FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_resume(&self, resume_id: Uuid) -> Result<Option<ResumeRecord>, sqlx::Error> {
        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            SELECT id, intro, edu, exp, projects, ach, skills, profiles, updated_at
            FROM resumes
            WHERE id = $1
            "#,
        )
        .bind(resume_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = &row {
            tracing::debug!("Loaded resume {} (updated {})", row.id, row.updated_at);
        }
        Ok(row.map(ResumeRecord::from))
    }

    async fn mark_remote_file(&self, user_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET is_resume_file = TRUE WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
