use std::sync::Arc;

use crate::compiler::Compiler;
use crate::publishing::Publisher;
use crate::resume::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Users and resume records. Postgres in production.
    pub resumes: Arc<dyn ResumeStore>,
    /// Writes assembled sources to the GitHub repository.
    pub publisher: Arc<Publisher>,
    pub compiler: Arc<dyn Compiler>,
}
