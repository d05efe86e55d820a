pub mod health;

use axum::{routing::get, Router};

use crate::resume::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route("/api/v1/resume/pdf", get(handlers::handle_get_resume_pdf))
        .route("/api/v1/resume/latex", get(handlers::handle_get_latex))
        .with_state(state)
}
