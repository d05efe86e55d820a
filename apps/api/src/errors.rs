use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

/// Upper bound on diagnostic text echoed back to callers.
pub const MAX_DETAIL_CHARS: usize = 1500;

/// Summary used for unexpected failures on the PDF route.
pub const GENERATE_FAILED: &str = "Failed to generate resume";
/// Summary used for unexpected failures on the LaTeX source route.
pub const LATEX_FAILED: &str = "Failed to get LaTeX code";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every variant renders as `{"error": <summary>, "details": <diagnostic>}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Caller identity missing or malformed: {0}")]
    InvalidCaller(String),

    #[error("No resume linked to user")]
    NoResumeLinked,

    #[error("Resume not found")]
    ResumeNotFound,

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Remote metadata fetch failed: {0}")]
    RemoteMetadataFailed(String),

    #[error("Remote publish failed: {0}")]
    RemotePublishFailed(String),

    #[error("Compilation request failed: {0}")]
    CompilationRequestFailed(String),

    #[error("Compilation timed out: {0}")]
    CompilationTimeout(String),

    #[error("Compiler returned an error envelope")]
    CompilationReturnedError(Value),

    #[error("Compiler did not return a PDF")]
    CompilationNotPdf(String),

    #[error("{summary}: {details}")]
    Unexpected {
        summary: &'static str,
        details: String,
    },
}

impl AppError {
    pub fn unexpected(summary: &'static str, err: impl std::fmt::Display) -> Self {
        AppError::Unexpected {
            summary,
            details: err.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidCaller(_) => StatusCode::UNAUTHORIZED,
            AppError::NoResumeLinked | AppError::InvalidDocument(_) => StatusCode::BAD_REQUEST,
            AppError::ResumeNotFound => StatusCode::NOT_FOUND,
            AppError::CompilationRequestFailed(_) | AppError::CompilationTimeout(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::RemoteMetadataFailed(_)
            | AppError::RemotePublishFailed(_)
            | AppError::CompilationReturnedError(_)
            | AppError::CompilationNotPdf(_)
            | AppError::Unexpected { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn summary(&self) -> &'static str {
        match self {
            AppError::Unauthorized | AppError::InvalidCaller(_) => "Authentication required",
            AppError::NoResumeLinked => "No resume ID found for user",
            AppError::ResumeNotFound => "Resume not found in database",
            AppError::InvalidDocument(_) => "Invalid LaTeX content",
            AppError::RemoteMetadataFailed(_) | AppError::RemotePublishFailed(_) => {
                "GitHub upload failed"
            }
            AppError::CompilationRequestFailed(_) | AppError::CompilationTimeout(_) => {
                "Failed to fetch compilation result"
            }
            AppError::CompilationReturnedError(_) => "LaTeX compilation returned error",
            AppError::CompilationNotPdf(_) => "LaTeX compilation did not return a PDF",
            AppError::Unexpected { summary, .. } => *summary,
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            AppError::Unauthorized | AppError::NoResumeLinked | AppError::ResumeNotFound => None,
            AppError::InvalidCaller(msg)
            | AppError::InvalidDocument(msg)
            | AppError::RemoteMetadataFailed(msg)
            | AppError::RemotePublishFailed(msg)
            | AppError::CompilationRequestFailed(msg)
            | AppError::CompilationTimeout(msg)
            | AppError::CompilationNotPdf(msg)
            | AppError::Unexpected { details: msg, .. } => {
                Some(Value::String(truncate_chars(msg, MAX_DETAIL_CHARS)))
            }
            AppError::CompilationReturnedError(parsed) => {
                let serialized = parsed.to_string();
                if serialized.chars().count() > MAX_DETAIL_CHARS {
                    Some(Value::String(truncate_chars(&serialized, MAX_DETAIL_CHARS)))
                } else {
                    Some(parsed.clone())
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{} ({}): {self}", self.summary(), status);
        } else {
            tracing::warn!("{} ({}): {self}", self.summary(), status);
        }

        let body = match self.details() {
            Some(details) => json!({ "error": self.summary(), "details": details }),
            None => json!({ "error": self.summary() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Returns at most `max` characters of `text`, cut on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
