//! The two resume operations.
//!
//! Flow (PDF):    find user → find resume → assemble → validate → publish →
//!                compile → classify.
//! Flow (source): find user → find resume → assemble → validate.
//!
//! Every external failure ends the request immediately. A published file is
//! left in place when compilation later fails.

use bytes::Bytes;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::compiler::{classify, CompilationResult, CompileError};
use crate::errors::{AppError, GENERATE_FAILED, LATEX_FAILED};
use crate::latex::{assemble_document, validate_document};
use crate::models::resume::ResumeRecord;
use crate::state::AppState;

#[derive(Debug)]
pub enum PdfOutcome {
    Pdf { bytes: Bytes, filename: String },
    /// The compiler answered with a download link instead of bytes.
    DownloadUrl(String),
}

impl From<CompileError> for AppError {
    fn from(err: CompileError) -> Self {
        match err {
            CompileError::Timeout(_) => AppError::CompilationTimeout(err.to_string()),
            CompileError::Request(msg) => AppError::CompilationRequestFailed(msg),
        }
    }
}

/// Renders, publishes and compiles the caller's resume.
pub async fn render_pdf(state: &AppState, user_id: Uuid) -> Result<PdfOutcome, AppError> {
    let user = state
        .resumes
        .find_user(user_id)
        .await
        .map_err(|e| AppError::unexpected(GENERATE_FAILED, e))?
        .ok_or(AppError::Unauthorized)?;
    info!("User ID: {}, Resume ID: {:?}", user.id, user.resume_id);

    let resume_id = user.resume_id.ok_or(AppError::NoResumeLinked)?;
    let resume = load_resume(state, resume_id, GENERATE_FAILED).await?;
    let document = assemble_validated(&resume)?;
    info!("Assembled resume {} ({} bytes of LaTeX)", resume.id, document.len());

    let file = state
        .publisher
        .publish(state.resumes.as_ref(), user_id, &document)
        .await?;

    let response = state.compiler.compile(&file).await.map_err(|e| {
        error!("Error fetching compilation for {}: {e}", file.path);
        AppError::from(e)
    })?;

    match classify(&response) {
        CompilationResult::Pdf(bytes) => {
            info!("Compiled {} into {} byte PDF", file.path, bytes.len());
            Ok(PdfOutcome::Pdf {
                bytes,
                filename: format!("resume_{user_id}.pdf"),
            })
        }
        CompilationResult::RedirectUrl(url) => {
            info!("Compiler returned download URL for {}", file.path);
            Ok(PdfOutcome::DownloadUrl(url))
        }
        CompilationResult::StructuredError(parsed) => {
            error!("Compiler returned JSON error: {parsed}");
            Err(AppError::CompilationReturnedError(parsed))
        }
        CompilationResult::OpaqueError(text) => {
            error!(
                "Compiler returned non-PDF response (content-type: {}, {} bytes)",
                response.content_type.as_deref().unwrap_or("<none>"),
                response.body.len()
            );
            Err(AppError::CompilationNotPdf(text))
        }
    }
}

/// Assembles and validates the caller's resume without publishing it.
pub async fn latex_source(state: &AppState, user_id: Uuid) -> Result<String, AppError> {
    let user = state
        .resumes
        .find_user(user_id)
        .await
        .map_err(|e| AppError::unexpected(LATEX_FAILED, e))?
        .ok_or(AppError::Unauthorized)?;

    // Nothing linked reads as nothing found on the source-only route.
    let resume_id = user.resume_id.ok_or(AppError::ResumeNotFound)?;
    let resume = load_resume(state, resume_id, LATEX_FAILED).await?;
    assemble_validated(&resume)
}

async fn load_resume(
    state: &AppState,
    resume_id: Uuid,
    summary: &'static str,
) -> Result<ResumeRecord, AppError> {
    state
        .resumes
        .find_resume(resume_id)
        .await
        .map_err(|e| AppError::unexpected(summary, e))?
        .ok_or_else(|| {
            warn!("Resume not found in database for ID: {resume_id}");
            AppError::ResumeNotFound
        })
}

fn assemble_validated(resume: &ResumeRecord) -> Result<String, AppError> {
    let document = assemble_document(resume);
    validate_document(&document).map_err(|reason| {
        error!("Invalid LaTeX content: {reason}");
        AppError::InvalidDocument(reason)
    })?;
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_maps_to_timeout_variant() {
        let err = AppError::from(CompileError::Timeout(std::time::Duration::from_secs(120)));
        match err {
            AppError::CompilationTimeout(msg) => assert!(msg.contains("120s")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_transport_failure_keeps_message() {
        let err = AppError::from(CompileError::Request("dns error".into()));
        assert!(matches!(err, AppError::CompilationRequestFailed(ref m) if m == "dns error"));
    }

    #[test]
    fn test_assemble_validated_accepts_empty_record() {
        let doc = assemble_validated(&ResumeRecord::default()).unwrap();
        assert!(doc.contains("\\begin{document}"));
    }
}
