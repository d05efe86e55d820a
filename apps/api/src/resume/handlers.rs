//! Axum route handlers for the Resume API.

use axum::{
    body::Body,
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::errors::AppError;
use crate::resume::pipeline::{latex_source, render_pdf, PdfOutcome};
use crate::state::AppState;

/// Identity of the already-authenticated caller.
#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// A missing or unparsable `user_id` is an unidentified caller.
fn caller(query: Result<Query<UserIdQuery>, QueryRejection>) -> Result<Uuid, AppError> {
    query
        .map(|Query(params)| params.user_id)
        .map_err(|rejection| AppError::InvalidCaller(rejection.body_text()))
}

/// GET /api/v1/resume/pdf
///
/// Assembles the caller's resume, publishes it to GitHub and returns the
/// compiled PDF as an attachment (or `{"pdfUrl": ...}` when the compiler
/// hands back a download link).
pub async fn handle_get_resume_pdf(
    State(state): State<AppState>,
    query: Result<Query<UserIdQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let user_id = caller(query)?;
    match render_pdf(&state, user_id).await? {
        PdfOutcome::Pdf { bytes, filename } => Ok(pdf_response(bytes, &filename)),
        PdfOutcome::DownloadUrl(url) => Ok(Json(json!({ "pdfUrl": url })).into_response()),
    }
}

/// GET /api/v1/resume/latex
///
/// Returns the assembled LaTeX source. Nothing is published or compiled.
pub async fn handle_get_latex(
    State(state): State<AppState>,
    query: Result<Query<UserIdQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let user_id = caller(query)?;
    let latex = latex_source(&state, user_id).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        latex,
    )
        .into_response())
}

fn pdf_response(bytes: Bytes, filename: &str) -> Response {
    let len = bytes.len();
    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = StatusCode::OK;

    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/pdf"),
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));

    let safe_name = filename.replace('"', "'");
    if let Ok(value) = HeaderValue::from_str(&format!("attachment; filename=\"{safe_name}\"")) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    response
}
