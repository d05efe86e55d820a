//! Sniffs a compiler response into one of four outcomes.
//!
//! Order is strict: PDF magic bytes win over everything (including a declared
//! `text/html` or `application/octet-stream` content type), then a JSON parse,
//! then the opaque-text fallback.

use bytes::Bytes;
use serde_json::Value;

use crate::compiler::CompileResponse;
use crate::errors::{truncate_chars, MAX_DETAIL_CHARS};

pub const PDF_MAGIC: &[u8; 4] = b"%PDF";

#[derive(Debug, Clone, PartialEq)]
pub enum CompilationResult {
    /// Genuine PDF bytes.
    Pdf(Bytes),
    /// `{"status":"success","download":<url>}` envelope.
    RedirectUrl(String),
    /// Any other JSON body, kept as parsed.
    StructuredError(Value),
    /// Neither PDF nor JSON; at most `MAX_DETAIL_CHARS` of the decoded text.
    OpaqueError(String),
}

pub fn classify(response: &CompileResponse) -> CompilationResult {
    let body = &response.body;
    if body.starts_with(PDF_MAGIC) {
        return CompilationResult::Pdf(body.clone());
    }

    let text = String::from_utf8_lossy(body);
    match serde_json::from_str::<Value>(&text) {
        Ok(parsed) => {
            if let Some(url) = success_download(&parsed) {
                return CompilationResult::RedirectUrl(url.to_string());
            }
            if parsed.is_null() {
                return CompilationResult::StructuredError(Value::String(text.into_owned()));
            }
            CompilationResult::StructuredError(parsed)
        }
        Err(_) => CompilationResult::OpaqueError(truncate_chars(&text, MAX_DETAIL_CHARS)),
    }
}

/// Only a non-empty string counts as a download link.
fn success_download(parsed: &Value) -> Option<&str> {
    if parsed.get("status")?.as_str()? != "success" {
        return None;
    }
    parsed
        .get("download")?
        .as_str()
        .filter(|url| !url.is_empty())
}
