//! LaTeX compilation-as-a-service client.
//!
//! The compiler clones the published repository, builds the target file and
//! answers with either the PDF itself, a JSON envelope, or an HTML/text log.
//! The response is returned raw; `classifier` decides what it actually is.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header::CONTENT_TYPE, Client, Url};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::CompilerConfig;
use crate::errors::{truncate_chars, MAX_DETAIL_CHARS};
use crate::github::RemoteFileHandle;

pub mod classifier;

pub use classifier::{classify, CompilationResult};

/// Fixed command the compiler runs on the target file.
pub const COMPILE_COMMAND: &str = "pdflatex";

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Compiler did not answer within {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("{0}")]
    Request(String),
}

/// Raw compiler answer. `content_type` is advisory only.
#[derive(Debug, Clone)]
pub struct CompileResponse {
    pub content_type: Option<String>,
    pub body: Bytes,
}

#[async_trait]
pub trait Compiler: Send + Sync {
    async fn compile(&self, file: &RemoteFileHandle) -> Result<CompileResponse, CompileError>;
}

#[derive(Clone)]
pub struct LatexOnlineClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl LatexOnlineClient {
    pub fn new(config: &CompilerConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(config.timeout).build()?,
            base_url: config.base_url.clone(),
            timeout: config.timeout,
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> CompileError {
        if err.is_timeout() {
            CompileError::Timeout(self.timeout)
        } else {
            CompileError::Request(err.to_string())
        }
    }
}

#[async_trait]
impl Compiler for LatexOnlineClient {
    async fn compile(&self, file: &RemoteFileHandle) -> Result<CompileResponse, CompileError> {
        let url = compile_url(&self.base_url, file)?;
        info!("Fetching compilation from: {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(CompileError::Request(format!(
                "Compiler responded with status {status}: {}",
                truncate_chars(&text, MAX_DETAIL_CHARS)
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        debug!(
            "Compiler answered {} bytes (content-type: {})",
            body.len(),
            content_type.as_deref().unwrap_or("<none>")
        );

        Ok(CompileResponse { content_type, body })
    }
}

/// `<base>/compile?git=<repo url>&target=<path>&command=pdflatex`
pub fn compile_url(base_url: &str, file: &RemoteFileHandle) -> Result<Url, CompileError> {
    Url::parse_with_params(
        &format!("{base_url}/compile"),
        &[
            ("git", file.repository_url().as_str()),
            ("target", file.path.as_str()),
            ("command", COMPILE_COMMAND),
        ],
    )
    .map_err(|e| CompileError::Request(format!("Invalid compiler URL: {e}")))
}
