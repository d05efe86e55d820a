//! GitHub contents API client. Resume sources are published here.
//!
//! Only the three calls the publisher needs are exposed: read a file's
//! metadata (for its blob sha), create a file and update a file. Content is
//! passed through already base64-encoded; this module never re-encodes it.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::GitHubConfig;

const GITHUB_WEB_URL: &str = "https://github.com";
const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("File {path} not found in {owner}/{repo}")]
    NotFound {
        owner: String,
        repo: String,
        path: String,
    },
}

impl GitHubError {
    /// GitHub answers a create on an existing path with 422 and a message
    /// complaining that no `sha` was supplied.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, GitHubError::Api { status: 422, message } if message.contains("sha"))
    }
}

/// Identifies one file in one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFileHandle {
    pub owner: String,
    pub repo: String,
    pub path: String,
}

impl RemoteFileHandle {
    /// `<owner>/<repo>/<user_id>.tex`
    pub fn for_user(owner: &str, repo: &str, user_id: impl std::fmt::Display) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            path: format!("{user_id}.tex"),
        }
    }

    /// Public clone URL of the repository holding the file.
    pub fn repository_url(&self) -> String {
        format!("{GITHUB_WEB_URL}/{}/{}", self.owner, self.repo)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileMetadata {
    pub sha: String,
}

#[derive(Debug, Serialize)]
struct PutContentsRequest<'a> {
    message: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct PutContentsResponse {
    content: Option<PutContentsFile>,
}

#[derive(Debug, Deserialize)]
struct PutContentsFile {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GitHubErrorBody {
    message: String,
}

/// The remote content store as the publisher sees it.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn read_metadata(&self, file: &RemoteFileHandle) -> Result<FileMetadata, GitHubError>;

    async fn create(
        &self,
        file: &RemoteFileHandle,
        content_b64: &str,
        message: &str,
    ) -> Result<(), GitHubError>;

    async fn update(
        &self,
        file: &RemoteFileHandle,
        content_b64: &str,
        message: &str,
        sha: &str,
    ) -> Result<(), GitHubError>;
}

#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    api_url: String,
    access_token: String,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig) -> Result<Self, GitHubError> {
        Ok(Self {
            client: Client::builder().user_agent(USER_AGENT).build()?,
            api_url: config.api_url.clone(),
            access_token: config.access_token.clone(),
        })
    }

    fn contents_url(&self, file: &RemoteFileHandle) -> String {
        contents_url(&self.api_url, file)
    }

    async fn put(
        &self,
        file: &RemoteFileHandle,
        body: &PutContentsRequest<'_>,
    ) -> Result<(), GitHubError> {
        let response = self
            .client
            .put(self.contents_url(file))
            .bearer_auth(&self.access_token)
            .header(reqwest::header::ACCEPT, GITHUB_ACCEPT)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status, response.text().await.unwrap_or_default()));
        }

        let written: PutContentsResponse = response.json().await?;
        debug!(
            "GitHub wrote {}/{}/{}",
            file.owner,
            file.repo,
            written.content.map(|c| c.name).unwrap_or_default()
        );
        Ok(())
    }
}

#[async_trait]
impl ContentStore for GitHubClient {
    async fn read_metadata(&self, file: &RemoteFileHandle) -> Result<FileMetadata, GitHubError> {
        let response = self
            .client
            .get(self.contents_url(file))
            .bearer_auth(&self.access_token)
            .header(reqwest::header::ACCEPT, GITHUB_ACCEPT)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(GitHubError::NotFound {
                owner: file.owner.clone(),
                repo: file.repo.clone(),
                path: file.path.clone(),
            });
        }
        if !status.is_success() {
            return Err(api_error(status, response.text().await.unwrap_or_default()));
        }

        Ok(response.json().await?)
    }

    async fn create(
        &self,
        file: &RemoteFileHandle,
        content_b64: &str,
        message: &str,
    ) -> Result<(), GitHubError> {
        self.put(
            file,
            &PutContentsRequest {
                message,
                content: content_b64,
                sha: None,
            },
        )
        .await
    }

    async fn update(
        &self,
        file: &RemoteFileHandle,
        content_b64: &str,
        message: &str,
        sha: &str,
    ) -> Result<(), GitHubError> {
        self.put(
            file,
            &PutContentsRequest {
                message,
                content: content_b64,
                sha: Some(sha),
            },
        )
        .await
    }
}

fn contents_url(api_url: &str, file: &RemoteFileHandle) -> String {
    format!(
        "{}/repos/{}/{}/contents/{}",
        api_url, file.owner, file.repo, file.path
    )
}

/// Prefers GitHub's `{"message": ...}` body over the raw text.
fn api_error(status: StatusCode, body: String) -> GitHubError {
    let message = serde_json::from_str::<GitHubErrorBody>(&body)
        .map(|e| e.message)
        .unwrap_or(body);
    GitHubError::Api {
        status: status.as_u16(),
        message,
    }
}
