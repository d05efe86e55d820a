//! Writes `<user_id>.tex` to the remote content store.
//!
//! Create-vs-update is decided by the user's `is_resume_file` flag.
//! The flag is read while holding the user's publish lock and is set only
//! after the file exists remotely. A flagged user whose file has vanished
//! remotely gets an error; there is no fallback to create. The reverse case
//! (file present, flag unset) is repaired: GitHub's "sha wasn't supplied"
//! rejection of the create turns into an update, and the flag is then set.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::{AppError, GENERATE_FAILED};
use crate::github::{ContentStore, RemoteFileHandle};
use crate::publishing::locks::PublishLocks;
use crate::resume::store::ResumeStore;

pub struct Publisher {
    store: Arc<dyn ContentStore>,
    owner: String,
    repo: String,
    locks: PublishLocks,
}

impl Publisher {
    pub fn new(store: Arc<dyn ContentStore>, owner: String, repo: String) -> Self {
        Self {
            store,
            owner,
            repo,
            locks: PublishLocks::new(),
        }
    }

    pub fn file_for(&self, user_id: Uuid) -> RemoteFileHandle {
        RemoteFileHandle::for_user(&self.owner, &self.repo, user_id)
    }

    /// Publishes an already validated document and returns the handle of the
    /// written file. One remote mutation per call, plus one read on update.
    pub async fn publish(
        &self,
        users: &dyn ResumeStore,
        user_id: Uuid,
        document: &str,
    ) -> Result<RemoteFileHandle, AppError> {
        let _guard = self.locks.acquire(user_id).await;

        let user = users
            .find_user(user_id)
            .await
            .map_err(|e| AppError::unexpected(GENERATE_FAILED, e))?
            .ok_or(AppError::Unauthorized)?;

        let file = self.file_for(user_id);
        let content = STANDARD.encode(document);
        let stamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();

        if user.is_resume_file {
            self.update(&file, &content, &stamp).await?;
        } else {
            let message = format!("Create {} ({stamp})", file.path);
            match self.store.create(&file, &content, &message).await {
                Ok(()) => info!("Created {} in {}/{}", file.path, file.owner, file.repo),
                Err(e) if e.is_already_exists() => {
                    warn!(
                        "{} already exists in {}/{}, updating instead",
                        file.path, file.owner, file.repo
                    );
                    self.update(&file, &content, &stamp).await?;
                }
                Err(e) => {
                    error!("Error creating GitHub file {}: {e}", file.path);
                    return Err(AppError::RemotePublishFailed(format!(
                        "Failed to create GitHub file: {e}"
                    )));
                }
            }

            users
                .mark_remote_file(user_id)
                .await
                .map_err(|e| AppError::unexpected(GENERATE_FAILED, e))?;
        }

        Ok(file)
    }

    async fn update(
        &self,
        file: &RemoteFileHandle,
        content: &str,
        stamp: &str,
    ) -> Result<(), AppError> {
        let metadata = self.store.read_metadata(file).await.map_err(|e| {
            error!("Error fetching GitHub SHA for {}: {e}", file.path);
            AppError::RemoteMetadataFailed(format!("Failed to fetch GitHub SHA: {e}"))
        })?;

        let message = format!("Update {} ({stamp})", file.path);
        self.store
            .update(file, content, &message, &metadata.sha)
            .await
            .map_err(|e| {
                error!("Error updating GitHub file {}: {e}", file.path);
                AppError::RemotePublishFailed(format!("Failed to update GitHub file: {e}"))
            })?;
        info!("Updated {} in {}/{}", file.path, file.owner, file.repo);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeContentStore, FakeResumeStore, StoreCall};

    const DOC: &str = "\\documentclass{article}\\begin{document}x\\end{document}";

    fn publisher(store: Arc<FakeContentStore>) -> Publisher {
        Publisher::new(store, "octo".into(), "resumes".into())
    }

    #[tokio::test]
    async fn test_first_publish_creates_and_sets_flag() {
        let users = FakeResumeStore::new();
        let user_id = users.add_user(None, false);
        let store = Arc::new(FakeContentStore::default());

        let file = publisher(store.clone())
            .publish(&users, user_id, DOC)
            .await
            .unwrap();

        assert_eq!(file.path, format!("{user_id}.tex"));
        let calls = store.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            StoreCall::Create { path, content } => {
                assert_eq!(path, &file.path);
                assert_eq!(STANDARD.decode(content).unwrap(), DOC.as_bytes());
            }
            other => panic!("expected create, got {other:?}"),
        }
        assert!(users.has_remote_file(user_id));
    }

    #[tokio::test]
    async fn test_second_publish_reads_sha_then_updates() {
        let users = FakeResumeStore::new();
        let user_id = users.add_user(None, false);
        let store = Arc::new(FakeContentStore::default());
        let publisher = publisher(store.clone());

        publisher.publish(&users, user_id, DOC).await.unwrap();
        publisher.publish(&users, user_id, DOC).await.unwrap();

        let calls = store.calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(calls[1], StoreCall::ReadMetadata { .. }));
        match &calls[2] {
            StoreCall::Update { sha, .. } => assert_eq!(sha, FakeContentStore::SHA),
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_create_leaves_flag_unset() {
        let users = FakeResumeStore::new();
        let user_id = users.add_user(None, false);
        let store = Arc::new(FakeContentStore::failing_create());

        let err = publisher(store)
            .publish(&users, user_id, DOC)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::RemotePublishFailed(_)));
        assert!(!users.has_remote_file(user_id));
    }

    #[tokio::test]
    async fn test_missing_remote_file_does_not_fall_back_to_create() {
        let users = FakeResumeStore::new();
        let user_id = users.add_user(None, true);
        let store = Arc::new(FakeContentStore::failing_metadata());

        let err = publisher(store.clone())
            .publish(&users, user_id, DOC)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::RemoteMetadataFailed(_)));
        assert_eq!(store.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_update_is_publish_failure() {
        let users = FakeResumeStore::new();
        let user_id = users.add_user(None, true);
        let store = Arc::new(FakeContentStore::failing_update());

        let err = publisher(store)
            .publish(&users, user_id, DOC)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::RemotePublishFailed(_)));
    }

    #[tokio::test]
    async fn test_concurrent_first_publishes_create_once() {
        let users = Arc::new(FakeResumeStore::new());
        let user_id = users.add_user(None, false);
        let store = Arc::new(FakeContentStore::default());
        let publisher = Arc::new(publisher(store.clone()));

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let users = users.clone();
                let publisher = publisher.clone();
                tokio::spawn(async move { publisher.publish(&*users, user_id, DOC).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let creates = store
            .calls()
            .iter()
            .filter(|c| matches!(c, StoreCall::Create { .. }))
            .count();
        assert_eq!(creates, 1);
    }

    #[tokio::test]
    async fn test_existing_file_without_flag_is_updated_and_flagged() {
        let users = FakeResumeStore::new();
        let user_id = users.add_user(None, false);
        let store = Arc::new(FakeContentStore::with_existing_file());

        publisher(store.clone())
            .publish(&users, user_id, DOC)
            .await
            .unwrap();

        let calls = store.calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(calls[0], StoreCall::Create { .. }));
        assert!(matches!(calls[1], StoreCall::ReadMetadata { .. }));
        match &calls[2] {
            StoreCall::Update { sha, content, .. } => {
                assert_eq!(sha, FakeContentStore::SHA);
                assert_eq!(STANDARD.decode(content).unwrap(), DOC.as_bytes());
            }
            other => panic!("expected update, got {other:?}"),
        }
        assert!(users.has_remote_file(user_id));
    }
}
