//! In-memory fakes of the three external seams, shared by unit and router tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use bytes::Bytes;
use uuid::Uuid;

use crate::compiler::{CompileError, CompileResponse, Compiler};
use crate::github::{ContentStore, FileMetadata, GitHubError, RemoteFileHandle};
use crate::models::resume::ResumeRecord;
use crate::models::user::UserRow;
use crate::resume::store::ResumeStore;

#[derive(Default)]
pub struct FakeResumeStore {
    users: Mutex<HashMap<Uuid, UserRow>>,
    resumes: Mutex<HashMap<Uuid, ResumeRecord>>,
}

impl FakeResumeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, resume_id: Option<Uuid>, is_resume_file: bool) -> Uuid {
        let id = Uuid::new_v4();
        self.users.lock().unwrap().insert(
            id,
            UserRow {
                id,
                resume_id,
                is_resume_file,
            },
        );
        id
    }

    pub fn add_resume(&self, mut record: ResumeRecord) -> Uuid {
        let id = Uuid::new_v4();
        record.id = id;
        self.resumes.lock().unwrap().insert(id, record);
        id
    }

    pub fn has_remote_file(&self, user_id: Uuid) -> bool {
        self.users
            .lock()
            .unwrap()
            .get(&user_id)
            .map(|u| u.is_resume_file)
            .unwrap_or(false)
    }
}

#[async_trait]
impl ResumeStore for FakeResumeStore {
    async fn find_user(&self, user_id: Uuid) -> Result<Option<UserRow>, sqlx::Error> {
        Ok(self.users.lock().unwrap().get(&user_id).cloned())
    }

    async fn find_resume(&self, resume_id: Uuid) -> Result<Option<ResumeRecord>, sqlx::Error> {
        Ok(self.resumes.lock().unwrap().get(&resume_id).cloned())
    }

    async fn mark_remote_file(&self, user_id: Uuid) -> Result<(), sqlx::Error> {
        match self.users.lock().unwrap().get_mut(&user_id) {
            Some(user) => {
                user.is_resume_file = true;
                Ok(())
            }
            None => Err(sqlx::Error::RowNotFound),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    ReadMetadata { path: String },
    Create { path: String, content: String },
    Update { path: String, content: String, sha: String },
}

#[derive(Default)]
pub struct FakeContentStore {
    fail_metadata: bool,
    fail_create: bool,
    fail_update: bool,
    file_exists: bool,
    calls: Mutex<Vec<StoreCall>>,
}

impl FakeContentStore {
    pub const SHA: &'static str = "3d21ec53a331a6f037a91c368710b99387d012c1";

    pub fn failing_metadata() -> Self {
        Self {
            fail_metadata: true,
            ..Default::default()
        }
    }

    pub fn failing_create() -> Self {
        Self {
            fail_create: true,
            ..Default::default()
        }
    }

    pub fn failing_update() -> Self {
        Self {
            fail_update: true,
            ..Default::default()
        }
    }

    /// The file is already in the repository, so create answers 422.
    pub fn with_existing_file() -> Self {
        Self {
            file_exists: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().unwrap().push(call);
    }
}

fn api_failure(status: u16, message: &str) -> GitHubError {
    GitHubError::Api {
        status,
        message: message.to_string(),
    }
}

#[async_trait]
impl ContentStore for FakeContentStore {
    async fn read_metadata(&self, file: &RemoteFileHandle) -> Result<FileMetadata, GitHubError> {
        self.record(StoreCall::ReadMetadata {
            path: file.path.clone(),
        });
        if self.fail_metadata {
            return Err(GitHubError::NotFound {
                owner: file.owner.clone(),
                repo: file.repo.clone(),
                path: file.path.clone(),
            });
        }
        Ok(FileMetadata {
            sha: Self::SHA.to_string(),
        })
    }

    async fn create(
        &self,
        file: &RemoteFileHandle,
        content_b64: &str,
        _message: &str,
    ) -> Result<(), GitHubError> {
        self.record(StoreCall::Create {
            path: file.path.clone(),
            content: content_b64.to_string(),
        });
        if self.fail_create {
            return Err(api_failure(422, "Invalid request"));
        }
        if self.file_exists {
            return Err(api_failure(
                422,
                "Invalid request.\n\n\"sha\" wasn't supplied.",
            ));
        }
        Ok(())
    }

    async fn update(
        &self,
        file: &RemoteFileHandle,
        content_b64: &str,
        _message: &str,
        sha: &str,
    ) -> Result<(), GitHubError> {
        self.record(StoreCall::Update {
            path: file.path.clone(),
            content: content_b64.to_string(),
            sha: sha.to_string(),
        });
        if self.fail_update {
            return Err(api_failure(409, "sha does not match"));
        }
        Ok(())
    }
}

/// What the fake compiler answers with.
#[derive(Debug, Clone)]
pub enum FakeCompile {
    Respond {
        content_type: Option<&'static str>,
        body: Bytes,
    },
    Timeout,
    Unreachable,
}

pub struct FakeCompiler {
    outcome: FakeCompile,
    calls: AtomicUsize,
}

impl FakeCompiler {
    pub fn new(outcome: FakeCompile) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn pdf() -> Self {
        Self::new(FakeCompile::Respond {
            content_type: Some("application/pdf"),
            body: Bytes::from_static(b"%PDF-1.5\n1 0 obj\n"),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Compiler for FakeCompiler {
    async fn compile(&self, _file: &RemoteFileHandle) -> Result<CompileResponse, CompileError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            FakeCompile::Respond { content_type, body } => Ok(CompileResponse {
                content_type: content_type.map(str::to_string),
                body: body.clone(),
            }),
            FakeCompile::Timeout => Err(CompileError::Timeout(Duration::from_secs(120))),
            FakeCompile::Unreachable => Err(CompileError::Request(
                "error sending request: connection refused".to_string(),
            )),
        }
    }
}

/// Serves `router` on an ephemeral localhost port and returns its base URL.
pub async fn serve_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}
