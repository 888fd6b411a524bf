//! Scripted data plane and CDN uploader

use async_trait::async_trait;
use riyobox_core::{UploadError, UploadResult};
use riyobox_storage::{CdnUpload, CdnUploader, DataPlane, ObjectMetadata, PutBody, PutResponse};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// How the mock answers one PUT
#[derive(Debug, Clone)]
pub enum PutBehavior {
    /// Succeed with a generated ETag
    Succeed,
    /// Succeed without an ETag header
    NoEtag,
    /// Fail with a transport error
    Fail(String),
    /// Never answer
    Hang,
}

#[derive(Debug, Clone)]
pub struct RecordedPut {
    pub url: String,
    pub size: u64,
    pub content_type: String,
    pub metadata: Option<ObjectMetadata>,
    /// Whole-file bodies are streamed, parts are buffered
    pub streamed: bool,
    pub timeout: Option<Duration>,
}

/// Mock data plane; scripted behaviors are consumed first, then the default.
pub struct MockDataPlane {
    puts: Mutex<Vec<RecordedPut>>,
    script: Mutex<VecDeque<PutBehavior>>,
    default_behavior: Mutex<PutBehavior>,
}

impl Default for MockDataPlane {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDataPlane {
    pub fn new() -> Self {
        Self {
            puts: Mutex::new(Vec::new()),
            script: Mutex::new(VecDeque::new()),
            default_behavior: Mutex::new(PutBehavior::Succeed),
        }
    }

    pub fn push_behavior(&self, behavior: PutBehavior) {
        self.script.lock().unwrap().push_back(behavior);
    }

    pub fn set_default_behavior(&self, behavior: PutBehavior) {
        *self.default_behavior.lock().unwrap() = behavior;
    }

    pub fn puts(&self) -> Vec<RecordedPut> {
        self.puts.lock().unwrap().clone()
    }

    fn next_behavior(&self) -> PutBehavior {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.default_behavior.lock().unwrap().clone())
    }
}

#[async_trait]
impl DataPlane for MockDataPlane {
    async fn put_object(
        &self,
        url: &str,
        body: PutBody,
        content_type: &str,
        metadata: Option<&ObjectMetadata>,
        timeout: Option<Duration>,
    ) -> UploadResult<PutResponse> {
        let index = {
            let mut puts = self.puts.lock().unwrap();
            puts.push(RecordedPut {
                url: url.to_string(),
                size: body.len(),
                content_type: content_type.to_string(),
                metadata: metadata.cloned(),
                streamed: matches!(body, PutBody::Streamed { .. }),
                timeout,
            });
            puts.len()
        };

        match self.next_behavior() {
            PutBehavior::Succeed => Ok(PutResponse {
                etag: Some(format!("\"etag-{}\"", index)),
            }),
            PutBehavior::NoEtag => Ok(PutResponse { etag: None }),
            PutBehavior::Fail(message) => Err(UploadError::Transport(message)),
            PutBehavior::Hang => std::future::pending().await,
        }
    }
}

/// Mock CDN returning `https://res.cloudinary.test/<file_name>`
#[derive(Default)]
pub struct MockCdnUploader {
    uploads: Mutex<Vec<(String, u64, Option<String>)>>,
    hang: AtomicBool,
}

impl MockCdnUploader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploader that records the upload and never answers
    pub fn hanging() -> Self {
        Self {
            hang: AtomicBool::new(true),
            ..Self::default()
        }
    }

    /// `(file_name, size, folder)` of every upload
    pub fn uploads(&self) -> Vec<(String, u64, Option<String>)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl CdnUploader for MockCdnUploader {
    async fn upload(&self, upload: CdnUpload) -> UploadResult<String> {
        let url = format!("https://res.cloudinary.test/{}", upload.file_name);
        self.uploads.lock().unwrap().push((
            upload.file_name,
            upload.body.len(),
            upload.folder,
        ));
        if self.hang.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        Ok(url)
    }
}
