//! Recording control plane for testing without a backend

use async_trait::async_trait;
use riyobox_api_client::ControlPlane;
use riyobox_core::models::{
    CompleteMultipartRequest, CompleteMultipartResponse, CompleteUploadRequest, FileDescriptor,
    FileUploadConfig, InitiateMultipartResponse, PartUrlRequest, PartUrlResponse,
    PresignedTarget, StorageConfig, UploadState, UploadStatus, VerifyMultipartRequest,
    VerifyResponse, VerifyUploadRequest,
};
use riyobox_core::{UploadError, UploadResult};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

pub const MOCK_UPLOAD_ID: &str = "mp-upload-1";
pub const MOCK_MULTIPART_URL: &str = "https://cdn.riyobox.test/videos/final.mp4";

/// One recorded control-plane call
#[derive(Debug, Clone)]
pub enum ControlCall {
    StorageConfig,
    FileUploadConfig(FileDescriptor),
    Presigned(FileDescriptor),
    Verify(VerifyUploadRequest),
    Complete(CompleteUploadRequest),
    Initiate(FileDescriptor),
    PartUrl(PartUrlRequest),
    CompleteMultipart(CompleteMultipartRequest),
    VerifyMultipart(VerifyMultipartRequest),
    Abort(String),
    Delete(String),
    Status(String),
}

impl ControlCall {
    pub fn name(&self) -> &'static str {
        match self {
            ControlCall::StorageConfig => "storage_config",
            ControlCall::FileUploadConfig(_) => "file_upload_config",
            ControlCall::Presigned(_) => "presigned",
            ControlCall::Verify(_) => "verify",
            ControlCall::Complete(_) => "complete",
            ControlCall::Initiate(_) => "initiate",
            ControlCall::PartUrl(_) => "part_url",
            ControlCall::CompleteMultipart(_) => "complete_multipart",
            ControlCall::VerifyMultipart(_) => "verify_multipart",
            ControlCall::Abort(_) => "abort",
            ControlCall::Delete(_) => "delete",
            ControlCall::Status(_) => "status",
        }
    }
}

/// Mock control plane answering every call successfully unless told otherwise
pub struct MockControlPlane {
    calls: Mutex<Vec<ControlCall>>,
    use_multipart: AtomicBool,
    verify_results: Mutex<VecDeque<bool>>,
    failures: Mutex<HashMap<&'static str, VecDeque<UploadError>>>,
    stalled: Mutex<HashSet<&'static str>>,
    presigned_count: AtomicU32,
}

impl Default for MockControlPlane {
    fn default() -> Self {
        Self::new()
    }
}

impl MockControlPlane {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            use_multipart: AtomicBool::new(true),
            verify_results: Mutex::new(VecDeque::new()),
            failures: Mutex::new(HashMap::new()),
            stalled: Mutex::new(HashSet::new()),
            presigned_count: AtomicU32::new(0),
        }
    }

    pub fn set_use_multipart(&self, use_multipart: bool) {
        self.use_multipart.store(use_multipart, Ordering::SeqCst);
    }

    /// Queue answers for `verify` and `verify_multipart`; `true` once empty.
    pub fn push_verify_results(&self, results: &[bool]) {
        self.verify_results
            .lock()
            .unwrap()
            .extend(results.iter().copied());
    }

    /// Make the next call to `operation` (a [`ControlCall::name`]) fail.
    pub fn fail_next(&self, operation: &'static str, error: UploadError) {
        self.failures
            .lock()
            .unwrap()
            .entry(operation)
            .or_default()
            .push_back(error);
    }

    /// Make every call to `operation` record itself and never answer.
    pub fn stall(&self, operation: &'static str) {
        self.stalled.lock().unwrap().insert(operation);
    }

    pub fn calls(&self) -> Vec<ControlCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_names(&self) -> Vec<&'static str> {
        self.calls().iter().map(ControlCall::name).collect()
    }

    pub fn count(&self, operation: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.name() == operation)
            .count()
    }

    fn record(&self, call: ControlCall) -> UploadResult<()> {
        let name = call.name();
        self.calls.lock().unwrap().push(call);

        match self
            .failures
            .lock()
            .unwrap()
            .get_mut(name)
            .and_then(VecDeque::pop_front)
        {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn stall_if_requested(&self, operation: &str) {
        let stalled = self.stalled.lock().unwrap().contains(operation);
        if stalled {
            std::future::pending::<()>().await;
        }
    }

    fn next_verified(&self) -> bool {
        self.verify_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(true)
    }
}

#[async_trait]
impl ControlPlane for MockControlPlane {
    async fn storage_config(&self) -> UploadResult<StorageConfig> {
        self.record(ControlCall::StorageConfig)?;
        Ok(StorageConfig {
            account_id: "acct".to_string(),
            bucket_name: "riyobox-media".to_string(),
            public_url: "https://cdn.riyobox.test".to_string(),
            region: None,
        })
    }

    async fn file_upload_config(&self, file: &FileDescriptor) -> UploadResult<FileUploadConfig> {
        self.record(ControlCall::FileUploadConfig(file.clone()))?;
        Ok(FileUploadConfig {
            provider: "r2".to_string(),
            use_multipart: self.use_multipart.load(Ordering::SeqCst),
            chunk_size: 10 * 1024 * 1024,
        })
    }

    async fn presigned_target(&self, file: &FileDescriptor) -> UploadResult<PresignedTarget> {
        self.record(ControlCall::Presigned(file.clone()))?;
        let n = self.presigned_count.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(PresignedTarget {
            upload_url: format!("https://storage.riyobox.test/put/{}", n),
            public_url: format!("https://cdn.riyobox.test/{}", file.file_name),
            upload_id: None,
            expires_at: None,
        })
    }

    async fn verify_upload(&self, request: &VerifyUploadRequest) -> UploadResult<VerifyResponse> {
        self.record(ControlCall::Verify(request.clone()))?;
        Ok(VerifyResponse {
            verified: self.next_verified(),
        })
    }

    async fn complete_upload(&self, request: &CompleteUploadRequest) -> UploadResult<()> {
        self.record(ControlCall::Complete(request.clone()))
    }

    async fn initiate_multipart(
        &self,
        file: &FileDescriptor,
    ) -> UploadResult<InitiateMultipartResponse> {
        self.record(ControlCall::Initiate(file.clone()))?;
        Ok(InitiateMultipartResponse {
            upload_id: MOCK_UPLOAD_ID.to_string(),
        })
    }

    async fn multipart_part_url(&self, request: &PartUrlRequest) -> UploadResult<PartUrlResponse> {
        self.record(ControlCall::PartUrl(request.clone()))?;
        Ok(PartUrlResponse {
            part_url: format!(
                "https://storage.riyobox.test/{}/part/{}",
                request.upload_id, request.part_number
            ),
        })
    }

    async fn complete_multipart(
        &self,
        request: &CompleteMultipartRequest,
    ) -> UploadResult<CompleteMultipartResponse> {
        self.record(ControlCall::CompleteMultipart(request.clone()))?;
        Ok(CompleteMultipartResponse {
            url: MOCK_MULTIPART_URL.to_string(),
            etag: "\"final-etag-25\"".to_string(),
        })
    }

    async fn verify_multipart(
        &self,
        request: &VerifyMultipartRequest,
    ) -> UploadResult<VerifyResponse> {
        self.record(ControlCall::VerifyMultipart(request.clone()))?;
        self.stall_if_requested("verify_multipart").await;
        Ok(VerifyResponse {
            verified: self.next_verified(),
        })
    }

    async fn abort_multipart(&self, upload_id: &str) -> UploadResult<()> {
        self.record(ControlCall::Abort(upload_id.to_string()))
    }

    async fn delete_file(&self, url: &str) -> UploadResult<()> {
        self.record(ControlCall::Delete(url.to_string()))
    }

    async fn upload_status(&self, upload_id: &str) -> UploadResult<UploadStatus> {
        self.record(ControlCall::Status(upload_id.to_string()))?;
        Ok(UploadStatus {
            status: UploadState::Uploading,
            progress: Some(40.0),
            url: None,
            error: None,
        })
    }
}
