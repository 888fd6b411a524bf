//! Control-plane abstraction trait
//!
//! The upload coordinator talks to the backend only through this trait, so it
//! can run against the HTTP [`ApiClient`] or an in-memory fake.

use async_trait::async_trait;
use riyobox_core::models::{
    CompleteMultipartRequest, CompleteMultipartResponse, CompleteUploadRequest, FileDescriptor,
    FileUploadConfig, InitiateMultipartResponse, PartUrlRequest, PartUrlResponse,
    PresignedTarget, StorageConfig, UploadStatus, VerifyMultipartRequest, VerifyResponse,
    VerifyUploadRequest,
};
use riyobox_core::UploadResult;

use crate::ApiClient;

/// Metadata and coordination operations consumed by the upload coordinator
#[async_trait]
pub trait ControlPlane: Send + Sync {
    async fn storage_config(&self) -> UploadResult<StorageConfig>;

    async fn file_upload_config(&self, file: &FileDescriptor) -> UploadResult<FileUploadConfig>;

    async fn presigned_target(&self, file: &FileDescriptor) -> UploadResult<PresignedTarget>;

    async fn verify_upload(&self, request: &VerifyUploadRequest) -> UploadResult<VerifyResponse>;

    async fn complete_upload(&self, request: &CompleteUploadRequest) -> UploadResult<()>;

    async fn initiate_multipart(
        &self,
        file: &FileDescriptor,
    ) -> UploadResult<InitiateMultipartResponse>;

    async fn multipart_part_url(&self, request: &PartUrlRequest) -> UploadResult<PartUrlResponse>;

    async fn complete_multipart(
        &self,
        request: &CompleteMultipartRequest,
    ) -> UploadResult<CompleteMultipartResponse>;

    async fn verify_multipart(
        &self,
        request: &VerifyMultipartRequest,
    ) -> UploadResult<VerifyResponse>;

    async fn abort_multipart(&self, upload_id: &str) -> UploadResult<()>;

    async fn delete_file(&self, url: &str) -> UploadResult<()>;

    async fn upload_status(&self, upload_id: &str) -> UploadResult<UploadStatus>;
}

#[async_trait]
impl ControlPlane for ApiClient {
    async fn storage_config(&self) -> UploadResult<StorageConfig> {
        ApiClient::storage_config(self).await
    }

    async fn file_upload_config(&self, file: &FileDescriptor) -> UploadResult<FileUploadConfig> {
        ApiClient::file_upload_config(self, file).await
    }

    async fn presigned_target(&self, file: &FileDescriptor) -> UploadResult<PresignedTarget> {
        ApiClient::presigned_target(self, file).await
    }

    async fn verify_upload(&self, request: &VerifyUploadRequest) -> UploadResult<VerifyResponse> {
        ApiClient::verify_upload(self, request).await
    }

    async fn complete_upload(&self, request: &CompleteUploadRequest) -> UploadResult<()> {
        ApiClient::complete_upload(self, request).await
    }

    async fn initiate_multipart(
        &self,
        file: &FileDescriptor,
    ) -> UploadResult<InitiateMultipartResponse> {
        ApiClient::initiate_multipart(self, file).await
    }

    async fn multipart_part_url(&self, request: &PartUrlRequest) -> UploadResult<PartUrlResponse> {
        ApiClient::multipart_part_url(self, request).await
    }

    async fn complete_multipart(
        &self,
        request: &CompleteMultipartRequest,
    ) -> UploadResult<CompleteMultipartResponse> {
        ApiClient::complete_multipart(self, request).await
    }

    async fn verify_multipart(
        &self,
        request: &VerifyMultipartRequest,
    ) -> UploadResult<VerifyResponse> {
        ApiClient::verify_multipart(self, request).await
    }

    async fn abort_multipart(&self, upload_id: &str) -> UploadResult<()> {
        ApiClient::abort_multipart(self, upload_id).await
    }

    async fn delete_file(&self, url: &str) -> UploadResult<()> {
        ApiClient::delete_file(self, url).await
    }

    async fn upload_status(&self, upload_id: &str) -> UploadResult<UploadStatus> {
        ApiClient::upload_status(self, upload_id).await
    }
}
