//! Request and response schemas of the upload control plane.
//!
//! Field names are camelCase on the wire. Responses implement [`ResponseBody`]
//! so the API client can reject bodies that parse but carry empty identifiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UploadCategory;

/// Checks applied to a response after deserialization.
pub trait ResponseBody {
    /// Returns a description of the first missing value, if any.
    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

fn require(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("`{}` is empty", field))
    } else {
        Ok(())
    }
}

/// File description sent to `upload/config/file`, `upload/presigned` and
/// `upload/multipart/initiate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub category: UploadCategory,
}

/// Storage account details returned by `GET upload/config`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    pub account_id: String,
    pub bucket_name: String,
    pub public_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl ResponseBody for StorageConfig {}

/// Per-file strategy returned by `POST upload/config/file`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadConfig {
    pub provider: String,
    pub use_multipart: bool,
    pub chunk_size: u64,
}

impl ResponseBody for FileUploadConfig {}

/// A writable destination issued by the control plane
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedTarget {
    /// Presigned URL accepting a single PUT
    pub upload_url: String,
    /// URL the object is reachable at once stored
    pub public_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl ResponseBody for PresignedTarget {
    fn check(&self) -> Result<(), String> {
        require("uploadUrl", &self.upload_url)?;
        require("publicUrl", &self.public_url)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyUploadRequest {
    pub url: String,
    pub file_size: u64,
    pub file_type: String,
    /// ETag of the stored object; `null` when the storage response had none
    pub etag: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub verified: bool,
}

impl ResponseBody for VerifyResponse {}

/// Informational notification sent after a verified whole-file upload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteUploadRequest {
    pub url: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub category: UploadCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateMultipartResponse {
    pub upload_id: String,
}

impl ResponseBody for InitiateMultipartResponse {
    fn check(&self) -> Result<(), String> {
        require("uploadId", &self.upload_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartUrlRequest {
    pub upload_id: String,
    pub part_number: u32,
    pub total_parts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartUrlResponse {
    pub part_url: String,
}

impl ResponseBody for PartUrlResponse {
    fn check(&self) -> Result<(), String> {
        require("partUrl", &self.part_url)
    }
}

/// Outcome of one successfully transferred part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartResult {
    /// 1-based part number
    pub part_number: u32,
    pub etag: String,
    pub size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteMultipartRequest {
    pub upload_id: String,
    /// Parts in ascending `part_number` order
    pub parts: Vec<PartResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteMultipartResponse {
    pub url: String,
    pub etag: String,
}

impl ResponseBody for CompleteMultipartResponse {
    fn check(&self) -> Result<(), String> {
        require("url", &self.url)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyMultipartRequest {
    pub upload_id: String,
    pub etag: String,
    pub file_size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbortMultipartRequest {
    pub upload_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteFileRequest {
    pub url: String,
}

/// Server-side state of an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadState {
    Pending,
    Uploading,
    Completed,
    Failed,
}

/// Response of `GET upload/status/{uploadId}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadStatus {
    pub status: UploadState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponseBody for UploadStatus {}
