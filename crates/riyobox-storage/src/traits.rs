//! Data-plane abstraction traits
//!
//! The coordinator never talks to storage through anything but these traits,
//! so tests can swap in recording fakes.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use riyobox_core::{UploadCategory, UploadResult};
use std::fmt;
use std::time::Duration;

/// Lazily read file contents
pub type ByteStream = BoxStream<'static, std::io::Result<Bytes>>;

/// Payload of a PUT or CDN upload
///
/// Parts are small enough to buffer; whole files are streamed from their
/// source so a 2 GB video never sits in memory.
pub enum PutBody {
    Buffered(Bytes),
    Streamed { stream: ByteStream, len: u64 },
}

impl PutBody {
    pub fn streamed(stream: ByteStream, len: u64) -> Self {
        Self::Streamed { stream, len }
    }

    pub fn len(&self) -> u64 {
        match self {
            Self::Buffered(bytes) => bytes.len() as u64,
            Self::Streamed { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn into_body(self) -> reqwest::Body {
        match self {
            Self::Buffered(bytes) => reqwest::Body::from(bytes),
            Self::Streamed { stream, .. } => reqwest::Body::wrap_stream(stream),
        }
    }
}

impl From<Bytes> for PutBody {
    fn from(bytes: Bytes) -> Self {
        Self::Buffered(bytes)
    }
}

impl fmt::Debug for PutBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buffered(bytes) => f.debug_tuple("Buffered").field(&bytes.len()).finish(),
            Self::Streamed { len, .. } => f.debug_struct("Streamed").field("len", len).finish(),
        }
    }
}

/// `x-amz-meta-*` headers attached to a whole-file PUT
#[derive(Debug, Clone)]
pub struct ObjectMetadata {
    pub original_filename: String,
    pub category: UploadCategory,
    pub original_size: u64,
}

impl ObjectMetadata {
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        vec![
            (
                "x-amz-meta-filename",
                urlencoding::encode(&self.original_filename).into_owned(),
            ),
            ("x-amz-meta-category", self.category.to_string()),
            ("x-amz-meta-original-size", self.original_size.to_string()),
        ]
    }
}

/// What the storage endpoint answered to a successful PUT
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutResponse {
    /// Integrity token; `None` when the header was absent or empty
    pub etag: Option<String>,
}

/// Receives the bytes of an upload
#[async_trait]
pub trait DataPlane: Send + Sync {
    /// PUT `body` to a presigned `url`.
    ///
    /// `timeout` bounds this request; `None` falls back to the data plane's
    /// default request timeout. Non-2xx answers and network failures are
    /// `UploadError::Transport`, an expired bound is `UploadError::Timeout`.
    async fn put_object(
        &self,
        url: &str,
        body: PutBody,
        content_type: &str,
        metadata: Option<&ObjectMetadata>,
        timeout: Option<Duration>,
    ) -> UploadResult<PutResponse>;
}

/// A file submitted to the alternate CDN provider
#[derive(Debug)]
pub struct CdnUpload {
    pub file_name: String,
    pub content_type: String,
    pub body: PutBody,
    pub category: UploadCategory,
    /// Overrides the uploader's default folder
    pub folder: Option<String>,
}

/// Alternate CDN provider that stores and validates uploads itself
#[async_trait]
pub trait CdnUploader: Send + Sync {
    /// Upload the file and return its public (secure) URL.
    async fn upload(&self, upload: CdnUpload) -> UploadResult<String>;
}
