//! Types for the upload coordinator.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use riyobox_core::models::FileDescriptor;
use riyobox_core::validation::guess_content_type;
use riyobox_core::{ClientConfig, UploadCategory, UploadError, UploadProvider, UploadResult};
use riyobox_storage::{ByteStream, PutBody};
use serde::Serialize;
use std::fmt;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;

use crate::plan::DEFAULT_CHUNK_SIZE;

const DEFAULT_MAX_RETRIES: u32 = 3;

/// Random-access source of upload bytes
///
/// Only the requested range is materialized, so a chunked upload keeps a
/// single part in memory at a time. Whole-file transfers read through
/// [`UploadSource::open_stream`] instead.
#[async_trait]
pub trait UploadSource: Send + Sync {
    /// Total size in bytes
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read bytes `[start, end)`.
    async fn read_range(&self, start: u64, end: u64) -> UploadResult<Bytes>;

    /// Stream the whole source from its first byte. Every call starts over.
    async fn open_stream(&self) -> UploadResult<ByteStream>;
}

fn check_range(start: u64, end: u64, len: u64) -> UploadResult<()> {
    if start > end || end > len {
        return Err(UploadError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Range {}..{} outside of source of {} bytes", start, end, len),
        )));
    }
    Ok(())
}

/// In-memory source
#[derive(Clone, Debug)]
pub struct MemorySource(Bytes);

impl MemorySource {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self(data.into())
    }
}

#[async_trait]
impl UploadSource for MemorySource {
    fn len(&self) -> u64 {
        self.0.len() as u64
    }

    async fn read_range(&self, start: u64, end: u64) -> UploadResult<Bytes> {
        check_range(start, end, self.len())?;
        Ok(self.0.slice(start as usize..end as usize))
    }

    async fn open_stream(&self) -> UploadResult<ByteStream> {
        let chunk = Ok::<_, std::io::Error>(self.0.clone());
        Ok(Box::pin(stream::once(futures::future::ready(chunk))))
    }
}

/// File on local disk, re-opened for each range read
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
    len: u64,
}

impl FileSource {
    pub async fn open(path: impl AsRef<Path>) -> UploadResult<Self> {
        let path = path.as_ref().to_path_buf();
        let metadata = tokio::fs::metadata(&path).await?;
        if !metadata.is_file() {
            return Err(UploadError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Not a regular file: {}", path.display()),
            )));
        }

        Ok(Self {
            path,
            len: metadata.len(),
        })
    }
}

#[async_trait]
impl UploadSource for FileSource {
    fn len(&self) -> u64 {
        self.len
    }

    async fn read_range(&self, start: u64, end: u64) -> UploadResult<Bytes> {
        check_range(start, end, self.len)?;

        let mut file = tokio::fs::File::open(&self.path).await?;
        file.seek(SeekFrom::Start(start)).await?;

        let size = usize::try_from(end - start).map_err(|_| {
            UploadError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Range of {} bytes does not fit in memory", end - start),
            ))
        })?;
        let mut buffer = vec![0u8; size];
        file.read_exact(&mut buffer).await?;
        Ok(Bytes::from(buffer))
    }

    async fn open_stream(&self) -> UploadResult<ByteStream> {
        let file = tokio::fs::File::open(&self.path).await?;
        // Never send more than the size announced to the control plane.
        Ok(Box::pin(ReaderStream::new(file.take(self.len))))
    }
}

/// One caller-initiated file transfer. Immutable once built.
#[derive(Clone)]
pub struct UploadFile {
    name: String,
    content_type: String,
    source: Arc<dyn UploadSource>,
}

impl UploadFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        source: Arc<dyn UploadSource>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            source,
        }
    }

    pub fn from_bytes(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self::new(name, content_type, Arc::new(MemorySource::new(data)))
    }

    /// Open a file on disk; the MIME type is guessed from its extension.
    pub async fn open(path: impl AsRef<Path>) -> UploadResult<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                UploadError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("Invalid file name: {}", path.display()),
                ))
            })?
            .to_string();
        let source = FileSource::open(path).await?;
        let content_type = guess_content_type(&name);

        Ok(Self::new(name, content_type, Arc::new(source)))
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn size(&self) -> u64 {
        self.source.len()
    }

    pub async fn read_range(&self, start: u64, end: u64) -> UploadResult<Bytes> {
        self.source.read_range(start, end).await
    }

    pub async fn read_all(&self) -> UploadResult<Bytes> {
        self.source.read_range(0, self.size()).await
    }

    /// Fresh streamed body over the whole file, with its length.
    pub async fn open_body(&self) -> UploadResult<PutBody> {
        let stream = self.source.open_stream().await?;
        Ok(PutBody::streamed(stream, self.size()))
    }

    /// Describe this file to the control plane under `file_name`.
    pub fn descriptor(&self, file_name: String, category: UploadCategory) -> FileDescriptor {
        FileDescriptor {
            file_name,
            file_type: self.content_type.clone(),
            file_size: self.size(),
            category,
        }
    }
}

impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.size())
            .finish()
    }
}

/// Progress notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadProgress {
    /// Percentage, 0–100
    pub progress: u8,
    pub loaded: u64,
    pub total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_chunks: Option<u32>,
}

impl UploadProgress {
    /// Single terminal update of a non-chunked transfer
    pub fn finished(total: u64) -> Self {
        Self {
            progress: 100,
            loaded: total,
            total,
            chunk: None,
            total_chunks: None,
        }
    }
}

pub type ProgressCallback = Arc<dyn Fn(UploadProgress) + Send + Sync>;

/// Caller options for one upload
#[derive(Clone)]
pub struct UploadOptions {
    pub provider: UploadProvider,
    pub category: UploadCategory,
    /// CDN folder override
    pub folder: Option<String>,
    pub on_progress: Option<ProgressCallback>,
    /// Attempts per whole-file transfer; 0 selects the default of 3
    pub max_retries: u32,
    /// Bytes per part of a chunked transfer; 0 selects the default of 10 MiB
    pub chunk_size: u64,
    pub cancel: CancellationToken,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            provider: UploadProvider::default(),
            category: UploadCategory::default(),
            folder: None,
            on_progress: None,
            max_retries: DEFAULT_MAX_RETRIES,
            chunk_size: DEFAULT_CHUNK_SIZE,
            cancel: CancellationToken::new(),
        }
    }
}

impl UploadOptions {
    /// Defaults taken from client configuration
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            chunk_size: config.chunk_size,
            ..Self::default()
        }
    }

    pub fn with_provider(mut self, provider: UploadProvider) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_category(mut self, category: UploadCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(UploadProgress) + Send + Sync + 'static,
    {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Copy with zero `max_retries` and `chunk_size` replaced by defaults.
    pub(crate) fn resolved(&self) -> Self {
        let mut options = self.clone();
        if options.max_retries == 0 {
            options.max_retries = DEFAULT_MAX_RETRIES;
        }
        if options.chunk_size == 0 {
            options.chunk_size = DEFAULT_CHUNK_SIZE;
        }
        options
    }

    pub(crate) fn report(&self, progress: UploadProgress) {
        if let Some(callback) = &self.on_progress {
            callback(progress);
        }
    }
}

impl fmt::Debug for UploadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadOptions")
            .field("provider", &self.provider)
            .field("category", &self.category)
            .field("folder", &self.folder)
            .field("on_progress", &self.on_progress.is_some())
            .field("max_retries", &self.max_retries)
            .field("chunk_size", &self.chunk_size)
            .finish()
    }
}

/// Final result of a verified upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadOutcome {
    pub url: String,
    pub provider: UploadProvider,
}
