//! Transfer planning: strategy selection, chunk partitioning and file naming.

use chrono::Utc;
use rand::Rng;
use riyobox_core::models::FileUploadConfig;
use riyobox_core::{UploadError, UploadProvider, UploadResult};
use std::path::Path;
use std::time::Duration;

use crate::types::UploadProgress;

/// Default part size of a chunked transfer (10 MiB)
pub const DEFAULT_CHUNK_SIZE: u64 = 10 * 1024 * 1024;

/// Attempts per part of a chunked transfer
pub const PART_MAX_ATTEMPTS: u32 = 3;

/// Upper bound of a whole-file PUT
pub const WHOLE_FILE_TIMEOUT: Duration = Duration::from_secs(300);

/// S3-compatible stores reject multipart uploads with more parts than this.
pub const MAX_PARTS: u64 = 10_000;

const RANDOM_SUFFIX_LEN: usize = 11;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// One element of the partition of `[0, size)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRange {
    /// 1-based
    pub part_number: u32,
    pub start: u64,
    pub end: u64,
}

impl ChunkRange {
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Number of parts needed for `size` bytes
pub fn total_chunks(size: u64, chunk_size: u64) -> u64 {
    if chunk_size == 0 {
        return 0;
    }
    size.div_ceil(chunk_size)
}

/// Partition `[0, size)` into consecutive ranges of at most `chunk_size` bytes.
pub fn chunk_ranges(size: u64, chunk_size: u64) -> UploadResult<Vec<ChunkRange>> {
    if chunk_size == 0 {
        return Err(UploadError::Config("Chunk size must be greater than zero".into()));
    }

    let count = total_chunks(size, chunk_size);
    if count > MAX_PARTS {
        return Err(UploadError::Config(format!(
            "File needs {} parts with a chunk size of {} bytes; at most {} are allowed",
            count, chunk_size, MAX_PARTS
        )));
    }

    Ok((0..count)
        .map(|index| ChunkRange {
            part_number: index as u32 + 1,
            start: index * chunk_size,
            end: ((index + 1) * chunk_size).min(size),
        })
        .collect())
}

/// How the bytes of one upload reach storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStrategy {
    /// Single form submission to the alternate CDN
    Cdn,
    /// One presigned PUT of the whole body
    Direct,
    /// Sequential presigned PUTs of fixed-size parts
    Multipart { chunk_size: u64, total_parts: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPlan {
    pub strategy: TransferStrategy,
    pub size: u64,
}

impl UploadPlan {
    /// Chunked transfer only when the backend allows it and the file does not
    /// fit in a single chunk.
    pub fn decide(
        provider: UploadProvider,
        file_config: &FileUploadConfig,
        size: u64,
        chunk_size: u64,
    ) -> UploadResult<Self> {
        let strategy = match provider {
            UploadProvider::Cdn => TransferStrategy::Cdn,
            UploadProvider::ObjectStorage if file_config.use_multipart && size > chunk_size => {
                let total_parts = total_chunks(size, chunk_size);
                if total_parts > MAX_PARTS {
                    return Err(UploadError::Config(format!(
                        "File needs {} parts; at most {} are allowed",
                        total_parts, MAX_PARTS
                    )));
                }
                TransferStrategy::Multipart {
                    chunk_size,
                    total_parts: total_parts as u32,
                }
            }
            UploadProvider::ObjectStorage => TransferStrategy::Direct,
        };

        Ok(Self { strategy, size })
    }
}

/// `<stem>-<unix millis>-<random base36>.<ext>`; names without an extension
/// keep the whole name as the stem.
pub fn unique_file_name(original: &str) -> String {
    let path = Path::new(original);
    let (stem, extension) = match (
        path.file_stem().and_then(|s| s.to_str()),
        path.extension().and_then(|e| e.to_str()),
    ) {
        (Some(stem), Some(ext)) => (stem, Some(ext)),
        _ => (original, None),
    };

    let mut rng = rand::rng();
    let suffix: String = (0..RANDOM_SUFFIX_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    let millis = Utc::now().timestamp_millis();

    match extension {
        Some(ext) => format!("{}-{}-{}.{}", stem, millis, suffix, ext),
        None => format!("{}-{}-{}", stem, millis, suffix),
    }
}

/// Progress after part `index` (0-based) of `total_parts` completed.
///
/// `loaded` counts whole chunks, so it overshoots `total` on the last part
/// whenever the final chunk is short.
pub fn chunk_progress(index: u32, total_parts: u32, chunk_size: u64, total: u64) -> UploadProgress {
    let done = index as u64 + 1;
    let percent = (done as f64 / total_parts.max(1) as f64 * 100.0).round();

    UploadProgress {
        progress: percent.clamp(0.0, 100.0) as u8,
        loaded: done * chunk_size,
        total,
        chunk: Some(index + 1),
        total_chunks: Some(total_parts),
    }
}
