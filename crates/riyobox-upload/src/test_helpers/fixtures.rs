use async_trait::async_trait;
use bytes::Bytes;
use riyobox_core::UploadResult;
use riyobox_storage::ByteStream;
use std::sync::Arc;

use crate::types::{UploadFile, UploadSource};

pub const MIB: u64 = 1024 * 1024;

/// Source of `len` zero bytes that only allocates the requested range
pub struct ZeroSource {
    pub len: u64,
}

#[async_trait]
impl UploadSource for ZeroSource {
    fn len(&self) -> u64 {
        self.len
    }

    async fn read_range(&self, start: u64, end: u64) -> UploadResult<Bytes> {
        Ok(Bytes::from(vec![0u8; (end - start) as usize]))
    }

    async fn open_stream(&self) -> UploadResult<ByteStream> {
        let block = Bytes::from(vec![0u8; MIB as usize]);
        let len = self.len;
        let chunks = (0..len.div_ceil(MIB)).map(move |i| {
            let size = (len - i * MIB).min(MIB) as usize;
            Ok::<_, std::io::Error>(block.slice(..size))
        });
        Ok(Box::pin(futures::stream::iter(chunks)))
    }
}

pub fn video_file(name: &str, size: u64) -> UploadFile {
    UploadFile::new(name, "video/mp4", Arc::new(ZeroSource { len: size }))
}

pub fn jpeg_thumbnail(size: u64) -> UploadFile {
    UploadFile::new("thumb.jpg", "image/jpeg", Arc::new(ZeroSource { len: size }))
}
