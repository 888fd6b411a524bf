//! Riyobox Storage Library
//!
//! Data-plane clients used by the upload coordinator:
//!
//! - [`HttpDataPlane`] sends a whole file (streamed) or one buffered part to
//!   a presigned URL with a single `PUT` and reports the returned ETag.
//! - [`CloudinaryUploader`] submits a file to the alternate CDN provider as a
//!   multipart form and returns its secure URL.

pub mod cdn;
pub mod factory;
pub mod presigned;
pub mod traits;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use cdn::CloudinaryUploader;
pub use factory::{create_cdn_uploader, create_data_plane};
pub use presigned::HttpDataPlane;
pub use traits::{
    ByteStream, CdnUpload, CdnUploader, DataPlane, ObjectMetadata, PutBody, PutResponse,
};
