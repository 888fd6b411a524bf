//! Riyobox upload coordinator
//!
//! Moves files from the client to object storage through presigned URLs
//! issued by the Riyobox control plane, either as a single PUT or as a
//! sequence of multipart parts, and only reports success once the control
//! plane has verified the stored object.

pub mod coordinator;
mod deadline;
mod direct;
mod multipart;
pub mod plan;
pub mod retry;
pub mod types;

#[cfg(test)]
mod test_helpers;

pub use coordinator::UploadCoordinator;
pub use plan::{unique_file_name, ChunkRange, TransferStrategy, UploadPlan};
pub use retry::{Backoff, RetryPolicy, RetryState};
pub use types::{
    FileSource, MemorySource, ProgressCallback, UploadFile, UploadOptions, UploadOutcome,
    UploadProgress, UploadSource,
};
