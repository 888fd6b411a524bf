//! Riyobox Core Library
//!
//! This crate provides the models, error types, configuration, and validation
//! shared by the Riyobox upload client crates.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::{CdnConfig, ClientConfig};
pub use error::{UploadError, UploadResult};
pub use models::UploadCategory;
pub use storage_types::UploadProvider;
pub use validation::{format_bytes, validate_file, ValidationReport};
