//! Validation modules

pub mod content_type;
pub mod file;

pub use content_type::guess_content_type;
pub use file::{format_bytes, validate_file, FileRejection, FileValidator, ValidationReport};
