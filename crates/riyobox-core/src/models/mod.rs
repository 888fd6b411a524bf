//! Data models for the upload client
//!
//! `category` holds the upload categories and their limits; `upload` holds the
//! request/response schema of every control-plane call.

mod category;
pub mod upload;

pub use category::*;
pub use upload::*;
