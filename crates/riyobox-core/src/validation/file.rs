use serde::Serialize;

use crate::models::UploadCategory;

/// Reasons a file is rejected before upload
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileRejection {
    #[error("File too large. Maximum size is {}", format_bytes(*max, 2))]
    FileTooLarge { size: u64, max: u64 },

    #[error("Invalid video format. Allowed: MP4, MKV, WebM, AVI, MOV")]
    InvalidVideoFormat { content_type: String },

    #[error("Invalid image format. Allowed: JPEG, PNG, WebP, GIF")]
    InvalidImageFormat { content_type: String },
}

/// Result of pre-flight validation. Never an error: callers inspect `valid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_rejections(rejections: Vec<FileRejection>) -> Self {
        Self {
            valid: rejections.is_empty(),
            errors: rejections.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Category-specific file validator
///
/// Size and MIME checks only; no I/O happens here, so the same input always
/// yields the same report.
pub struct FileValidator {
    category: UploadCategory,
    max_file_size: u64,
    allowed_content_types: Option<&'static [&'static str]>,
}

impl FileValidator {
    pub fn for_category(category: UploadCategory) -> Self {
        Self {
            category,
            max_file_size: category.max_file_size(),
            allowed_content_types: category.allowed_content_types(),
        }
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: u64) -> Result<(), FileRejection> {
        if size > self.max_file_size {
            return Err(FileRejection::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }
        Ok(())
    }

    /// Validate content type against the category allow-list
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), FileRejection> {
        let Some(allowed) = self.allowed_content_types else {
            return Ok(());
        };

        let normalized = content_type.trim().to_lowercase();
        if allowed.iter().any(|ct| *ct == normalized) {
            return Ok(());
        }

        let content_type = content_type.to_string();
        Err(match self.category {
            UploadCategory::Videos => FileRejection::InvalidVideoFormat { content_type },
            _ => FileRejection::InvalidImageFormat { content_type },
        })
    }

    /// Run every check and collect all rejections
    pub fn validate_all(&self, size: u64, content_type: &str) -> ValidationReport {
        let rejections = [
            self.validate_file_size(size),
            self.validate_content_type(content_type),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect();

        ValidationReport::from_rejections(rejections)
    }
}

/// Validate a file of `size` bytes and MIME `content_type` for `category`.
pub fn validate_file(size: u64, content_type: &str, category: UploadCategory) -> ValidationReport {
    FileValidator::for_category(category).validate_all(size, content_type)
}

/// Human-readable size using 1024-based units, e.g. `1.5 KB` or `2 GB`.
///
/// Trailing zeros of the fractional part are dropped.
pub fn format_bytes(bytes: u64, decimals: usize) -> String {
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let formatted = format!("{:.*}", decimals, value);
    let trimmed = if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        formatted.as_str()
    };

    format!("{} {}", trimmed, UNITS[unit])
}
