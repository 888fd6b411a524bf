use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

pub const MAX_VIDEO_SIZE_BYTES: u64 = 2 * 1024 * 1024 * 1024;
pub const MAX_IMAGE_SIZE_BYTES: u64 = 50 * 1024 * 1024;

pub const VIDEO_CONTENT_TYPES: &[&str] = &[
    "video/mp4",
    "video/mkv",
    "video/webm",
    "video/avi",
    "video/mov",
];

pub const IMAGE_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Target category of an upload. Drives size limits, allowed MIME types and
/// the storage path chosen by the control plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadCategory {
    #[default]
    Videos,
    Thumbnails,
    Posters,
    Subtitles,
}

impl UploadCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadCategory::Videos => "videos",
            UploadCategory::Thumbnails => "thumbnails",
            UploadCategory::Posters => "posters",
            UploadCategory::Subtitles => "subtitles",
        }
    }

    /// Maximum accepted file size in bytes
    pub fn max_file_size(&self) -> u64 {
        match self {
            UploadCategory::Videos => MAX_VIDEO_SIZE_BYTES,
            _ => MAX_IMAGE_SIZE_BYTES,
        }
    }

    /// MIME allow-list, or `None` when the category accepts any type.
    pub fn allowed_content_types(&self) -> Option<&'static [&'static str]> {
        match self {
            UploadCategory::Videos => Some(VIDEO_CONTENT_TYPES),
            UploadCategory::Thumbnails | UploadCategory::Posters => Some(IMAGE_CONTENT_TYPES),
            UploadCategory::Subtitles => None,
        }
    }
}

impl FromStr for UploadCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "videos" | "video" => Ok(UploadCategory::Videos),
            "thumbnails" | "thumbnail" => Ok(UploadCategory::Thumbnails),
            "posters" | "poster" => Ok(UploadCategory::Posters),
            "subtitles" | "subtitle" => Ok(UploadCategory::Subtitles),
            _ => Err(anyhow::anyhow!("Invalid upload category: {}", s)),
        }
    }
}

impl Display for UploadCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
