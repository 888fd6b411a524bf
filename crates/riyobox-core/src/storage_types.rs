use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Upload provider types
///
/// `ObjectStorage` is the S3-compatible bucket reached through presigned URLs
/// issued by the control plane. `Cdn` is the alternate media CDN that accepts a
/// direct multipart form submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadProvider {
    #[default]
    #[serde(rename = "r2")]
    ObjectStorage,
    #[serde(rename = "cloudinary")]
    Cdn,
}

impl FromStr for UploadProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "r2" | "s3" | "object-storage" => Ok(UploadProvider::ObjectStorage),
            "cloudinary" | "cdn" => Ok(UploadProvider::Cdn),
            _ => Err(anyhow::anyhow!("Invalid upload provider: {}", s)),
        }
    }
}

impl Display for UploadProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UploadProvider::ObjectStorage => write!(f, "r2"),
            UploadProvider::Cdn => write!(f, "cloudinary"),
        }
    }
}
