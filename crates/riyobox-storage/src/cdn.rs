use crate::traits::{CdnUpload, CdnUploader};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use riyobox_core::{CdnConfig, UploadError, UploadResult};
use serde::Deserialize;
use std::time::Duration;

const CLOUDINARY_API_URL: &str = "https://api.cloudinary.com";

/// Transcoding presets requested for every video
const VIDEO_EAGER_TRANSFORMS: &str = "sp_full_hd/mp4,sp_hd/mp4,sp_sd/mp4";

#[derive(Debug, Deserialize)]
struct CdnUploadResponse {
    secure_url: String,
}

/// Alternate CDN provider (Cloudinary unsigned uploads)
///
/// `timeout` only bounds connection setup; the caller bounds the upload as a
/// whole, since a 2 GB video can take minutes.
#[derive(Clone, Debug)]
pub struct CloudinaryUploader {
    client: Client,
    base_url: String,
    cloud_name: String,
    upload_preset: String,
    folder: String,
}

impl CloudinaryUploader {
    pub fn new(config: &CdnConfig, timeout: Duration) -> UploadResult<Self> {
        Self::with_base_url(config, timeout, CLOUDINARY_API_URL.to_string())
    }

    /// Same as [`CloudinaryUploader::new`] with a custom API origin.
    pub fn with_base_url(
        config: &CdnConfig,
        timeout: Duration,
        base_url: String,
    ) -> UploadResult<Self> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(|e| UploadError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            cloud_name: config.cloud_name.clone(),
            upload_preset: config.upload_preset.clone(),
            folder: config.folder.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1_1/{}/upload", self.base_url, self.cloud_name)
    }

    fn build_form(&self, upload: CdnUpload) -> UploadResult<Form> {
        let is_video = upload.content_type.starts_with("video/");
        let size = upload.body.len();
        let file = Part::stream_with_length(upload.body.into_body(), size)
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)
            .map_err(|e| UploadError::Config(format!("Invalid content type: {}", e)))?;

        let mut form = Form::new()
            .part("file", file)
            .text("upload_preset", self.upload_preset.clone())
            .text("folder", upload.folder.unwrap_or_else(|| self.folder.clone()))
            .text("context", format!("category={}", upload.category));

        if is_video {
            form = form
                .text("resource_type", "video")
                .text("eager", VIDEO_EAGER_TRANSFORMS)
                .text("eager_async", "true");
        }

        Ok(form)
    }
}

#[async_trait]
impl CdnUploader for CloudinaryUploader {
    async fn upload(&self, upload: CdnUpload) -> UploadResult<String> {
        let file_name = upload.file_name.clone();
        let form = self.build_form(upload)?;

        let response = self
            .client
            .post(self.endpoint())
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Transport(format!("CDN upload failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = %status, file_name = %file_name, "CDN upload rejected");
            return Err(UploadError::Transport(format!(
                "CDN upload failed: {}",
                status.canonical_reason().unwrap_or(status.as_str())
            )));
        }

        let body: CdnUploadResponse = response
            .json()
            .await
            .map_err(|e| UploadError::invalid_response(status.as_u16(), e))?;

        if body.secure_url.trim().is_empty() {
            return Err(UploadError::invalid_response(
                status.as_u16(),
                "`secure_url` is empty",
            ));
        }

        Ok(body.secure_url)
    }
}
