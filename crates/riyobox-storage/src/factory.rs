use crate::{CdnUploader, CloudinaryUploader, DataPlane, HttpDataPlane};
use riyobox_core::{ClientConfig, UploadResult};
use std::sync::Arc;

/// Create the presigned-URL data plane from configuration
///
/// `http_timeout` becomes the default bound of each PUT.
pub fn create_data_plane(config: &ClientConfig) -> UploadResult<Arc<dyn DataPlane>> {
    let data_plane = HttpDataPlane::new(config.http_timeout)?;
    Ok(Arc::new(data_plane))
}

/// Create the alternate CDN uploader, or `None` when no CDN is configured
pub fn create_cdn_uploader(config: &ClientConfig) -> UploadResult<Option<Arc<dyn CdnUploader>>> {
    let Some(cdn) = config.cdn.as_ref() else {
        tracing::debug!("No CDN cloud name configured, CDN provider disabled");
        return Ok(None);
    };

    let uploader = CloudinaryUploader::new(cdn, config.http_timeout)?;
    Ok(Some(Arc::new(uploader)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use riyobox_core::CdnConfig;
    use std::time::Duration;

    fn config(cdn: Option<CdnConfig>) -> ClientConfig {
        ClientConfig {
            api_url: "http://localhost:8080/api".to_string(),
            api_token: "t".to_string(),
            http_timeout: Duration::from_secs(30),
            max_retries: 3,
            chunk_size: 10 * 1024 * 1024,
            cdn,
        }
    }

    #[test]
    fn cdn_uploader_requires_cloud_name() {
        assert!(create_cdn_uploader(&config(None)).unwrap().is_none());

        let cdn = CdnConfig {
            cloud_name: "riyobox-cloud".to_string(),
            upload_preset: "riyobox_uploads".to_string(),
            folder: "riyobox".to_string(),
        };
        assert!(create_cdn_uploader(&config(Some(cdn))).unwrap().is_some());
    }

    #[test]
    fn data_plane_builds() {
        assert!(create_data_plane(&config(None)).is_ok());
    }
}
