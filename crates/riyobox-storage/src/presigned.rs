use crate::traits::{DataPlane, ObjectMetadata, PutBody, PutResponse};
use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, ETAG};
use reqwest::Client;
use riyobox_core::{UploadError, UploadResult};
use std::time::Duration;

/// Presigned-URL PUT client
///
/// The underlying client has no total timeout. Each request carries its own
/// bound: the caller's, or `request_timeout` when the caller gives none.
#[derive(Clone, Debug)]
pub struct HttpDataPlane {
    client: Client,
    request_timeout: Duration,
}

impl HttpDataPlane {
    pub fn new(request_timeout: Duration) -> UploadResult<Self> {
        let client = Client::builder()
            .connect_timeout(request_timeout)
            .build()
            .map_err(|e| UploadError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            request_timeout,
        })
    }
}

#[async_trait]
impl DataPlane for HttpDataPlane {
    async fn put_object(
        &self,
        url: &str,
        body: PutBody,
        content_type: &str,
        metadata: Option<&ObjectMetadata>,
        timeout: Option<Duration>,
    ) -> UploadResult<PutResponse> {
        let size = body.len();
        let timeout = timeout.unwrap_or(self.request_timeout);

        let mut request = self
            .client
            .put(url)
            .timeout(timeout)
            .header(CONTENT_TYPE, content_type);

        // Buffered bodies get Content-Length from reqwest; streams would go chunked.
        if matches!(body, PutBody::Streamed { .. }) {
            request = request.header(CONTENT_LENGTH, size);
        }
        request = request.body(body.into_body());

        if let Some(metadata) = metadata {
            for (name, value) in metadata.headers() {
                request = request.header(name, value);
            }
        }

        let start = std::time::Instant::now();
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                UploadError::Timeout(timeout)
            } else {
                UploadError::Transport(format!("Upload failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                status = %status,
                size = size,
                "Storage rejected PUT"
            );
            return Err(UploadError::Transport(format!(
                "Upload failed: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            )
            .trim_end()
            .to_string()));
        }

        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from);

        tracing::debug!(
            size = size,
            has_etag = etag.is_some(),
            duration_ms = start.elapsed().as_millis() as u64,
            "PUT to storage completed"
        );

        Ok(PutResponse { etag })
    }
}
