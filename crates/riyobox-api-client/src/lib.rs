//! HTTP client for the Riyobox upload control plane.
//!
//! Provides a minimal client with Bearer auth, JSON helpers that map failures
//! onto [`UploadError`], and one typed method per control-plane operation.
//! The upload coordinator consumes it through the [`ControlPlane`] trait.

pub mod api;
pub mod control_plane;

use reqwest::{Client, RequestBuilder, Response};
use riyobox_core::models::ResponseBody;
use riyobox_core::{ClientConfig, UploadError, UploadResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

pub use control_plane::ControlPlane;

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// HTTP client for the control plane
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    pub fn new(base_url: String, token: String) -> UploadResult<Self> {
        Self::with_timeout(base_url, token, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: String, token: String, timeout: Duration) -> UploadResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UploadError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn from_config(config: &ClientConfig) -> UploadResult<Self> {
        Self::with_timeout(
            config.api_url.clone(),
            config.api_token.clone(),
            config.http_timeout,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.token)
    }

    /// GET request. Deserializes and checks the JSON response.
    pub async fn get<T>(&self, path: &str) -> UploadResult<T>
    where
        T: DeserializeOwned + ResponseBody,
    {
        let request = self.apply_auth(self.client.get(self.build_url(path)));
        let response = self.send(request, path).await?;
        parse_body(response).await
    }

    /// POST JSON body and deserialize the response.
    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> UploadResult<T>
    where
        T: DeserializeOwned + ResponseBody,
        B: Serialize + ?Sized,
    {
        let request = self.apply_auth(self.client.post(self.build_url(path)).json(body));
        let response = self.send(request, path).await?;
        parse_body(response).await
    }

    /// POST JSON body; the response body is an acknowledgement and is ignored.
    pub async fn post_ack<B>(&self, path: &str, body: &B) -> UploadResult<()>
    where
        B: Serialize + ?Sized,
    {
        let request = self.apply_auth(self.client.post(self.build_url(path)).json(body));
        self.send(request, path).await?;
        Ok(())
    }

    /// DELETE request with a JSON body. Returns Ok(()) on success.
    pub async fn delete_json<B>(&self, path: &str, body: &B) -> UploadResult<()>
    where
        B: Serialize + ?Sized,
    {
        let request = self.apply_auth(self.client.delete(self.build_url(path)).json(body));
        self.send(request, path).await?;
        Ok(())
    }

    async fn send(&self, request: RequestBuilder, path: &str) -> UploadResult<Response> {
        tracing::debug!(path = %path, "Control plane request");

        let response = request
            .send()
            .await
            .map_err(|e| UploadError::Transport(format!("Request to {} failed: {}", path, e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = server_message(&error_text);
            tracing::debug!(path = %path, status = %status, message = %message, "Control plane rejected request");
            return Err(UploadError::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

async fn parse_body<T>(response: Response) -> UploadResult<T>
where
    T: DeserializeOwned + ResponseBody,
{
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| UploadError::Transport(format!("Failed to read response body: {}", e)))?;

    let body: T =
        serde_json::from_str(&text).map_err(|e| UploadError::invalid_response(status, e))?;
    body.check()
        .map_err(|detail| UploadError::invalid_response(status, detail))?;

    Ok(body)
}

/// Extract the human-readable message from an error body.
///
/// Prefers a JSON `message` or `error` field and falls back to the raw text.
fn server_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(message) = value.get(key).and_then(|v| v.as_str()) {
                return message.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Unknown error".to_string()
    } else {
        trimmed.to_string()
    }
}
