//! Configuration module
//!
//! Settings for the control-plane client, the upload defaults, and the
//! alternate CDN provider, loaded from the environment (and `.env`).

use std::env;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:8080/api";
const HTTP_TIMEOUT_SECS: u64 = 120;
const UPLOAD_MAX_RETRIES: u32 = 3;
const UPLOAD_CHUNK_SIZE_MB: u64 = 10;
const CDN_UPLOAD_PRESET: &str = "riyobox_uploads";
const CDN_FOLDER: &str = "riyobox";

/// Alternate CDN provider settings
#[derive(Clone, Debug)]
pub struct CdnConfig {
    pub cloud_name: String,
    pub upload_preset: String,
    pub folder: String,
}

/// Upload client configuration
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: String,
    pub api_token: String,
    /// Default bound for every HTTP request that has no explicit timeout
    pub http_timeout: Duration,
    pub max_retries: u32,
    pub chunk_size: u64,
    /// `None` when no CDN cloud name is configured
    pub cdn: Option<CdnConfig>,
}

impl ClientConfig {
    /// Load configuration from the process environment, reading `.env` first.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("RIYOBOX_API_URL")
            .or_else(|| lookup("API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let api_token = lookup("RIYOBOX_API_TOKEN")
            .or_else(|| lookup("JWT_TOKEN"))
            .ok_or_else(|| anyhow::anyhow!("Missing API token. Set RIYOBOX_API_TOKEN or JWT_TOKEN"))?;

        let http_timeout_secs = lookup("RIYOBOX_HTTP_TIMEOUT_SECS")
            .map(|v| v.parse::<u64>())
            .transpose()
            .map_err(|_| anyhow::anyhow!("RIYOBOX_HTTP_TIMEOUT_SECS must be a valid number"))?
            .unwrap_or(HTTP_TIMEOUT_SECS);

        let max_retries = lookup("RIYOBOX_UPLOAD_MAX_RETRIES")
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|_| anyhow::anyhow!("RIYOBOX_UPLOAD_MAX_RETRIES must be a valid number"))?
            .unwrap_or(UPLOAD_MAX_RETRIES);

        let chunk_size_mb = lookup("RIYOBOX_UPLOAD_CHUNK_SIZE_MB")
            .map(|v| v.parse::<u64>())
            .transpose()
            .map_err(|_| anyhow::anyhow!("RIYOBOX_UPLOAD_CHUNK_SIZE_MB must be a valid number"))?
            .unwrap_or(UPLOAD_CHUNK_SIZE_MB);

        let chunk_size = chunk_size_mb.checked_mul(1024 * 1024).ok_or_else(|| {
            anyhow::anyhow!("RIYOBOX_UPLOAD_CHUNK_SIZE_MB is too large")
        })?;

        let cdn = lookup("RIYOBOX_CDN_CLOUD_NAME")
            .filter(|name| !name.trim().is_empty())
            .map(|cloud_name| CdnConfig {
                cloud_name,
                upload_preset: lookup("RIYOBOX_CDN_UPLOAD_PRESET")
                    .unwrap_or_else(|| CDN_UPLOAD_PRESET.to_string()),
                folder: lookup("RIYOBOX_CDN_FOLDER").unwrap_or_else(|| CDN_FOLDER.to_string()),
            });

        let config = Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_token,
            http_timeout: Duration::from_secs(http_timeout_secs),
            max_retries,
            chunk_size,
            cdn,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "RIYOBOX_API_URL must be an http(s) URL, got '{}'",
                self.api_url
            ));
        }

        if self.api_token.trim().is_empty() {
            return Err(anyhow::anyhow!("RIYOBOX_API_TOKEN must not be empty"));
        }

        if self.max_retries == 0 {
            return Err(anyhow::anyhow!(
                "RIYOBOX_UPLOAD_MAX_RETRIES must be at least 1"
            ));
        }

        if self.chunk_size == 0 {
            return Err(anyhow::anyhow!(
                "RIYOBOX_UPLOAD_CHUNK_SIZE_MB must be at least 1"
            ));
        }

        if self.http_timeout.is_zero() {
            return Err(anyhow::anyhow!("RIYOBOX_HTTP_TIMEOUT_SECS must be at least 1"));
        }

        Ok(())
    }
}
