//! Upload coordinator: validation, strategy selection and dispatch.

use futures::stream::{self, StreamExt, TryStreamExt};
use riyobox_api_client::{ApiClient, ControlPlane};
use riyobox_core::models::{FileUploadConfig, StorageConfig, UploadStatus};
use riyobox_core::{
    validate_file, ClientConfig, UploadCategory, UploadError, UploadResult, ValidationReport,
};
use riyobox_storage::{create_cdn_uploader, create_data_plane, CdnUpload, CdnUploader, DataPlane};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::deadline::with_deadline;
use crate::plan::{TransferStrategy, UploadPlan, WHOLE_FILE_TIMEOUT};
use crate::types::{UploadFile, UploadOptions, UploadOutcome, UploadProgress};

/// Drives uploads against a control plane and a data plane.
///
/// Holds only shared, immutable clients; concurrent `upload` calls do not
/// interact.
#[derive(Clone)]
pub struct UploadCoordinator {
    pub(crate) control: Arc<dyn ControlPlane>,
    pub(crate) data: Arc<dyn DataPlane>,
    cdn: Option<Arc<dyn CdnUploader>>,
    pub(crate) put_timeout: Duration,
}

impl UploadCoordinator {
    pub fn new(
        control: Arc<dyn ControlPlane>,
        data: Arc<dyn DataPlane>,
        cdn: Option<Arc<dyn CdnUploader>>,
    ) -> Self {
        Self {
            control,
            data,
            cdn,
            put_timeout: WHOLE_FILE_TIMEOUT,
        }
    }

    /// Override the bound of a whole-file PUT or CDN upload.
    pub fn with_put_timeout(mut self, timeout: Duration) -> Self {
        self.put_timeout = timeout;
        self
    }

    /// Build the HTTP-backed coordinator from configuration.
    pub fn from_config(config: &ClientConfig) -> UploadResult<Self> {
        let control = ApiClient::from_config(config)?;
        let data = create_data_plane(config)?;
        let cdn = create_cdn_uploader(config)?;

        Ok(Self::new(Arc::new(control), data, cdn))
    }

    /// Pre-flight size and MIME check. No I/O.
    pub fn validate_file(&self, file: &UploadFile, category: UploadCategory) -> ValidationReport {
        validate_file(file.size(), file.content_type(), category)
    }

    /// Ask the control plane how `file` should be transferred.
    pub async fn plan(&self, file: &UploadFile, options: &UploadOptions) -> UploadResult<UploadPlan> {
        let file_config = self.file_upload_config(file, options.category).await?;
        UploadPlan::decide(
            options.provider,
            &file_config,
            file.size(),
            options.resolved().chunk_size,
        )
    }

    /// Upload one file and return its verified public URL.
    #[tracing::instrument(
        skip(self, file, options),
        fields(
            file_name = %file.name(),
            size = file.size(),
            provider = %options.provider,
            category = %options.category
        )
    )]
    pub async fn upload(
        &self,
        file: &UploadFile,
        options: &UploadOptions,
    ) -> UploadResult<UploadOutcome> {
        let report = self.validate_file(file, options.category);
        if !report.valid {
            return Err(UploadError::Validation(report.errors));
        }
        if options.cancel.is_cancelled() {
            return Err(UploadError::Cancelled);
        }

        let options = &options.resolved();
        let start = Instant::now();
        let result = self.dispatch(file, options).await;

        match &result {
            Ok(url) => tracing::info!(
                url = %url,
                duration_ms = start.elapsed().as_millis() as u64,
                "Upload completed"
            ),
            Err(e) => tracing::error!(
                error = %e,
                error_code = e.error_code(),
                duration_ms = start.elapsed().as_millis() as u64,
                "Upload failed"
            ),
        }

        result.map(|url| UploadOutcome {
            url,
            provider: options.provider,
        })
    }

    async fn dispatch(&self, file: &UploadFile, options: &UploadOptions) -> UploadResult<String> {
        let plan = self.plan(file, options).await?;

        match plan.strategy {
            TransferStrategy::Cdn => self.upload_cdn(file, options).await,
            TransferStrategy::Direct => self.upload_direct(file, options).await,
            TransferStrategy::Multipart { chunk_size, .. } => {
                self.upload_multipart(file, options, chunk_size).await
            }
        }
    }

    async fn upload_cdn(&self, file: &UploadFile, options: &UploadOptions) -> UploadResult<String> {
        let cdn = self.cdn.as_ref().ok_or_else(|| {
            UploadError::Config("CDN provider requested but no CDN cloud name is configured".into())
        })?;

        tracing::warn!("CDN uploads are not verified by the control plane");

        let body = file.open_body().await?;
        let url = with_deadline(
            cdn.upload(CdnUpload {
                file_name: file.name().to_string(),
                content_type: file.content_type().to_string(),
                body,
                category: options.category,
                folder: options.folder.clone(),
            }),
            self.put_timeout,
            &options.cancel,
        )
        .await?;

        options.report(UploadProgress::finished(file.size()));
        Ok(url)
    }

    /// Upload every file concurrently with no cap; fails on the first error.
    ///
    /// Every transfer may be in flight at once, so keep batches small or use
    /// [`UploadCoordinator::upload_many_bounded`].
    pub async fn upload_many(
        &self,
        files: &[UploadFile],
        options: &UploadOptions,
    ) -> UploadResult<Vec<UploadOutcome>> {
        futures::future::try_join_all(files.iter().map(|file| self.upload(file, options))).await
    }

    /// Like [`UploadCoordinator::upload_many`] with at most `limit` uploads in
    /// flight. Results keep input order.
    pub async fn upload_many_bounded(
        &self,
        files: &[UploadFile],
        options: &UploadOptions,
        limit: usize,
    ) -> UploadResult<Vec<UploadOutcome>> {
        stream::iter(files.iter().map(|file| self.upload(file, options)))
            .buffered(limit.max(1))
            .try_collect()
            .await
    }

    pub async fn delete_file(&self, url: &str) -> UploadResult<()> {
        self.control.delete_file(url).await
    }

    pub async fn upload_status(&self, upload_id: &str) -> UploadResult<UploadStatus> {
        self.control.upload_status(upload_id).await
    }

    pub async fn storage_config(&self) -> UploadResult<StorageConfig> {
        self.control.storage_config().await
    }

    /// Backend transfer settings for `file`, looked up under its original name.
    pub async fn file_upload_config(
        &self,
        file: &UploadFile,
        category: UploadCategory,
    ) -> UploadResult<FileUploadConfig> {
        let descriptor = file.descriptor(file.name().to_string(), category);
        self.control.file_upload_config(&descriptor).await
    }
}

impl std::fmt::Debug for UploadCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadCoordinator")
            .field("cdn", &self.cdn.is_some())
            .field("put_timeout", &self.put_timeout)
            .finish()
    }
}
