//! Whole-file transfer: presign, PUT, verify, complete.

use riyobox_core::models::{CompleteUploadRequest, VerifyUploadRequest};
use riyobox_core::{UploadError, UploadResult};
use riyobox_storage::ObjectMetadata;

use crate::coordinator::UploadCoordinator;
use crate::deadline::with_deadline;
use crate::plan::unique_file_name;
use crate::retry::RetryPolicy;
use crate::types::{UploadFile, UploadOptions, UploadProgress};

impl UploadCoordinator {
    /// Upload `file` with a single PUT, retried as a whole. Returns the
    /// public URL once the control plane has verified the object.
    pub(crate) async fn upload_direct(
        &self,
        file: &UploadFile,
        options: &UploadOptions,
    ) -> UploadResult<String> {
        let policy = RetryPolicy::exponential(options.max_retries);

        let public_url = policy
            .run("whole_file_upload", &options.cancel, |attempt| {
                self.direct_attempt(file, options, attempt)
            })
            .await?;

        let complete = CompleteUploadRequest {
            url: public_url.clone(),
            file_name: file.name().to_string(),
            file_type: file.content_type().to_string(),
            file_size: file.size(),
            category: options.category,
        };
        if let Err(e) = self.control.complete_upload(&complete).await {
            tracing::warn!(error = %e, url = %public_url, "Failed to record upload completion");
        }

        options.report(UploadProgress::finished(file.size()));
        Ok(public_url)
    }

    async fn direct_attempt(
        &self,
        file: &UploadFile,
        options: &UploadOptions,
        attempt: u32,
    ) -> UploadResult<String> {
        let descriptor = file.descriptor(unique_file_name(file.name()), options.category);
        let target = self.control.presigned_target(&descriptor).await?;

        tracing::debug!(
            attempt = attempt,
            file_name = %descriptor.file_name,
            size = file.size(),
            "Uploading whole file"
        );

        let metadata = ObjectMetadata {
            original_filename: file.name().to_string(),
            category: options.category,
            original_size: file.size(),
        };
        // Each attempt reads the file from the start
        let body = file.open_body().await?;
        let put = with_deadline(
            self.data.put_object(
                &target.upload_url,
                body,
                file.content_type(),
                Some(&metadata),
                Some(self.put_timeout),
            ),
            self.put_timeout,
            &options.cancel,
        )
        .await?;

        let verify = VerifyUploadRequest {
            url: target.public_url.clone(),
            file_size: file.size(),
            file_type: file.content_type().to_string(),
            etag: put.etag,
        };
        let verified = self.control.verify_upload(&verify).await?;
        if !verified.verified {
            return Err(UploadError::Integrity("Upload verification failed".into()));
        }

        Ok(target.public_url)
    }
}
