//! Chunked transfer over the control plane's multipart endpoints.
//!
//! Parts go up strictly in order, one at a time, each with its own retry
//! budget. Any failure after initiation aborts the upload on a best-effort
//! basis and surfaces the original error.

use riyobox_core::models::{
    CompleteMultipartRequest, PartResult, PartUrlRequest, VerifyMultipartRequest,
};
use riyobox_core::{UploadError, UploadResult};

use crate::coordinator::UploadCoordinator;
use crate::deadline::cancellable;
use crate::plan::{chunk_progress, chunk_ranges, unique_file_name, ChunkRange, PART_MAX_ATTEMPTS};
use crate::retry::RetryPolicy;
use crate::types::{UploadFile, UploadOptions};

impl UploadCoordinator {
    pub(crate) async fn upload_multipart(
        &self,
        file: &UploadFile,
        options: &UploadOptions,
        chunk_size: u64,
    ) -> UploadResult<String> {
        let ranges = chunk_ranges(file.size(), chunk_size)?;
        let descriptor = file.descriptor(unique_file_name(file.name()), options.category);

        // Nothing to abort if initiation fails.
        let upload_id = self.control.initiate_multipart(&descriptor).await?.upload_id;

        tracing::info!(
            upload_id = %upload_id,
            file_name = %descriptor.file_name,
            total_parts = ranges.len(),
            chunk_size = chunk_size,
            "Multipart upload initiated"
        );

        match self
            .transfer_parts(file, options, &upload_id, &ranges, chunk_size)
            .await
        {
            Ok(url) => Ok(url),
            Err(e) => {
                if let Err(abort_error) = self.control.abort_multipart(&upload_id).await {
                    tracing::warn!(
                        upload_id = %upload_id,
                        error = %abort_error,
                        "Failed to abort multipart upload"
                    );
                }
                Err(e)
            }
        }
    }

    async fn transfer_parts(
        &self,
        file: &UploadFile,
        options: &UploadOptions,
        upload_id: &str,
        ranges: &[ChunkRange],
        chunk_size: u64,
    ) -> UploadResult<String> {
        let total_parts = ranges.len() as u32;
        let policy = RetryPolicy::linear(PART_MAX_ATTEMPTS);
        let mut parts = Vec::with_capacity(ranges.len());

        for (index, range) in ranges.iter().enumerate() {
            let part = self
                .upload_part(file, options, upload_id, *range, total_parts, &policy)
                .await?;
            parts.push(part);

            options.report(chunk_progress(
                index as u32,
                total_parts,
                chunk_size,
                file.size(),
            ));
        }

        let completed = cancellable(
            self.control.complete_multipart(&CompleteMultipartRequest {
                upload_id: upload_id.to_string(),
                parts,
            }),
            &options.cancel,
        )
        .await?;

        let verified = cancellable(
            self.control.verify_multipart(&VerifyMultipartRequest {
                upload_id: upload_id.to_string(),
                etag: completed.etag,
                file_size: file.size(),
            }),
            &options.cancel,
        )
        .await?;
        if !verified.verified {
            return Err(UploadError::Integrity(
                "Multipart upload verification failed".into(),
            ));
        }

        Ok(completed.url)
    }

    async fn upload_part(
        &self,
        file: &UploadFile,
        options: &UploadOptions,
        upload_id: &str,
        range: ChunkRange,
        total_parts: u32,
        policy: &RetryPolicy,
    ) -> UploadResult<PartResult> {
        // One chunk resident at a time; retries reuse it.
        let body = file.read_range(range.start, range.end).await?;

        policy
            .run("multipart_part", &options.cancel, |attempt| {
                let body = body.clone();
                async move {
                    let part_url = self
                        .control
                        .multipart_part_url(&PartUrlRequest {
                            upload_id: upload_id.to_string(),
                            part_number: range.part_number,
                            total_parts,
                        })
                        .await?
                        .part_url;

                    tracing::debug!(
                        upload_id = %upload_id,
                        part_number = range.part_number,
                        attempt = attempt,
                        size = range.len(),
                        "Uploading part"
                    );

                    let put = cancellable(
                        self.data.put_object(
                            &part_url,
                            body.into(),
                            file.content_type(),
                            None,
                            None,
                        ),
                        &options.cancel,
                    )
                    .await?;

                    let etag = put.etag.ok_or_else(|| {
                        UploadError::Integrity(format!(
                            "No ETag received for part {}",
                            range.part_number
                        ))
                    })?;

                    Ok(PartResult {
                        part_number: range.part_number,
                        etag,
                        size: range.len(),
                    })
                }
            })
            .await
    }
}
