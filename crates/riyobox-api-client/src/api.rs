//! Control-plane operations of the upload API.
//!
//! Request and response types live in `riyobox_core::models`.

use crate::ApiClient;
use riyobox_core::models::{
    AbortMultipartRequest, CompleteMultipartRequest, CompleteMultipartResponse,
    CompleteUploadRequest, DeleteFileRequest, FileDescriptor, FileUploadConfig,
    InitiateMultipartResponse, PartUrlRequest, PartUrlResponse, PresignedTarget, StorageConfig,
    UploadStatus, VerifyMultipartRequest, VerifyResponse, VerifyUploadRequest,
};
use riyobox_core::UploadResult;

impl ApiClient {
    /// Storage account details (`GET /upload/config`).
    pub async fn storage_config(&self) -> UploadResult<StorageConfig> {
        self.get("/upload/config").await
    }

    /// Server-side strategy for one file (`POST /upload/config/file`).
    pub async fn file_upload_config(&self, file: &FileDescriptor) -> UploadResult<FileUploadConfig> {
        self.post_json("/upload/config/file", file).await
    }

    /// Fresh presigned PUT target for a whole-file upload.
    pub async fn presigned_target(&self, file: &FileDescriptor) -> UploadResult<PresignedTarget> {
        self.post_json("/upload/presigned", file).await
    }

    pub async fn verify_upload(&self, request: &VerifyUploadRequest) -> UploadResult<VerifyResponse> {
        self.post_json("/upload/verify", request).await
    }

    /// Notify the backend about a verified upload. The answer is not inspected.
    pub async fn complete_upload(&self, request: &CompleteUploadRequest) -> UploadResult<()> {
        self.post_ack("/upload/complete", request).await
    }

    pub async fn initiate_multipart(
        &self,
        file: &FileDescriptor,
    ) -> UploadResult<InitiateMultipartResponse> {
        self.post_json("/upload/multipart/initiate", file).await
    }

    /// Presigned URL for one part of a multipart upload.
    pub async fn multipart_part_url(&self, request: &PartUrlRequest) -> UploadResult<PartUrlResponse> {
        self.post_json("/upload/multipart/part", request).await
    }

    pub async fn complete_multipart(
        &self,
        request: &CompleteMultipartRequest,
    ) -> UploadResult<CompleteMultipartResponse> {
        self.post_json("/upload/multipart/complete", request).await
    }

    pub async fn verify_multipart(
        &self,
        request: &VerifyMultipartRequest,
    ) -> UploadResult<VerifyResponse> {
        self.post_json("/upload/multipart/verify", request).await
    }

    pub async fn abort_multipart(&self, upload_id: &str) -> UploadResult<()> {
        let request = AbortMultipartRequest {
            upload_id: upload_id.to_string(),
        };
        self.post_ack("/upload/multipart/abort", &request).await
    }

    /// Delete a stored object by its public URL.
    pub async fn delete_file(&self, url: &str) -> UploadResult<()> {
        let request = DeleteFileRequest {
            url: url.to_string(),
        };
        self.delete_json("/upload/delete", &request).await
    }

    pub async fn upload_status(&self, upload_id: &str) -> UploadResult<UploadStatus> {
        self.get(&format!("/upload/status/{}", urlencoding::encode(upload_id)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use riyobox_core::models::{PartResult, UploadState};
    use riyobox_core::{UploadCategory, UploadError};
    use serde_json::json;

    fn client_for(server: &mockito::ServerGuard) -> ApiClient {
        ApiClient::new(server.url(), "test-token".to_string()).unwrap()
    }

    fn descriptor() -> FileDescriptor {
        FileDescriptor {
            file_name: "poster-1700000000000-abc123.jpg".to_string(),
            file_type: "image/jpeg".to_string(),
            file_size: 2048,
            category: UploadCategory::Posters,
        }
    }

    #[tokio::test]
    async fn presigned_target_sends_descriptor_with_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/upload/presigned")
            .match_header("authorization", "Bearer test-token")
            .match_body(Matcher::Json(json!({
                "fileName": "poster-1700000000000-abc123.jpg",
                "fileType": "image/jpeg",
                "fileSize": 2048,
                "category": "posters"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"uploadUrl":"https://storage.example/put?sig=1","publicUrl":"https://media.example/posters/a.jpg"}"#,
            )
            .create_async()
            .await;

        let target = client_for(&server)
            .presigned_target(&descriptor())
            .await
            .unwrap();

        assert_eq!(target.upload_url, "https://storage.example/put?sig=1");
        assert_eq!(target.public_url, "https://media.example/posters/a.jpg");
        assert!(target.upload_id.is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_carries_server_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/upload/multipart/initiate")
            .with_status(403)
            .with_body(r#"{"message":"Access is denied"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .initiate_multipart(&descriptor())
            .await
            .unwrap_err();

        match err {
            UploadError::Server { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "Access is denied");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_field_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/upload/verify")
            .with_status(200)
            .with_body(r#"{"ok":true}"#)
            .create_async()
            .await;

        let request = VerifyUploadRequest {
            url: "https://media.example/a.jpg".to_string(),
            file_size: 1,
            file_type: "image/jpeg".to_string(),
            etag: Some("\"e\"".to_string()),
        };
        let err = client_for(&server).verify_upload(&request).await.unwrap_err();

        assert!(matches!(err, UploadError::Server { status: 200, .. }));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn empty_upload_id_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/upload/multipart/initiate")
            .with_status(200)
            .with_body(r#"{"uploadId":""}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .initiate_multipart(&descriptor())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("uploadId"));
    }

    #[tokio::test]
    async fn complete_multipart_posts_ordered_parts() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/upload/multipart/complete")
            .match_body(Matcher::Json(json!({
                "uploadId": "mp-42",
                "parts": [
                    { "partNumber": 1, "etag": "\"a\"", "size": 10 },
                    { "partNumber": 2, "etag": "\"b\"", "size": 4 }
                ]
            })))
            .with_status(200)
            .with_body(r#"{"url":"https://media.example/videos/x.mp4","etag":"\"abc-2\""}"#)
            .create_async()
            .await;

        let request = CompleteMultipartRequest {
            upload_id: "mp-42".to_string(),
            parts: vec![
                PartResult {
                    part_number: 1,
                    etag: "\"a\"".to_string(),
                    size: 10,
                },
                PartResult {
                    part_number: 2,
                    etag: "\"b\"".to_string(),
                    size: 4,
                },
            ],
        };
        let response = client_for(&server)
            .complete_multipart(&request)
            .await
            .unwrap();

        assert_eq!(response.url, "https://media.example/videos/x.mp4");
        assert_eq!(response.etag, "\"abc-2\"");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn acknowledgements_ignore_the_body() {
        let mut server = mockito::Server::new_async().await;
        let abort = server
            .mock("POST", "/upload/multipart/abort")
            .match_body(Matcher::Json(json!({ "uploadId": "mp-9" })))
            .with_status(204)
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/upload/delete")
            .match_body(Matcher::Json(json!({ "url": "https://media.example/a.jpg" })))
            .with_status(200)
            .with_body("deleted")
            .create_async()
            .await;

        let client = client_for(&server);
        client.abort_multipart("mp-9").await.unwrap();
        client
            .delete_file("https://media.example/a.jpg")
            .await
            .unwrap();

        abort.assert_async().await;
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn upload_status_reads_state() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/upload/status/mp-7")
            .with_status(200)
            .with_body(r#"{"status":"completed","progress":100,"url":"https://media.example/v.mp4"}"#)
            .create_async()
            .await;

        let status = client_for(&server).upload_status("mp-7").await.unwrap();

        assert_eq!(status.status, UploadState::Completed);
        assert_eq!(status.url.as_deref(), Some("https://media.example/v.mp4"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn storage_config_parses_camel_case() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/upload/config")
            .with_status(200)
            .with_body(
                r#"{"accountId":"acc","bucketName":"riyobox-storage","publicUrl":"https://media.example"}"#,
            )
            .create_async()
            .await;

        let config = client_for(&server).storage_config().await.unwrap();
        assert_eq!(config.bucket_name, "riyobox-storage");
        assert!(config.region.is_none());
    }

    #[tokio::test]
    async fn unreachable_server_is_transport_error() {
        let client = ApiClient::new("http://127.0.0.1:1".to_string(), "t".to_string()).unwrap();
        let err = client.storage_config().await.unwrap_err();
        assert!(matches!(err, UploadError::Transport(_)));
        assert!(err.is_retryable());
    }
}
