use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use bytes::Bytes;

use crate::error::{AppError, Result};
use crate::models::{DeleteResponse, PhotoListResponse, UploadResponse};
use crate::services::PhotoService;
use crate::AppState;

/// Multipart field carrying the image
const PHOTO_FIELD: &str = "photo";

/// Upload one photo
/// POST /api/upload
pub async fn upload_photo(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let max_size = state.config.upload.max_size_bytes;

    let mut file_data: Option<Bytes> = None;
    let mut file_name = String::new();
    let mut content_type = String::new();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to process multipart: {}", e)))?
    {
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }

        file_name = field.file_name().unwrap_or("photo").to_string();
        content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| {
                mime_guess::from_path(&file_name)
                    .first_or_octet_stream()
                    .to_string()
            });

        // Drain the field with the size ceiling enforced per chunk, so an
        // oversize body is rejected without buffering the whole payload.
        let mut data: Vec<u8> = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read file chunk: {}", e)))?
        {
            if (data.len() + chunk.len()) as u64 > max_size {
                return Err(AppError::PayloadTooLarge {
                    limit_bytes: max_size,
                });
            }
            data.extend_from_slice(&chunk);
        }
        file_data = Some(Bytes::from(data));
    }

    let data = file_data.ok_or_else(|| AppError::BadRequest("No photo file provided".to_string()))?;

    let response = PhotoService::upload(
        state.storage.as_ref(),
        &state.config.upload,
        &file_name,
        &content_type,
        data,
    )
    .await?;

    Ok(Json(response))
}

/// List uploaded photos (admin)
/// GET /api/photos
pub async fn list_photos(State(state): State<AppState>) -> Result<Json<PhotoListResponse>> {
    let response = PhotoService::list(state.storage.as_ref(), &state.config.upload).await?;
    Ok(Json(response))
}

/// Delete one photo (admin)
/// DELETE /api/photos/:filename
pub async fn delete_photo(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<DeleteResponse>> {
    PhotoService::delete(state.storage.as_ref(), &state.config.upload, &filename).await?;
    Ok(Json(DeleteResponse {
        success: true,
        message: "Photo deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::storage::LocalStorage;
    use crate::{create_router, AppState};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    const BOUNDARY: &str = "photodrop-test-boundary";

    /// Storage double whose every call fails the way an unreachable bucket
    /// does, for asserting the error bodies each endpoint produces
    struct UnreachableStorage;

    #[async_trait::async_trait]
    impl crate::storage::StorageProvider for UnreachableStorage {
        async fn put(
            &self,
            _key: &str,
            _data: bytes::Bytes,
            _content_type: &str,
        ) -> crate::error::Result<()> {
            Err(crate::error::AppError::Storage {
                operation: "Failed to upload photo",
                message: "connection refused".to_string(),
            })
        }

        async fn get(&self, _key: &str) -> crate::error::Result<bytes::Bytes> {
            Err(crate::error::AppError::Storage {
                operation: "Failed to fetch photo",
                message: "connection refused".to_string(),
            })
        }

        async fn delete(&self, _key: &str) -> crate::error::Result<()> {
            Err(crate::error::AppError::Storage {
                operation: "Failed to delete photo",
                message: "connection refused".to_string(),
            })
        }

        async fn exists(&self, _key: &str) -> crate::error::Result<bool> {
            Ok(false)
        }

        async fn list(
            &self,
            _prefix: &str,
        ) -> crate::error::Result<Vec<crate::storage::ObjectEntry>> {
            Err(crate::error::AppError::Storage {
                operation: "Failed to fetch photos",
                message: "connection refused".to_string(),
            })
        }

        fn public_url(&self, key: &str) -> String {
            format!("https://storage.example.com/{}", key)
        }

        fn storage_type(&self) -> &'static str {
            "unreachable"
        }
    }

    fn unreachable_app() -> axum::Router {
        create_router(AppState {
            config: Arc::new(Config::default()),
            storage: Arc::new(UnreachableStorage),
        })
    }

    fn test_app(dir: &std::path::Path, max_size_bytes: u64) -> axum::Router {
        let mut config = Config::default();
        config.storage.backend = "local".to_string();
        config.storage.local.base_path = dir.to_string_lossy().to_string();
        config.storage.local.public_base_url = "http://localhost:3000/uploads".to_string();
        config.upload.max_size_bytes = max_size_bytes;

        let storage = Arc::new(LocalStorage::new(config.storage.local.clone()));
        create_router(AppState {
            config: Arc::new(config),
            storage,
        })
    }

    fn multipart_body(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; \
                 filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(field, filename, content_type, data)))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path(), 1024 * 1024);

        let response = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "OK");
    }

    #[tokio::test]
    async fn test_upload_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path(), 1024 * 1024);

        let photo = b"\xff\xd8\xff\xe0 not really a jpeg";
        let response = app
            .clone()
            .oneshot(upload_request("photo", "guest.jpg", "image/jpeg", photo))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["size"], photo.len());
        let filename = body["filename"].as_str().unwrap();
        assert!(filename.starts_with("wedding-photos/"));
        assert!(filename.ends_with(".jpg"));
        assert_eq!(
            body["publicUrl"].as_str().unwrap(),
            format!("http://localhost:3000/uploads/{}", filename)
        );

        // Stored bytes match what was sent
        let stored = tokio::fs::read(dir.path().join(filename)).await.unwrap();
        assert_eq!(stored, photo);

        // And the listing sees it
        let response = app
            .oneshot(Request::get("/api/photos").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["photos"][0]["name"], filename);
        assert_eq!(body["photos"][0]["contentType"], "image/jpeg");
    }

    #[tokio::test]
    async fn test_upload_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path(), 1024 * 1024);

        let response = app
            .oneshot(upload_request("attachment", "a.jpg", "image/jpeg", b"x"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "No photo file provided");
    }

    #[tokio::test]
    async fn test_upload_rejects_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path(), 1024 * 1024);

        let response = app
            .clone()
            .oneshot(upload_request("photo", "notes.txt", "text/plain", b"hello"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Only image files are allowed");

        // Nothing stored
        let response = app
            .oneshot(Request::get("/api/photos").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn test_upload_rejects_oversize() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path(), 1024);

        let oversized = vec![0u8; 4096];
        let response = app
            .clone()
            .oneshot(upload_request("photo", "big.jpg", "image/jpeg", &oversized))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "File too large");

        // Nothing stored
        let response = app
            .oneshot(Request::get("/api/photos").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn test_delete_photo() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path(), 1024 * 1024);

        let response = app
            .clone()
            .oneshot(upload_request("photo", "guest.png", "image/png", b"png bytes"))
            .await
            .unwrap();
        let body = json_body(response).await;
        let filename = body["filename"]
            .as_str()
            .unwrap()
            .strip_prefix("wedding-photos/")
            .unwrap()
            .to_string();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/photos/{}", filename))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);

        let response = app
            .oneshot(Request::get("/api/photos").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn test_storage_failure_bodies_name_each_operation() {
        let app = unreachable_app();

        let response = app
            .clone()
            .oneshot(upload_request("photo", "a.jpg", "image/jpeg", b"bytes"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Failed to upload photo");

        let response = app
            .clone()
            .oneshot(Request::get("/api/photos").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Failed to fetch photos");
        assert_eq!(body["details"], "connection refused");

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/photos/a.jpg")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Failed to delete photo");
    }

    #[tokio::test]
    async fn test_concurrent_uploads_get_distinct_keys() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path(), 1024 * 1024);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let app = app.clone();
            handles.push(tokio::spawn(async move {
                let response = app
                    .oneshot(upload_request("photo", "same.jpg", "image/jpeg", b"bytes"))
                    .await
                    .unwrap();
                assert_eq!(response.status(), StatusCode::OK);
                json_body(response).await["filename"]
                    .as_str()
                    .unwrap()
                    .to_string()
            }));
        }

        let mut keys = Vec::new();
        for handle in handles {
            keys.push(handle.await.unwrap());
        }
        keys.sort();
        let before = keys.len();
        keys.dedup();
        assert_eq!(keys.len(), before);
    }
}
