use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("File too large")]
    PayloadTooLarge { limit_bytes: u64 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{operation}: {message}")]
    Storage {
        /// User-facing summary of the operation that failed
        operation: &'static str,
        message: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
}

/// Wire format for failures: `{error, details?}`
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::PayloadTooLarge { limit_bytes } => (
                StatusCode::BAD_REQUEST,
                "File too large".to_string(),
                Some(format!(
                    "Maximum file size is {} MB",
                    limit_bytes / (1024 * 1024)
                )),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Storage { operation, message } => {
                tracing::error!("{}: {}", operation, message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    operation.to_string(),
                    Some(message.clone()),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    Some(msg.clone()),
                )
            }
            AppError::Io(e) => {
                tracing::error!("IO error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    Some(e.to_string()),
                )
            }
            AppError::Request(e) => {
                tracing::error!("Request error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "External request error".to_string(),
                    Some(e.to_string()),
                )
            }
        };

        let body = Json(ErrorBody { error, details });
        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_large_is_client_fault() {
        let err = AppError::PayloadTooLarge {
            limit_bytes: 10 * 1024 * 1024,
        };
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_storage_error_is_server_fault() {
        let err = AppError::Storage {
            operation: "Failed to upload photo",
            message: "bucket unreachable".to_string(),
        };
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_storage_error_names_the_failed_operation() {
        use http_body_util::BodyExt;

        for operation in ["Failed to fetch photos", "Failed to delete photo"] {
            let err = AppError::Storage {
                operation,
                message: "bucket unreachable".to_string(),
            };
            let resp = err.into_response();
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

            let bytes = resp.into_body().collect().await.unwrap().to_bytes();
            let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(body["error"], operation);
            assert_eq!(body["details"], "bucket unreachable");
        }
    }
}
