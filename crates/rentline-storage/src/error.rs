use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Object too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    #[error("Object storage error: {0}")]
    Storage(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl IntoResponse for StorageError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            StorageError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            StorageError::TooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, self.to_string()),
            StorageError::Storage(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Object storage error".to_string(),
            ),
            StorageError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, axum::Json(body)).into_response()
    }
}
