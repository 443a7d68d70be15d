/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use remix_sync::SyncError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    /// Missing or malformed bearer credential
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("Storage error: {0}")]
    Storage(#[from] remix_storage::StorageError),

    #[error("Provider client error: {0}")]
    Provider(#[from] remix_provider_client::ProviderClientError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ServerError::Auth(ref msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ServerError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ServerError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServerError::Sync(SyncError::Authentication(ref msg)) => {
                (StatusCode::UNAUTHORIZED, msg.clone())
            }
            ServerError::Sync(ref e @ SyncError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, e.to_string())
            }
            ServerError::Sync(ref e) => {
                tracing::error!("Sync error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Playlist operation failed".to_string(),
                )
            }
            ServerError::Storage(ref e) => {
                tracing::error!("Storage error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Storage error".to_string(),
                )
            }
            ServerError::Provider(ref e) => {
                tracing::error!("Provider client error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Provider error".to_string(),
                )
            }
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
            ServerError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
            "details": self.to_string(),
        }));

        (status, body).into_response()
    }
}
