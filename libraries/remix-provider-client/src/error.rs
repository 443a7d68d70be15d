//! Error types for the provider client.

use remix_core::ProviderError;
use reqwest::{Response, StatusCode};
use thiserror::Error;

/// Errors that can occur when talking to the provider.
#[derive(Error, Debug)]
pub enum ProviderClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Provider returned an error response
    #[error("Provider error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// The access credential was missing, expired or revoked
    #[error("Authentication required")]
    AuthRequired,

    /// Refresh credential rejected by the accounts service
    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(String),

    /// Invalid base URL in the configuration
    #[error("Invalid provider URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse provider response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Provider is offline or unreachable
    #[error("Provider unreachable: {0}")]
    ServerUnreachable(String),

    /// Rate limited by provider
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    /// Playlist mutation larger than the provider accepts
    #[error("Too many items in one request: {count} (max {max})")]
    TooManyItems { count: usize, max: usize },
}

/// Result type for provider client operations.
pub type Result<T> = std::result::Result<T, ProviderClientError>;

impl From<ProviderClientError> for ProviderError {
    fn from(err: ProviderClientError) -> Self {
        match err {
            ProviderClientError::AuthRequired => ProviderError::Unauthorized,
            ProviderClientError::TokenRefreshFailed(message) => ProviderError::Status {
                status: 400,
                message,
            },
            ProviderClientError::RateLimited { retry_after_secs } => {
                ProviderError::RateLimited { retry_after_secs }
            }
            ProviderClientError::ServerError { status, message } => {
                ProviderError::Status { status, message }
            }
            ProviderClientError::ParseError(message) => ProviderError::Parse(message),
            other @ (ProviderClientError::TooManyItems { .. }
            | ProviderClientError::InvalidUrl(_)) => ProviderError::InvalidRequest(other.to_string()),
            ProviderClientError::ServerUnreachable(message) => ProviderError::Transport(message),
            ProviderClientError::Request(e) => ProviderError::Transport(e.to_string()),
        }
    }
}

/// Map a transport failure, separating "can't reach the provider" from
/// other request errors.
pub(crate) fn send_error(e: reqwest::Error) -> ProviderClientError {
    if e.is_connect() || e.is_timeout() {
        ProviderClientError::ServerUnreachable(e.to_string())
    } else {
        ProviderClientError::Request(e)
    }
}

/// Turn a non-success response into the matching error.
pub(crate) async fn status_error(response: Response) -> ProviderClientError {
    let status = response.status();

    match status {
        StatusCode::UNAUTHORIZED => ProviderClientError::AuthRequired,
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(1);
            ProviderClientError::RateLimited { retry_after_secs }
        }
        _ => {
            let error_text = response.text().await.unwrap_or_default();
            ProviderClientError::ServerError {
                status: status.as_u16(),
                message: error_text,
            }
        }
    }
}
