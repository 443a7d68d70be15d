/// Core error types for Remix
use thiserror::Error;

/// Result type alias using `RemixError`
pub type Result<T> = std::result::Result<T, RemixError>;

/// Errors raised by persistence collaborators
#[derive(Error, Debug)]
pub enum RemixError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Duplicate entry
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),
}

impl RemixError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for RemixError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Failure of a call to the music provider.
///
/// `Unauthorized` is the only variant the engine reacts to (by refreshing the
/// member's credentials); everything else propagates unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The access credential was rejected (HTTP 401)
    #[error("Provider rejected the access credential")]
    Unauthorized,

    /// Rate limited by the provider
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    /// Provider returned an error response
    #[error("Provider error ({status}): {message}")]
    Status { status: u16, message: String },

    /// Connection or transport failure
    #[error("Provider unreachable: {0}")]
    Transport(String),

    /// Response body could not be decoded
    #[error("Failed to parse provider response: {0}")]
    Parse(String),

    /// Request rejected before it was sent
    #[error("Invalid provider request: {0}")]
    InvalidRequest(String),
}

impl ProviderError {
    /// Whether this failure means the member needs fresh credentials
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}
