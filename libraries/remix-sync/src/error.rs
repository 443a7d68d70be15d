use remix_core::{ProviderError, RemixError};
use thiserror::Error;

/// Errors that can occur in the playlist engine
#[derive(Error, Debug)]
pub enum SyncError {
    /// No member behind the credential, or refreshing it failed
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A call to the music provider failed
    #[error("Provider error: {0}")]
    Upstream(#[from] ProviderError),

    #[error("Storage error: {0}")]
    Storage(String),

    /// A refresh job panicked, timed out, or was dropped by the queue
    #[error("Refresh job failed: {0}")]
    QueueFault(String),
}

impl SyncError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<RemixError> for SyncError {
    fn from(err: RemixError) -> Self {
        match err {
            RemixError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Storage(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
