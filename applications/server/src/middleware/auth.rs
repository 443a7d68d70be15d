/// Bearer credential extraction
use crate::error::ServerError;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

/// The member access credential carried in `Authorization: Bearer <token>`.
///
/// Handlers take this as an extractor; a missing or malformed header is
/// rejected with 401 before the handler runs.
#[derive(Debug, Clone)]
pub struct BearerCredential(pub String);

impl BearerCredential {
    pub fn token(&self) -> &str {
        &self.0
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for BearerCredential
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| ServerError::Auth("Missing Authorization header".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ServerError::Auth("Expected a Bearer credential".to_string()))?;

        Ok(Self(token.to_string()))
    }
}
