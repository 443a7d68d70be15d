//! Credential exchange against the accounts service.

use crate::error::{send_error, status_error, ProviderClientError, Result};
use crate::types::TokenResponse;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use remix_core::types::CredentialPair;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

/// Accounts-service client.
pub struct AuthClient<'a> {
    http: &'a Client,
    accounts_url: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(
        http: &'a Client,
        accounts_url: &'a str,
        client_id: &'a str,
        client_secret: &'a str,
    ) -> Self {
        Self {
            http,
            accounts_url,
            client_id,
            client_secret,
        }
    }

    /// `Basic` authorization value identifying the application.
    fn client_authorization(&self) -> String {
        let credentials = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", STANDARD.encode(credentials))
    }

    /// Exchange a refresh credential for a new credential pair.
    ///
    /// The refresh half of the result is `None` when the accounts service
    /// keeps the old refresh credential valid.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<CredentialPair> {
        let url = format!("{}/api/token", self.accounts_url);
        debug!(url = %url, "Refreshing access token");

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, self.client_authorization())
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .map_err(send_error)?;

        let status = response.status();

        if status.is_success() {
            let token: TokenResponse = response.json().await.map_err(|e| {
                ProviderClientError::ParseError(format!("Failed to parse token response: {}", e))
            })?;

            debug!(
                expires_in = token.expires_in,
                rotated = token.refresh_token.is_some(),
                "Token refresh successful"
            );

            Ok(CredentialPair {
                access_token: token.access_token,
                refresh_token: token.refresh_token,
            })
        } else if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Token refresh rejected");
            Err(ProviderClientError::TokenRefreshFailed(error_text))
        } else {
            Err(status_error(response).await)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_authorization_header() {
        let http = Client::new();
        let auth = AuthClient::new(&http, "http://localhost", "id", "secret");

        // base64("id:secret")
        assert_eq!(auth.client_authorization(), "Basic aWQ6c2VjcmV0");
    }
}
