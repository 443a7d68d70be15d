//! Main provider client.

use crate::auth::AuthClient;
use crate::error::{send_error, status_error, ProviderClientError, Result};
use crate::library::LibraryClient;
use crate::playlists::PlaylistClient;
use crate::types::{Paging, ProviderConfig};
use async_trait::async_trait;
use remix_core::types::{
    CredentialPair, MemberId, PlaylistId, ProviderProfile, RemotePlaylist, Track,
};
use remix_core::{MusicProvider, ProviderError};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Client for the Spotify Web API.
///
/// Holds no per-member state: every call takes the access credential to use,
/// so one client serves all members.
pub struct SpotifyClient {
    http: Client,
    config: ProviderConfig,
}

fn normalize_url(raw: &str) -> Result<String> {
    if raw.is_empty() {
        return Err(ProviderClientError::InvalidUrl("URL cannot be empty".into()));
    }

    let parsed = url::Url::parse(raw).map_err(|e| ProviderClientError::InvalidUrl(e.to_string()))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ProviderClientError::InvalidUrl(
            "URL must start with http:// or https://".into(),
        ));
    }

    Ok(raw.trim_end_matches('/').to_string())
}

impl SpotifyClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let normalized_config = ProviderConfig {
            api_url: normalize_url(&config.api_url)?,
            accounts_url: normalize_url(&config.accounts_url)?,
            client_id: config.client_id,
            client_secret: config.client_secret,
        };

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Remix/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            config: normalized_config,
        })
    }

    /// Web API base URL.
    pub fn api_url(&self) -> &str {
        &self.config.api_url
    }

    /// Accounts-service operations.
    pub fn auth(&self) -> AuthClient<'_> {
        AuthClient::new(
            &self.http,
            &self.config.accounts_url,
            &self.config.client_id,
            &self.config.client_secret,
        )
    }

    /// Library operations for one access credential.
    pub fn library<'a>(&'a self, access_token: &'a str) -> LibraryClient<'a> {
        LibraryClient::new(&self.http, &self.config.api_url, access_token)
    }

    /// Playlist operations for one access credential.
    pub fn playlists<'a>(&'a self, access_token: &'a str) -> PlaylistClient<'a> {
        PlaylistClient::new(&self.http, &self.config.api_url, access_token)
    }
}

/// GET `first_url` and follow `next` links, collecting every item.
pub(crate) async fn fetch_all_pages<T: DeserializeOwned>(
    http: &Client,
    first_url: String,
    access_token: &str,
) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut next = Some(first_url);

    while let Some(url) = next.take() {
        let response = http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(send_error)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let page: Paging<T> = response.json().await.map_err(|e| {
            ProviderClientError::ParseError(format!("Failed to parse page: {}", e))
        })?;

        debug!(url = %url, items = page.items.len(), has_next = page.next.is_some(), "Fetched page");

        items.extend(page.items);
        next = page.next;
    }

    Ok(items)
}

#[async_trait]
impl MusicProvider for SpotifyClient {
    async fn current_profile(&self, access_token: &str) -> std::result::Result<ProviderProfile, ProviderError> {
        Ok(self.library(access_token).current_profile().await?)
    }

    async fn top_tracks(&self, access_token: &str) -> std::result::Result<Vec<Track>, ProviderError> {
        Ok(self.library(access_token).top_tracks().await?)
    }

    async fn liked_tracks(&self, access_token: &str) -> std::result::Result<Vec<Track>, ProviderError> {
        Ok(self.library(access_token).liked_tracks().await?)
    }

    async fn playlist_tracks(
        &self,
        playlist_id: &PlaylistId,
        access_token: &str,
    ) -> std::result::Result<Vec<Track>, ProviderError> {
        Ok(self.playlists(access_token).tracks(playlist_id).await?)
    }

    async fn remove_playlist_tracks(
        &self,
        playlist_id: &PlaylistId,
        access_token: &str,
        track_uris: &[String],
    ) -> std::result::Result<(), ProviderError> {
        Ok(self
            .playlists(access_token)
            .remove_tracks(playlist_id, track_uris)
            .await?)
    }

    async fn add_playlist_tracks(
        &self,
        playlist_id: &PlaylistId,
        access_token: &str,
        track_uris: &[String],
    ) -> std::result::Result<(), ProviderError> {
        Ok(self
            .playlists(access_token)
            .add_tracks(playlist_id, track_uris)
            .await?)
    }

    async fn follow_playlist(
        &self,
        access_token: &str,
        playlist_id: &PlaylistId,
    ) -> std::result::Result<(), ProviderError> {
        Ok(self.playlists(access_token).follow(playlist_id).await?)
    }

    async fn create_playlist(
        &self,
        access_token: &str,
        owner: &MemberId,
    ) -> std::result::Result<PlaylistId, ProviderError> {
        Ok(self.playlists(access_token).create(owner).await?)
    }

    async fn user_playlists(
        &self,
        access_token: &str,
    ) -> std::result::Result<Vec<RemotePlaylist>, ProviderError> {
        Ok(self.playlists(access_token).user_playlists().await?)
    }

    async fn refresh_access_credential(
        &self,
        refresh_token: &str,
    ) -> std::result::Result<CredentialPair, ProviderError> {
        Ok(self.auth().refresh_access_token(refresh_token).await?)
    }
}
