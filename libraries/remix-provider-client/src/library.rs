//! The account's own library: profile, top tracks, liked tracks.

use crate::client::fetch_all_pages;
use crate::error::{send_error, status_error, ProviderClientError, Result};
use crate::types::{SpotifyTrack, SpotifyUser, TrackItem};
use remix_core::types::{MemberId, ProviderProfile, Track};
use reqwest::Client;
use tracing::debug;

/// Library client bound to one access credential.
pub struct LibraryClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    access_token: &'a str,
}

impl<'a> LibraryClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, access_token: &'a str) -> Self {
        Self {
            http,
            base_url,
            access_token,
        }
    }

    /// Profile of the account behind the credential.
    pub async fn current_profile(&self) -> Result<ProviderProfile> {
        let url = format!("{}/me", self.base_url);
        debug!(url = %url, "Fetching current profile");

        let response = self
            .http
            .get(&url)
            .bearer_auth(self.access_token)
            .send()
            .await
            .map_err(send_error)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let user: SpotifyUser = response.json().await.map_err(|e| {
            ProviderClientError::ParseError(format!("Failed to parse profile: {}", e))
        })?;

        Ok(ProviderProfile {
            id: MemberId::new(user.id),
            display_name: user.display_name,
        })
    }

    /// Short-term top tracks, all pages.
    pub async fn top_tracks(&self) -> Result<Vec<Track>> {
        let url = format!("{}/me/top/tracks?limit=50&time_range=short_term", self.base_url);
        debug!(url = %url, "Fetching top tracks");

        let tracks: Vec<SpotifyTrack> = fetch_all_pages(self.http, url, self.access_token).await?;

        debug!(tracks = tracks.len(), "Fetched top tracks");
        Ok(tracks.into_iter().map(Track::from).collect())
    }

    /// Saved tracks, all pages. Unresolvable items are skipped.
    pub async fn liked_tracks(&self) -> Result<Vec<Track>> {
        let url = format!("{}/me/tracks?limit=50", self.base_url);
        debug!(url = %url, "Fetching liked tracks");

        let items: Vec<TrackItem> = fetch_all_pages(self.http, url, self.access_token).await?;

        let tracks: Vec<Track> = items
            .into_iter()
            .filter_map(|item| item.track)
            .map(Track::from)
            .collect();

        debug!(tracks = tracks.len(), "Fetched liked tracks");
        Ok(tracks)
    }
}
