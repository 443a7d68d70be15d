//! Playlist reads and mutations.

use crate::client::fetch_all_pages;
use crate::error::{send_error, status_error, ProviderClientError, Result};
use crate::types::{
    AddTracksRequest, CreatePlaylistRequest, FollowPlaylistRequest, RemoveTracksRequest,
    SpotifyPlaylist, TrackItem, TrackUri,
};
use remix_core::types::{MemberId, PlaylistId, RemotePlaylist, Track};
use remix_core::MAX_ITEMS_PER_REQUEST;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

/// Playlist client bound to one access credential.
pub struct PlaylistClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    access_token: &'a str,
}

fn check_batch(uris: &[String]) -> Result<()> {
    if uris.len() > MAX_ITEMS_PER_REQUEST {
        return Err(ProviderClientError::TooManyItems {
            count: uris.len(),
            max: MAX_ITEMS_PER_REQUEST,
        });
    }
    Ok(())
}

impl<'a> PlaylistClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, access_token: &'a str) -> Self {
        Self {
            http,
            base_url,
            access_token,
        }
    }

    /// Current contents of a playlist, all pages. Local and unplayable
    /// items are kept so they can be removed by URI; items with a null
    /// track have no URI to remove and are skipped.
    pub async fn tracks(&self, playlist_id: &PlaylistId) -> Result<Vec<Track>> {
        let url = format!("{}/playlists/{}/tracks?limit=50", self.base_url, playlist_id);
        debug!(url = %url, playlist_id = %playlist_id, "Fetching playlist tracks");

        let items: Vec<TrackItem> = fetch_all_pages(self.http, url, self.access_token).await?;

        Ok(items
            .into_iter()
            .filter_map(|item| item.track)
            .map(Track::from)
            .collect())
    }

    /// Remove up to 100 tracks (every occurrence of each URI).
    pub async fn remove_tracks(&self, playlist_id: &PlaylistId, uris: &[String]) -> Result<()> {
        check_batch(uris)?;

        let url = format!("{}/playlists/{}/tracks", self.base_url, playlist_id);
        debug!(url = %url, count = uris.len(), "Removing playlist tracks");

        let request = RemoveTracksRequest {
            tracks: uris.iter().map(|uri| TrackUri { uri: uri.clone() }).collect(),
        };

        let response = self
            .http
            .delete(&url)
            .bearer_auth(self.access_token)
            .json(&request)
            .send()
            .await
            .map_err(send_error)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(status_error(response).await)
        }
    }

    /// Append up to 100 tracks, in order.
    pub async fn add_tracks(&self, playlist_id: &PlaylistId, uris: &[String]) -> Result<()> {
        check_batch(uris)?;

        let url = format!("{}/playlists/{}/tracks", self.base_url, playlist_id);
        debug!(url = %url, count = uris.len(), "Adding playlist tracks");

        let request = AddTracksRequest {
            uris: uris.to_vec(),
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.access_token)
            .json(&request)
            .send()
            .await
            .map_err(send_error)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(status_error(response).await)
        }
    }

    /// Follow a playlist publicly.
    pub async fn follow(&self, playlist_id: &PlaylistId) -> Result<()> {
        let url = format!("{}/playlists/{}/followers", self.base_url, playlist_id);
        debug!(url = %url, "Following playlist");

        let response = self
            .http
            .put(&url)
            .bearer_auth(self.access_token)
            .json(&FollowPlaylistRequest { public: true })
            .send()
            .await
            .map_err(send_error)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(status_error(response).await)
        }
    }

    /// Create an empty public playlist named after its owner.
    pub async fn create(&self, owner: &MemberId) -> Result<PlaylistId> {
        #[derive(Deserialize)]
        struct Created {
            id: String,
        }

        let url = format!("{}/users/{}/playlists", self.base_url, owner);
        debug!(url = %url, owner = %owner, "Creating playlist");

        let request = CreatePlaylistRequest {
            name: format!("{owner}'s Remix"),
            public: true,
            collaborative: false,
            description: "A shared playlist rebuilt from its members' listening".to_string(),
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.access_token)
            .json(&request)
            .send()
            .await
            .map_err(send_error)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let created: Created = response.json().await.map_err(|e| {
            ProviderClientError::ParseError(format!("Failed to parse created playlist: {}", e))
        })?;

        info!(playlist_id = %created.id, owner = %owner, "Created playlist");
        Ok(PlaylistId::new(created.id))
    }

    /// Playlists visible to the account, all pages.
    pub async fn user_playlists(&self) -> Result<Vec<RemotePlaylist>> {
        let url = format!("{}/me/playlists?limit=50", self.base_url);
        debug!(url = %url, "Fetching user playlists");

        let playlists: Vec<SpotifyPlaylist> =
            fetch_all_pages(self.http, url, self.access_token).await?;

        Ok(playlists.into_iter().map(RemotePlaylist::from).collect())
    }
}
