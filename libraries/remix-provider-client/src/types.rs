//! Types for Spotify Web API requests and responses.

use remix_core::types::{MemberId, PlaylistId, RemotePlaylist, Track};
use serde::{Deserialize, Serialize};

/// Production Web API base URL
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

/// Production accounts service base URL
pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";

/// Connection settings for the provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Web API base URL (e.g., "https://api.spotify.com/v1")
    pub api_url: String,
    /// Accounts service base URL, used for credential exchange
    pub accounts_url: String,
    /// Registered application id
    pub client_id: String,
    /// Registered application secret
    pub client_secret: String,
}

impl ProviderConfig {
    /// Config pointing at the production endpoints.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            accounts_url: DEFAULT_ACCOUNTS_URL.to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Point both services at a different host (mock servers, proxies).
    pub fn with_urls(mut self, api_url: impl Into<String>, accounts_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self.accounts_url = accounts_url.into();
        self
    }
}

// =============================================================================
// Paging
// =============================================================================

/// One page of a paginated listing.
#[derive(Debug, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
    /// Absolute URL of the next page
    pub next: Option<String>,
}

// =============================================================================
// Tracks
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SpotifyArtist {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SpotifyAlbum {
    pub name: String,
}

/// Track object as returned by the Web API. Local and unplayable tracks
/// keep their `uri` but may come back with a null `name`.
#[derive(Debug, Deserialize)]
pub struct SpotifyTrack {
    pub uri: String,
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Vec<SpotifyArtist>,
    pub album: Option<SpotifyAlbum>,
}

impl From<SpotifyTrack> for Track {
    fn from(track: SpotifyTrack) -> Self {
        Track::new(
            track.uri,
            track.name.unwrap_or_default(),
            track.artists.into_iter().map(|a| a.name).collect(),
            track.album.map(|a| a.name).unwrap_or_default(),
        )
    }
}

/// Saved-track and playlist-track wrapper. `track` is null for items the
/// provider can no longer resolve; those carry no URI at all.
#[derive(Debug, Deserialize)]
pub struct TrackItem {
    pub track: Option<SpotifyTrack>,
}

/// Request body for removing playlist tracks.
#[derive(Debug, Serialize)]
pub struct RemoveTracksRequest {
    pub tracks: Vec<TrackUri>,
}

#[derive(Debug, Serialize)]
pub struct TrackUri {
    pub uri: String,
}

/// Request body for adding playlist tracks.
#[derive(Debug, Serialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
}

// =============================================================================
// Playlists
// =============================================================================

/// Request body for creating a playlist.
#[derive(Debug, Serialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub public: bool,
    pub collaborative: bool,
    pub description: String,
}

/// Request body for following a playlist.
#[derive(Debug, Serialize)]
pub struct FollowPlaylistRequest {
    pub public: bool,
}

#[derive(Debug, Deserialize)]
pub struct SpotifyOwner {
    pub id: String,
}

/// Simplified playlist object.
#[derive(Debug, Deserialize)]
pub struct SpotifyPlaylist {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub owner: Option<SpotifyOwner>,
}

impl From<SpotifyPlaylist> for RemotePlaylist {
    fn from(playlist: SpotifyPlaylist) -> Self {
        RemotePlaylist {
            id: PlaylistId::new(playlist.id),
            name: playlist.name,
            owner_id: MemberId::new(playlist.owner.map(|o| o.id).unwrap_or_default()),
        }
    }
}

// =============================================================================
// Accounts
// =============================================================================

/// Current user profile.
#[derive(Debug, Deserialize)]
pub struct SpotifyUser {
    pub id: String,
    pub display_name: Option<String>,
}

/// Response from the token endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Only present when the accounts service rotates the refresh credential
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: u64,
}
