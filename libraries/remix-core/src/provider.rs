//! Music provider collaborator

use crate::error::ProviderError;
use crate::types::{CredentialPair, MemberId, PlaylistId, ProviderProfile, RemotePlaylist, Track};
use async_trait::async_trait;

/// Largest number of items the provider accepts in one playlist mutation
pub const MAX_ITEMS_PER_REQUEST: usize = 100;

/// Third-party music service
///
/// Listing calls follow pagination to completion before returning.
#[async_trait]
pub trait MusicProvider: Send + Sync {
    /// Profile of the account behind an access credential
    async fn current_profile(&self, access_token: &str) -> Result<ProviderProfile, ProviderError>;

    /// The account's recent top tracks
    async fn top_tracks(&self, access_token: &str) -> Result<Vec<Track>, ProviderError>;

    /// The account's liked (saved) tracks
    async fn liked_tracks(&self, access_token: &str) -> Result<Vec<Track>, ProviderError>;

    /// Current contents of a playlist
    async fn playlist_tracks(
        &self,
        playlist_id: &PlaylistId,
        access_token: &str,
    ) -> Result<Vec<Track>, ProviderError>;

    /// Remove tracks from a playlist.
    ///
    /// # Errors
    /// Returns `ProviderError::InvalidRequest` for more than
    /// [`MAX_ITEMS_PER_REQUEST`] URIs.
    async fn remove_playlist_tracks(
        &self,
        playlist_id: &PlaylistId,
        access_token: &str,
        track_uris: &[String],
    ) -> Result<(), ProviderError>;

    /// Append tracks to a playlist, in order.
    ///
    /// # Errors
    /// Returns `ProviderError::InvalidRequest` for more than
    /// [`MAX_ITEMS_PER_REQUEST`] URIs.
    async fn add_playlist_tracks(
        &self,
        playlist_id: &PlaylistId,
        access_token: &str,
        track_uris: &[String],
    ) -> Result<(), ProviderError>;

    /// Follow a playlist on behalf of the account
    async fn follow_playlist(
        &self,
        access_token: &str,
        playlist_id: &PlaylistId,
    ) -> Result<(), ProviderError>;

    /// Create an empty playlist owned by the account
    async fn create_playlist(
        &self,
        access_token: &str,
        owner: &MemberId,
    ) -> Result<PlaylistId, ProviderError>;

    /// Playlists visible to the account
    async fn user_playlists(&self, access_token: &str)
        -> Result<Vec<RemotePlaylist>, ProviderError>;

    /// Exchange a refresh credential for a new credential pair
    async fn refresh_access_credential(
        &self,
        refresh_token: &str,
    ) -> Result<CredentialPair, ProviderError>;
}
