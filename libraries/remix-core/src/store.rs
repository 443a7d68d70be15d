//! Persistence collaborator used by the engine

use crate::error::Result;
use crate::types::{HistoryEntry, Member, MemberId, Playlist, PlaylistId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Storage of members, playlists and playlist history
///
/// The engine only reads members and updates their credential fields;
/// everything else about the schema belongs to the implementation.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    // ========================================================================
    // Members
    // ========================================================================

    /// Find a member by provider identity
    async fn find_member_by_id(&self, id: &MemberId) -> Result<Option<Member>>;

    /// Find the member currently holding the given access credential
    async fn find_member_by_access_token(&self, access_token: &str) -> Result<Option<Member>>;

    /// Insert a member or update the credentials of an existing one
    async fn upsert_member(&self, member: &Member) -> Result<Member>;

    // ========================================================================
    // Playlists
    // ========================================================================

    /// Get a playlist with its owner and participants
    async fn get_playlist(&self, id: &PlaylistId) -> Result<Option<Playlist>>;

    /// Record a new playlist; the owner becomes its first participant
    async fn create_playlist(&self, id: &PlaylistId, owner: &MemberId) -> Result<Playlist>;

    /// Add a participant to a playlist. Adding an existing participant is a no-op.
    async fn add_playlist_member(&self, id: &PlaylistId, member: &MemberId) -> Result<Playlist>;

    /// Delete playlists together with their participants and history,
    /// returning the ids that existed
    async fn delete_playlists(&self, ids: &[PlaylistId]) -> Result<Vec<PlaylistId>>;

    /// Ids of every stored playlist
    async fn list_playlist_ids(&self) -> Result<Vec<PlaylistId>>;

    // ========================================================================
    // History
    // ========================================================================

    /// Append entries to a playlist's history
    async fn append_history(&self, id: &PlaylistId, entries: &[HistoryEntry]) -> Result<()>;

    /// Read a playlist's history, oldest first, optionally only entries
    /// created at or after `since`
    async fn playlist_history(
        &self,
        id: &PlaylistId,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<HistoryEntry>>;
}
