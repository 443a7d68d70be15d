use crate::{history, members, playlists};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use remix_core::{
    error::Result,
    store::CredentialStore,
    types::{HistoryEntry, Member, MemberId, Playlist, PlaylistId},
};
use sqlx::SqlitePool;

/// `CredentialStore` backed by `SQLite`
#[derive(Clone)]
pub struct SqliteCredentialStore {
    pool: SqlitePool,
}

impl SqliteCredentialStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    // Members
    async fn find_member_by_id(&self, id: &MemberId) -> Result<Option<Member>> {
        Ok(members::get_by_id(&self.pool, id).await?)
    }

    async fn find_member_by_access_token(&self, access_token: &str) -> Result<Option<Member>> {
        Ok(members::get_by_access_token(&self.pool, access_token).await?)
    }

    async fn upsert_member(&self, member: &Member) -> Result<Member> {
        Ok(members::upsert(&self.pool, member).await?)
    }

    // Playlists
    async fn get_playlist(&self, id: &PlaylistId) -> Result<Option<Playlist>> {
        Ok(playlists::get_by_id(&self.pool, id).await?)
    }

    async fn create_playlist(&self, id: &PlaylistId, owner: &MemberId) -> Result<Playlist> {
        Ok(playlists::create(&self.pool, id, owner).await?)
    }

    async fn add_playlist_member(&self, id: &PlaylistId, member: &MemberId) -> Result<Playlist> {
        Ok(playlists::add_member(&self.pool, id, member).await?)
    }

    async fn delete_playlists(&self, ids: &[PlaylistId]) -> Result<Vec<PlaylistId>> {
        Ok(playlists::delete(&self.pool, ids).await?)
    }

    async fn list_playlist_ids(&self) -> Result<Vec<PlaylistId>> {
        Ok(playlists::list_ids(&self.pool).await?)
    }

    // History
    async fn append_history(&self, id: &PlaylistId, entries: &[HistoryEntry]) -> Result<()> {
        Ok(history::append(&self.pool, id, entries).await?)
    }

    async fn playlist_history(
        &self,
        id: &PlaylistId,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<HistoryEntry>> {
        Ok(history::get_for_playlist(&self.pool, id, since).await?)
    }
}
