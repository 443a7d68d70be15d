//! Common test utilities and fixtures
#![allow(dead_code)]

use async_trait::async_trait;
use remix_core::types::*;
use remix_core::{MusicProvider, ProviderError};
use remix_server::{create_router, state::AppState};
use remix_storage::SqliteCredentialStore;
use remix_sync::{PlaylistService, SyncSettings};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Provider double: one set of top tracks per access token, a remote
/// playlist listing, and a log of mutating calls.
#[derive(Default)]
pub struct FakeProvider {
    top: Mutex<HashMap<String, Vec<Track>>>,
    remote: Mutex<Vec<RemotePlaylist>>,
    calls: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn set_top(&self, access_token: &str, tracks: Vec<Track>) {
        self.top
            .lock()
            .unwrap()
            .insert(access_token.to_string(), tracks);
    }

    pub fn set_remote(&self, ids: &[&str]) {
        *self.remote.lock().unwrap() = ids
            .iter()
            .map(|id| RemotePlaylist {
                id: PlaylistId::new(*id),
                name: format!("{id} playlist"),
                owner_id: MemberId::new("someone"),
            })
            .collect();
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

pub fn track(uri: &str, artist: &str) -> Track {
    Track::new(uri, format!("{uri} title"), vec![artist.to_string()], "Album")
}

#[async_trait]
impl MusicProvider for FakeProvider {
    async fn current_profile(&self, access_token: &str) -> Result<ProviderProfile, ProviderError> {
        Ok(ProviderProfile {
            id: MemberId::new(access_token.trim_end_matches("-access")),
            display_name: None,
        })
    }

    async fn top_tracks(&self, access_token: &str) -> Result<Vec<Track>, ProviderError> {
        Ok(self
            .top
            .lock()
            .unwrap()
            .get(access_token)
            .cloned()
            .unwrap_or_default())
    }

    async fn liked_tracks(&self, _access_token: &str) -> Result<Vec<Track>, ProviderError> {
        Ok(Vec::new())
    }

    async fn playlist_tracks(
        &self,
        _playlist_id: &PlaylistId,
        _access_token: &str,
    ) -> Result<Vec<Track>, ProviderError> {
        Ok(Vec::new())
    }

    async fn remove_playlist_tracks(
        &self,
        playlist_id: &PlaylistId,
        _access_token: &str,
        track_uris: &[String],
    ) -> Result<(), ProviderError> {
        self.record(format!("remove:{playlist_id}:{}", track_uris.len()));
        Ok(())
    }

    async fn add_playlist_tracks(
        &self,
        playlist_id: &PlaylistId,
        _access_token: &str,
        track_uris: &[String],
    ) -> Result<(), ProviderError> {
        self.record(format!("add:{playlist_id}:{}", track_uris.len()));
        Ok(())
    }

    async fn follow_playlist(
        &self,
        _access_token: &str,
        playlist_id: &PlaylistId,
    ) -> Result<(), ProviderError> {
        self.record(format!("follow:{playlist_id}"));
        Ok(())
    }

    async fn create_playlist(
        &self,
        _access_token: &str,
        owner: &MemberId,
    ) -> Result<PlaylistId, ProviderError> {
        self.record(format!("create:{owner}"));
        Ok(PlaylistId::new(format!("{owner}-remix")))
    }

    async fn user_playlists(&self, _access_token: &str) -> Result<Vec<RemotePlaylist>, ProviderError> {
        Ok(self.remote.lock().unwrap().clone())
    }

    async fn refresh_access_credential(
        &self,
        refresh_token: &str,
    ) -> Result<CredentialPair, ProviderError> {
        Ok(CredentialPair {
            access_token: format!("{}-rotated", refresh_token.trim_end_matches("-refresh")),
            refresh_token: None,
        })
    }
}

/// A router over a real SQLite store in a temp directory
pub struct TestApp {
    pub router: axum::Router,
    pub store: Arc<SqliteCredentialStore>,
    pub provider: Arc<FakeProvider>,
    pub service: Arc<PlaylistService>,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("remix.db");
        let database_url = format!("sqlite://{}", db_path.display());

        let pool = remix_storage::create_pool(&database_url).await.unwrap();
        remix_storage::run_migrations(&pool).await.unwrap();

        let store = Arc::new(SqliteCredentialStore::new(pool));
        let provider = Arc::new(FakeProvider::default());
        let service = Arc::new(PlaylistService::new(
            store.clone(),
            provider.clone(),
            SyncSettings::default(),
        ));

        Self {
            router: create_router(AppState::new(Arc::clone(&service))),
            store,
            provider,
            service,
            _temp_dir: temp_dir,
        }
    }

    /// Register a member whose credentials are `{id}-access` / `{id}-refresh`
    pub async fn add_member(&self, id: &str) -> Member {
        remix_storage::members::upsert(
            self.store.pool(),
            &Member::new(MemberId::new(id), format!("{id}-access"), format!("{id}-refresh")),
        )
        .await
        .unwrap()
    }

    pub async fn add_playlist(&self, id: &str, owner: &str) -> PlaylistId {
        let id = PlaylistId::new(id);
        remix_storage::playlists::create(self.store.pool(), &id, &MemberId::new(owner))
            .await
            .unwrap();
        id
    }
}
