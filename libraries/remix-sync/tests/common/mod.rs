//! In-memory collaborators for engine tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use remix_core::types::*;
use remix_core::{CredentialStore, MusicProvider, ProviderError, RemixError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// =============================================================================
// Store
// =============================================================================

struct StoredPlaylist {
    id: PlaylistId,
    owner: MemberId,
    members: Vec<MemberId>,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct StoreState {
    members: HashMap<MemberId, Member>,
    playlists: Vec<StoredPlaylist>,
    history: HashMap<PlaylistId, Vec<HistoryEntry>>,
}

impl StoreState {
    fn with_relations(&self, member: &Member) -> Member {
        let mut member = member.clone();
        member.owned_playlists = self
            .playlists
            .iter()
            .filter(|p| p.owner == member.id)
            .map(|p| p.id.clone())
            .collect();
        member.member_playlists = self
            .playlists
            .iter()
            .filter(|p| p.members.contains(&member.id))
            .map(|p| p.id.clone())
            .collect();
        member
    }

    fn member(&self, id: &MemberId) -> Result<Member, RemixError> {
        self.members
            .get(id)
            .map(|m| self.with_relations(m))
            .ok_or_else(|| RemixError::not_found("Member", id.as_str()))
    }

    fn playlist(&self, id: &PlaylistId) -> Result<Option<Playlist>, RemixError> {
        let Some(stored) = self.playlists.iter().find(|p| &p.id == id) else {
            return Ok(None);
        };
        Ok(Some(Playlist {
            id: stored.id.clone(),
            owner: self.member(&stored.owner)?,
            members: stored
                .members
                .iter()
                .map(|m| self.member(m))
                .collect::<Result<_, _>>()?,
            created_at: stored.created_at,
        }))
    }
}

#[derive(Default)]
pub struct FakeStore {
    state: Mutex<StoreState>,
}

impl FakeStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_member(&self, id: &str) -> Member {
        let member = Member::new(MemberId::new(id), format!("{id}-access"), format!("{id}-refresh"));
        self.state
            .lock()
            .unwrap()
            .members
            .insert(member.id.clone(), member.clone());
        member
    }

    pub fn add_playlist(&self, id: &str, owner: &str, members: &[&str]) -> PlaylistId {
        let id = PlaylistId::new(id);
        let mut participants = vec![MemberId::new(owner)];
        participants.extend(
            members
                .iter()
                .filter(|m| **m != owner)
                .map(|m| MemberId::new(*m)),
        );
        self.state.lock().unwrap().playlists.push(StoredPlaylist {
            id: id.clone(),
            owner: MemberId::new(owner),
            members: participants,
            created_at: Utc::now(),
        });
        id
    }

    pub fn member(&self, id: &str) -> Member {
        self.state.lock().unwrap().member(&MemberId::new(id)).unwrap()
    }

    pub fn history(&self, id: &PlaylistId) -> Vec<HistoryEntry> {
        self.state
            .lock()
            .unwrap()
            .history
            .get(id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn seed_history(&self, id: &PlaylistId, uri: &str, member: &str, created_at: DateTime<Utc>) {
        self.state
            .lock()
            .unwrap()
            .history
            .entry(id.clone())
            .or_default()
            .push(HistoryEntry {
                track_uri: uri.to_string(),
                member_id: MemberId::new(member),
                title: uri.to_string(),
                artist: "Artist".to_string(),
                album: "Album".to_string(),
                created_at,
            });
    }
}

#[async_trait]
impl CredentialStore for FakeStore {
    async fn find_member_by_id(&self, id: &MemberId) -> Result<Option<Member>, RemixError> {
        let state = self.state.lock().unwrap();
        Ok(state.members.get(id).map(|m| state.with_relations(m)))
    }

    async fn find_member_by_access_token(&self, access_token: &str) -> Result<Option<Member>, RemixError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .members
            .values()
            .find(|m| m.access_token == access_token)
            .map(|m| state.with_relations(m)))
    }

    async fn upsert_member(&self, member: &Member) -> Result<Member, RemixError> {
        let mut state = self.state.lock().unwrap();
        state.members.insert(member.id.clone(), member.clone());
        state.member(&member.id)
    }

    async fn get_playlist(&self, id: &PlaylistId) -> Result<Option<Playlist>, RemixError> {
        self.state.lock().unwrap().playlist(id)
    }

    async fn create_playlist(&self, id: &PlaylistId, owner: &MemberId) -> Result<Playlist, RemixError> {
        let mut state = self.state.lock().unwrap();
        state.playlists.push(StoredPlaylist {
            id: id.clone(),
            owner: owner.clone(),
            members: vec![owner.clone()],
            created_at: Utc::now(),
        });
        state
            .playlist(id)?
            .ok_or_else(|| RemixError::not_found("Playlist", id.as_str()))
    }

    async fn add_playlist_member(&self, id: &PlaylistId, member: &MemberId) -> Result<Playlist, RemixError> {
        let mut state = self.state.lock().unwrap();
        let stored = state
            .playlists
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| RemixError::not_found("Playlist", id.as_str()))?;
        if !stored.members.contains(member) {
            stored.members.push(member.clone());
        }
        state
            .playlist(id)?
            .ok_or_else(|| RemixError::not_found("Playlist", id.as_str()))
    }

    async fn delete_playlists(&self, ids: &[PlaylistId]) -> Result<Vec<PlaylistId>, RemixError> {
        let mut state = self.state.lock().unwrap();
        let mut removed = Vec::new();
        for id in ids {
            if let Some(index) = state.playlists.iter().position(|p| &p.id == id) {
                state.playlists.remove(index);
                state.history.remove(id);
                removed.push(id.clone());
            }
        }
        Ok(removed)
    }

    async fn list_playlist_ids(&self) -> Result<Vec<PlaylistId>, RemixError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .playlists
            .iter()
            .map(|p| p.id.clone())
            .collect())
    }

    async fn append_history(&self, id: &PlaylistId, entries: &[HistoryEntry]) -> Result<(), RemixError> {
        self.state
            .lock()
            .unwrap()
            .history
            .entry(id.clone())
            .or_default()
            .extend_from_slice(entries);
        Ok(())
    }

    async fn playlist_history(
        &self,
        id: &PlaylistId,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<HistoryEntry>, RemixError> {
        Ok(self
            .history(id)
            .into_iter()
            .filter(|e| since.map_or(true, |s| e.created_at >= s))
            .collect())
    }
}

// =============================================================================
// Provider
// =============================================================================

pub fn track(uri: &str, artist: &str) -> Track {
    Track::new(uri, format!("Title {uri}"), vec![artist.to_string()], "Album")
}

#[derive(Default)]
struct ProviderState {
    /// Access credential -> member id; anything else is rejected
    valid_tokens: HashMap<String, MemberId>,
    top: HashMap<MemberId, Vec<Track>>,
    liked: HashMap<MemberId, Vec<Track>>,
    remote: HashMap<PlaylistId, Vec<String>>,
    remote_listing: HashMap<MemberId, Vec<RemotePlaylist>>,
    calls: Vec<String>,
    refresh_failures_left: usize,
    fail_adds: bool,
    issued: usize,
}

#[derive(Default)]
pub struct FakeProvider {
    state: Mutex<ProviderState>,
    pub refresh_calls: AtomicUsize,
    refresh_delay: Mutex<Duration>,
}

impl FakeProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Accept the fixture credential of each member
    pub fn accept(&self, members: &[&str]) {
        let mut state = self.state.lock().unwrap();
        for id in members {
            state
                .valid_tokens
                .insert(format!("{id}-access"), MemberId::new(*id));
        }
    }

    pub fn set_top(&self, member: &str, tracks: Vec<Track>) {
        self.state.lock().unwrap().top.insert(MemberId::new(member), tracks);
    }

    pub fn set_liked(&self, member: &str, tracks: Vec<Track>) {
        self.state.lock().unwrap().liked.insert(MemberId::new(member), tracks);
    }

    pub fn set_remote(&self, playlist: &PlaylistId, uris: Vec<String>) {
        self.state.lock().unwrap().remote.insert(playlist.clone(), uris);
    }

    pub fn remote(&self, playlist: &PlaylistId) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .remote
            .get(playlist)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_remote_listing(&self, member: &str, playlists: &[&str]) {
        let listing = playlists
            .iter()
            .map(|id| RemotePlaylist {
                id: PlaylistId::new(*id),
                name: (*id).to_string(),
                owner_id: MemberId::new(member),
            })
            .collect();
        self.state
            .lock()
            .unwrap()
            .remote_listing
            .insert(MemberId::new(member), listing);
    }

    pub fn fail_refreshes(&self, count: usize) {
        self.state.lock().unwrap().refresh_failures_left = count;
    }

    /// Make every add call fail with a 502 after it is logged
    pub fn fail_adds(&self) {
        self.state.lock().unwrap().fail_adds = true;
    }

    pub fn set_refresh_delay(&self, delay: Duration) {
        *self.refresh_delay.lock().unwrap() = delay;
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn authorize(&self, token: &str, call: String) -> Result<MemberId, ProviderError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        state
            .valid_tokens
            .get(token)
            .cloned()
            .ok_or(ProviderError::Unauthorized)
    }
}

#[async_trait]
impl MusicProvider for FakeProvider {
    async fn current_profile(&self, access_token: &str) -> Result<ProviderProfile, ProviderError> {
        let id = self.authorize(access_token, "profile".into())?;
        Ok(ProviderProfile {
            id,
            display_name: None,
        })
    }

    async fn top_tracks(&self, access_token: &str) -> Result<Vec<Track>, ProviderError> {
        let id = self.authorize(access_token, "top".into())?;
        Ok(self.state.lock().unwrap().top.get(&id).cloned().unwrap_or_default())
    }

    async fn liked_tracks(&self, access_token: &str) -> Result<Vec<Track>, ProviderError> {
        let id = self.authorize(access_token, "liked".into())?;
        Ok(self.state.lock().unwrap().liked.get(&id).cloned().unwrap_or_default())
    }

    async fn playlist_tracks(
        &self,
        playlist_id: &PlaylistId,
        access_token: &str,
    ) -> Result<Vec<Track>, ProviderError> {
        self.authorize(access_token, format!("tracks:{playlist_id}"))?;
        Ok(self
            .remote(playlist_id)
            .iter()
            .map(|uri| track(uri, "Remote"))
            .collect())
    }

    async fn remove_playlist_tracks(
        &self,
        playlist_id: &PlaylistId,
        access_token: &str,
        track_uris: &[String],
    ) -> Result<(), ProviderError> {
        self.authorize(access_token, format!("remove:{playlist_id}:{}", track_uris.len()))?;
        if track_uris.len() > remix_core::MAX_ITEMS_PER_REQUEST {
            return Err(ProviderError::InvalidRequest("too many".into()));
        }
        let mut state = self.state.lock().unwrap();
        if let Some(remote) = state.remote.get_mut(playlist_id) {
            remote.retain(|uri| !track_uris.contains(uri));
        }
        Ok(())
    }

    async fn add_playlist_tracks(
        &self,
        playlist_id: &PlaylistId,
        access_token: &str,
        track_uris: &[String],
    ) -> Result<(), ProviderError> {
        self.authorize(access_token, format!("add:{playlist_id}:{}", track_uris.len()))?;
        if track_uris.len() > remix_core::MAX_ITEMS_PER_REQUEST {
            return Err(ProviderError::InvalidRequest("too many".into()));
        }
        let mut state = self.state.lock().unwrap();
        if state.fail_adds {
            return Err(ProviderError::Status {
                status: 502,
                message: "bad gateway".into(),
            });
        }
        state
            .remote
            .entry(playlist_id.clone())
            .or_default()
            .extend_from_slice(track_uris);
        Ok(())
    }

    async fn follow_playlist(
        &self,
        access_token: &str,
        playlist_id: &PlaylistId,
    ) -> Result<(), ProviderError> {
        self.authorize(access_token, format!("follow:{playlist_id}"))?;
        Ok(())
    }

    async fn create_playlist(
        &self,
        access_token: &str,
        owner: &MemberId,
    ) -> Result<PlaylistId, ProviderError> {
        self.authorize(access_token, format!("create:{owner}"))?;
        Ok(PlaylistId::new(format!("{owner}-remix")))
    }

    async fn user_playlists(&self, access_token: &str) -> Result<Vec<RemotePlaylist>, ProviderError> {
        let id = self.authorize(access_token, "user_playlists".into())?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .remote_listing
            .get(&id)
            .cloned()
            .unwrap_or_default())
    }

    async fn refresh_access_credential(&self, refresh_token: &str) -> Result<CredentialPair, ProviderError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.refresh_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock().unwrap();
        if state.refresh_failures_left > 0 {
            state.refresh_failures_left -= 1;
            return Err(ProviderError::Status {
                status: 503,
                message: "unavailable".into(),
            });
        }

        let Some(member) = refresh_token.strip_suffix("-refresh") else {
            return Err(ProviderError::Status {
                status: 400,
                message: "invalid_grant".into(),
            });
        };

        state.issued += 1;
        let access_token = format!("{member}-access-{}", state.issued);
        state
            .valid_tokens
            .insert(access_token.clone(), MemberId::new(member));

        Ok(CredentialPair {
            access_token,
            refresh_token: None,
        })
    }
}
