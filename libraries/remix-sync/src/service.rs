//! Engine facade used by the HTTP layer and the periodic job

use crate::credentials::CredentialRefreshCoordinator;
use crate::error::{Result, SyncError};
use crate::queue::{PlaylistRefreshQueue, QueuedJob};
use crate::rewriter::PlaylistRewriter;
use crate::types::{RefreshAllSummary, RepopulateReport, SubscribeOutcome, SyncSettings};
use futures_util::future::{join_all, FutureExt};
use remix_core::types::{HistoryEntry, Member, MemberId, Playlist, PlaylistId, PlaylistOverview};
use remix_core::{CredentialStore, MusicProvider};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Playlist operations on behalf of members
pub struct PlaylistService {
    store: Arc<dyn CredentialStore>,
    provider: Arc<dyn MusicProvider>,
    coordinator: Arc<CredentialRefreshCoordinator>,
    rewriter: Arc<PlaylistRewriter>,
    queue: PlaylistRefreshQueue<Option<RepopulateReport>>,
}

impl PlaylistService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        provider: Arc<dyn MusicProvider>,
        settings: SyncSettings,
    ) -> Self {
        let coordinator = Arc::new(CredentialRefreshCoordinator::new(
            Arc::clone(&store),
            Arc::clone(&provider),
            settings.credentials.clone(),
        ));
        let rewriter = Arc::new(PlaylistRewriter::new(
            Arc::clone(&store),
            Arc::clone(&provider),
            Arc::clone(&coordinator),
            settings.clone(),
        ));

        Self {
            store,
            provider,
            coordinator,
            rewriter,
            queue: PlaylistRefreshQueue::new(settings.job_timeout),
        }
    }

    pub fn coordinator(&self) -> &Arc<CredentialRefreshCoordinator> {
        &self.coordinator
    }

    pub fn queue(&self) -> &PlaylistRefreshQueue<Option<RepopulateReport>> {
        &self.queue
    }

    /// Queue a rebuild without waiting for it
    pub async fn enqueue_refresh(
        &self,
        playlist_id: &PlaylistId,
    ) -> QueuedJob<Option<RepopulateReport>> {
        let rewriter = Arc::clone(&self.rewriter);
        let id = playlist_id.clone();

        self.queue
            .enqueue(
                playlist_id.as_str(),
                Box::new(move || async move { rewriter.repopulate(&id).await }.boxed()),
            )
            .await
    }

    /// Rebuild a playlist and wait for this request's own result.
    ///
    /// `None` means the playlist is not stored.
    pub async fn refresh_playlist(
        &self,
        playlist_id: &PlaylistId,
    ) -> Result<Option<RepopulateReport>> {
        self.enqueue_refresh(playlist_id).await.wait().await
    }

    /// Create a remote playlist for the member behind `access_token`, store it
    /// with that member as owner and first participant, and queue its first
    /// rebuild.
    pub async fn create_playlist(&self, access_token: &str) -> Result<Playlist> {
        let mut member = self.member_for(access_token).await?;
        let owner_id = member.id.clone();

        let playlist_id = self
            .coordinator
            .with_fresh_credentials(&mut member, |token| {
                let provider = Arc::clone(&self.provider);
                let owner_id = owner_id.clone();
                async move { provider.create_playlist(&token, &owner_id).await }
            })
            .await?;

        let playlist = self.store.create_playlist(&playlist_id, &owner_id).await?;
        info!(playlist_id = %playlist_id, owner = %owner_id, "Playlist created");

        // Result is logged by the queue
        drop(self.enqueue_refresh(&playlist_id).await);

        Ok(playlist)
    }

    /// Follow a stored playlist and join it as a participant
    pub async fn subscribe_to_playlist(
        &self,
        access_token: &str,
        playlist_id: &PlaylistId,
    ) -> Result<SubscribeOutcome> {
        let mut member = self.member_for(access_token).await?;

        let playlist = self
            .store
            .get_playlist(playlist_id)
            .await?
            .ok_or_else(|| SyncError::not_found("Playlist", playlist_id.as_str()))?;

        if playlist.has_member(&member.id) {
            return Ok(SubscribeOutcome::AlreadyMember);
        }

        self.coordinator
            .with_fresh_credentials(&mut member, |token| {
                let provider = Arc::clone(&self.provider);
                async move { provider.follow_playlist(&token, playlist_id).await }
            })
            .await?;

        let playlist = self.store.add_playlist_member(playlist_id, &member.id).await?;
        info!(playlist_id = %playlist_id, member_id = %member.id, "Member subscribed");

        Ok(SubscribeOutcome::Subscribed(playlist))
    }

    /// Delete the given playlists the member owns; others are ignored.
    /// Returns the ids actually removed.
    pub async fn remove_playlists(
        &self,
        access_token: &str,
        playlist_ids: &[PlaylistId],
    ) -> Result<Vec<PlaylistId>> {
        let member = self.member_for(access_token).await?;

        let owned: Vec<PlaylistId> = playlist_ids
            .iter()
            .filter(|id| member.owns(id))
            .cloned()
            .collect();

        if owned.len() < playlist_ids.len() {
            warn!(
                member_id = %member.id,
                requested = playlist_ids.len(),
                owned = owned.len(),
                "Ignoring playlists the member does not own"
            );
        }

        if owned.is_empty() {
            return Ok(Vec::new());
        }

        let removed = self.store.delete_playlists(&owned).await?;
        info!(member_id = %member.id, removed = removed.len(), "Playlists removed");
        Ok(removed)
    }

    /// Full history of a stored playlist, oldest first
    pub async fn playlist_history(&self, playlist_id: &PlaylistId) -> Result<Vec<HistoryEntry>> {
        if self.store.get_playlist(playlist_id).await?.is_none() {
            return Err(SyncError::not_found("Playlist", playlist_id.as_str()));
        }

        Ok(self.store.playlist_history(playlist_id, None).await?)
    }

    /// The member's stored playlists, checked against what the provider
    /// still lists for them
    pub async fn list_playlists(&self, access_token: &str) -> Result<PlaylistOverview> {
        let mut member = self.member_for(access_token).await?;

        let remote = self
            .coordinator
            .with_fresh_credentials(&mut member, |token| {
                let provider = Arc::clone(&self.provider);
                async move { provider.user_playlists(&token).await }
            })
            .await?;
        let remote_ids: HashSet<PlaylistId> = remote.into_iter().map(|p| p.id).collect();

        let mut overview = PlaylistOverview::default();
        let mut seen = HashSet::new();

        for id in member.owned_playlists.iter().chain(&member.member_playlists) {
            if !seen.insert(id.clone()) {
                continue;
            }
            if !remote_ids.contains(id) {
                overview.orphaned.push(id.clone());
            } else if member.owns(id) {
                overview.owned.push(id.clone());
            } else {
                overview.subscribed.push(id.clone());
            }
        }

        Ok(overview)
    }

    /// Exchange the member's refresh credential now
    pub async fn refresh_member_credentials(
        &self,
        access_token: &str,
        identity: Option<&MemberId>,
    ) -> Result<Member> {
        self.coordinator
            .refresh(access_token, identity)
            .await
            .ok_or_else(|| SyncError::Authentication("could not refresh credentials".into()))
    }

    /// Queue a rebuild of every stored playlist and wait for all of them.
    /// Individual failures are logged and counted.
    pub async fn refresh_all_playlists(&self) -> Result<RefreshAllSummary> {
        let ids = self.store.list_playlist_ids().await?;
        info!(playlists = ids.len(), "Refreshing all playlists");

        let mut jobs = Vec::with_capacity(ids.len());
        for id in &ids {
            jobs.push(self.enqueue_refresh(id).await);
        }

        let results = join_all(jobs.into_iter().map(QueuedJob::wait)).await;

        let mut summary = RefreshAllSummary::default();
        for (id, result) in ids.iter().zip(results) {
            match result {
                Ok(Some(_)) => summary.refreshed += 1,
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    warn!(playlist_id = %id, error = %e, "Playlist refresh failed");
                    summary.failed += 1;
                }
            }
        }

        info!(
            refreshed = summary.refreshed,
            skipped = summary.skipped,
            failed = summary.failed,
            "Refresh pass complete"
        );
        Ok(summary)
    }

    async fn member_for(&self, access_token: &str) -> Result<Member> {
        self.store
            .find_member_by_access_token(access_token)
            .await?
            .ok_or_else(|| SyncError::Authentication("unknown access credential".into()))
    }
}
