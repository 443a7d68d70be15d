//! Replaces a playlist's remote tracklist and records what was placed

use crate::aggregator::MusicAggregator;
use crate::credentials::CredentialRefreshCoordinator;
use crate::error::Result;
use crate::interleave::interleave;
use crate::types::{RepopulateReport, SyncSettings};
use chrono::Utc;
use remix_core::types::{HistoryEntry, Member, PlaylistId};
use remix_core::{CredentialStore, MusicProvider, MAX_ITEMS_PER_REQUEST};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Rebuilds one playlist end to end.
///
/// There is no rollback: a failure after the removal step can leave the
/// remote playlist empty until the next successful rebuild.
pub struct PlaylistRewriter {
    store: Arc<dyn CredentialStore>,
    provider: Arc<dyn MusicProvider>,
    coordinator: Arc<CredentialRefreshCoordinator>,
    aggregator: MusicAggregator,
    settings: SyncSettings,
}

impl PlaylistRewriter {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        provider: Arc<dyn MusicProvider>,
        coordinator: Arc<CredentialRefreshCoordinator>,
        settings: SyncSettings,
    ) -> Self {
        let aggregator =
            MusicAggregator::new(Arc::clone(&provider), Arc::clone(&coordinator), settings.clone());
        Self {
            store,
            provider,
            coordinator,
            aggregator,
            settings,
        }
    }

    /// Rebuild the playlist. Returns `None` if it is not stored.
    pub async fn repopulate(&self, playlist_id: &PlaylistId) -> Result<Option<RepopulateReport>> {
        let Some(playlist) = self.store.get_playlist(playlist_id).await? else {
            info!(playlist_id = %playlist_id, "Playlist not stored, nothing to rebuild");
            return Ok(None);
        };

        let since = Utc::now() - self.settings.freshness_window();
        let history = self.store.playlist_history(playlist_id, Some(since)).await?;

        let mut members = playlist.members.clone();
        let tracks_per_member = self.settings.items_per_member(members.len());

        let candidates = self
            .aggregator
            .aggregate_candidates(&mut members, tracks_per_member, &history)
            .await?;
        let ordered = interleave(candidates);

        // Pick up a credential the aggregator may have refreshed
        let mut owner = members
            .iter()
            .find(|m| m.id == playlist.owner.id)
            .cloned()
            .unwrap_or_else(|| playlist.owner.clone());

        let removed = self.clear_remote(playlist_id, &mut owner).await?;

        let uris: Vec<String> = ordered.iter().map(|c| c.uri().to_string()).collect();
        for chunk in uris.chunks(MAX_ITEMS_PER_REQUEST) {
            self.coordinator
                .with_fresh_credentials(&mut owner, |token| {
                    let provider = Arc::clone(&self.provider);
                    async move { provider.add_playlist_tracks(playlist_id, &token, chunk).await }
                })
                .await?;
        }

        let now = Utc::now();
        let entries: Vec<HistoryEntry> = ordered
            .iter()
            .map(|candidate| HistoryEntry::from_candidate(candidate, now))
            .collect();
        self.store.append_history(playlist_id, &entries).await?;

        info!(
            playlist_id = %playlist_id,
            removed,
            inserted = ordered.len(),
            "Playlist rebuilt"
        );

        Ok(Some(RepopulateReport {
            playlist_id: playlist_id.clone(),
            removed,
            history_appended: entries.len(),
            inserted: ordered,
        }))
    }

    /// Remove every current remote track, at most 100 per call
    async fn clear_remote(&self, playlist_id: &PlaylistId, owner: &mut Member) -> Result<usize> {
        let current = self
            .coordinator
            .with_fresh_credentials(owner, |token| {
                let provider = Arc::clone(&self.provider);
                async move { provider.playlist_tracks(playlist_id, &token).await }
            })
            .await?;

        // The provider removes every occurrence of a URI
        let mut seen = HashSet::new();
        let uris: Vec<String> = current
            .into_iter()
            .map(|track| track.uri)
            .filter(|uri| seen.insert(uri.clone()))
            .collect();

        debug!(playlist_id = %playlist_id, tracks = uris.len(), "Clearing remote playlist");

        for chunk in uris.chunks(MAX_ITEMS_PER_REQUEST) {
            self.coordinator
                .with_fresh_credentials(owner, |token| {
                    let provider = Arc::clone(&self.provider);
                    async move {
                        provider
                            .remove_playlist_tracks(playlist_id, &token, chunk)
                            .await
                    }
                })
                .await?;
        }

        Ok(uris.len())
    }
}
