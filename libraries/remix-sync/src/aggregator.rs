//! Candidate selection across playlist members

use crate::credentials::CredentialRefreshCoordinator;
use crate::error::Result;
use crate::types::SyncSettings;
use chrono::Utc;
use futures_util::future::join_all;
use remix_core::types::{CandidateTrack, HistoryEntry, Member, Track};
use remix_core::MusicProvider;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Tracks each member contributes: an even split of `max_total`, never less
/// than `min_per_member`. An empty playlist gets the whole budget.
pub fn items_per_member(member_count: usize, min_per_member: usize, max_total: usize) -> usize {
    if member_count == 0 {
        return max_total;
    }
    min_per_member.max(max_total / member_count)
}

/// One member's picks for a rebuild
struct Slice {
    top: Vec<Track>,
    liked: Vec<Track>,
    /// Tracks per primary artist, shared by top and liked picks
    artist_counts: HashMap<String, usize>,
}

impl Slice {
    fn new() -> Self {
        Self {
            top: Vec::new(),
            liked: Vec::new(),
            artist_counts: HashMap::new(),
        }
    }

    fn len(&self) -> usize {
        self.top.len() + self.liked.len()
    }
}

/// Collects candidate tracks from every member of a playlist
pub struct MusicAggregator {
    provider: Arc<dyn MusicProvider>,
    coordinator: Arc<CredentialRefreshCoordinator>,
    settings: SyncSettings,
}

impl MusicAggregator {
    pub fn new(
        provider: Arc<dyn MusicProvider>,
        coordinator: Arc<CredentialRefreshCoordinator>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            provider,
            coordinator,
            settings,
        }
    }

    /// Pick up to `tracks_per_member` tracks from each member, in member order.
    ///
    /// Top tracks come first; members left short are topped up from their
    /// liked tracks. Tracks in `history` younger than the freshness window
    /// are skipped, and no track is picked twice. Members whose credentials
    /// get refreshed along the way are updated in place.
    pub async fn aggregate_candidates(
        &self,
        members: &mut [Member],
        tracks_per_member: usize,
        history: &[HistoryEntry],
    ) -> Result<Vec<CandidateTrack>> {
        let cutoff = Utc::now() - self.settings.freshness_window();
        let mut excluded: HashSet<String> = history
            .iter()
            .filter(|entry| entry.created_at >= cutoff)
            .map(|entry| entry.track_uri.clone())
            .collect();

        debug!(
            members = members.len(),
            tracks_per_member,
            excluded = excluded.len(),
            "Aggregating candidates"
        );

        let provider = &self.provider;
        let top_tracks = join_all(members.iter_mut().map(|member| {
            self.coordinator.with_fresh_credentials(member, move |token| {
                let provider = Arc::clone(provider);
                async move { provider.top_tracks(&token).await }
            })
        }))
        .await;

        let mut slices = Vec::with_capacity(members.len());
        for tracks in top_tracks {
            let mut slice = Slice::new();
            let picked = self.pick(tracks?, tracks_per_member, &mut excluded, &mut slice.artist_counts);
            slice.top = picked;
            slices.push(slice);
        }

        // Filler for members whose top tracks came up short
        let short: Vec<usize> = slices
            .iter()
            .enumerate()
            .filter(|(_, slice)| slice.len() < tracks_per_member)
            .map(|(index, _)| index)
            .collect();

        if !short.is_empty() {
            let liked_tracks = join_all(
                members
                    .iter_mut()
                    .enumerate()
                    .filter(|(index, _)| short.contains(index))
                    .map(|(index, member)| async move {
                        let tracks = self
                            .coordinator
                            .with_fresh_credentials(member, move |token| {
                                let provider = Arc::clone(provider);
                                async move { provider.liked_tracks(&token).await }
                            })
                            .await;
                        (index, tracks)
                    }),
            )
            .await;

            for (index, tracks) in liked_tracks {
                let slice = &mut slices[index];
                let wanted = tracks_per_member - slice.len();
                slice.liked = self.pick(tracks?, wanted, &mut excluded, &mut slice.artist_counts);
            }
        }

        let mut candidates = Vec::new();
        for (member, slice) in members.iter().zip(slices) {
            debug!(
                member_id = %member.id,
                top = slice.top.len(),
                liked = slice.liked.len(),
                "Member slice"
            );
            candidates.extend(
                slice
                    .top
                    .into_iter()
                    .chain(slice.liked)
                    .map(|track| CandidateTrack::new(track, member.id.clone())),
            );
        }

        Ok(candidates)
    }

    /// Take up to `wanted` tracks in order, skipping excluded URIs and artists
    /// at their cap. Picked URIs join the exclusion set.
    fn pick(
        &self,
        tracks: Vec<Track>,
        wanted: usize,
        excluded: &mut HashSet<String>,
        artist_counts: &mut HashMap<String, usize>,
    ) -> Vec<Track> {
        let mut picked = Vec::new();

        for track in tracks {
            if picked.len() >= wanted {
                break;
            }
            if track.uri.is_empty() || excluded.contains(&track.uri) {
                continue;
            }

            let count = artist_counts
                .entry(track.primary_artist().to_string())
                .or_insert(0);
            if *count >= self.settings.max_tracks_per_artist {
                continue;
            }

            *count += 1;
            excluded.insert(track.uri.clone());
            picked.push(track);
        }

        picked
    }
}
