use remix_core::types::{CandidateTrack, Playlist, PlaylistId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Engine tunables
#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// History entries younger than this exclude their track from a rebuild
    pub freshness_window_days: i64,
    /// Most tracks one artist may place in a single member's slice
    pub max_tracks_per_artist: usize,
    /// Floor for each member's share of the playlist
    pub min_tracks_per_member: usize,
    /// Target playlist size, split evenly between members
    pub max_playlist_tracks: usize,
    /// Upper bound on a single queued rebuild; `None` waits forever
    pub job_timeout: Option<Duration>,
    pub credentials: CredentialSettings,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            freshness_window_days: 14,
            max_tracks_per_artist: 2,
            min_tracks_per_member: 6,
            max_playlist_tracks: 48,
            job_timeout: None,
            credentials: CredentialSettings::default(),
        }
    }
}

impl SyncSettings {
    /// Tracks each of `member_count` members contributes to one rebuild
    pub fn items_per_member(&self, member_count: usize) -> usize {
        crate::aggregator::items_per_member(
            member_count,
            self.min_tracks_per_member,
            self.max_playlist_tracks,
        )
    }

    pub fn freshness_window(&self) -> chrono::Duration {
        chrono::Duration::days(self.freshness_window_days)
    }
}

/// Credential refresh tunables
#[derive(Debug, Clone)]
pub struct CredentialSettings {
    /// Exchange attempts before a refresh resolves to "no member"
    pub max_attempts: u32,
    /// Lifetime of an in-flight marker if its refresh never completes
    pub in_flight_ttl: Duration,
    /// Delay before the second attempt; grows linearly per attempt
    pub retry_backoff: Duration,
}

impl Default for CredentialSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            in_flight_ttl: Duration::from_secs(60),
            retry_backoff: Duration::from_millis(250),
        }
    }
}

/// Outcome of one completed rebuild
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepopulateReport {
    pub playlist_id: PlaylistId,
    /// Remote tracks removed before inserting
    pub removed: usize,
    /// Tracks inserted, in playlist order
    pub inserted: Vec<CandidateTrack>,
    pub history_appended: usize,
}

/// Result of a subscribe request
#[derive(Debug, Clone)]
pub enum SubscribeOutcome {
    Subscribed(Playlist),
    AlreadyMember,
}

/// Counts from a pass over every stored playlist
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshAllSummary {
    pub refreshed: usize,
    /// Playlists deleted between listing and rebuilding
    pub skipped: usize,
    pub failed: usize,
}
