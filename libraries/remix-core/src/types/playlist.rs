/// Playlist domain types
use crate::types::{CandidateTrack, Member, MemberId, PlaylistId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A shared playlist kept in sync with the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Remote playlist identifier
    pub id: PlaylistId,

    /// Owning member; rewrites use this member's credential
    pub owner: Member,

    /// Participants in join order, unique by identity. The owner is always
    /// the first participant.
    pub members: Vec<Member>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Playlist {
    /// Whether the given identity already participates
    pub fn has_member(&self, member_id: &MemberId) -> bool {
        self.members.iter().any(|m| &m.id == member_id)
    }
}

/// One track placed in a playlist by a rebuild
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub track_uri: String,
    pub member_id: MemberId,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Record a candidate that was just inserted
    pub fn from_candidate(candidate: &CandidateTrack, created_at: DateTime<Utc>) -> Self {
        Self {
            track_uri: candidate.track.uri.clone(),
            member_id: candidate.contributor.clone(),
            title: candidate.track.name.clone(),
            artist: candidate.track.primary_artist().to_string(),
            album: candidate.track.album.clone(),
            created_at,
        }
    }
}

/// A playlist as listed by the provider for one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemotePlaylist {
    pub id: PlaylistId,
    pub name: String,
    pub owner_id: MemberId,
}

/// A member's stored playlists checked against what the provider still has
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistOverview {
    /// Owned by the member and present remotely
    pub owned: Vec<PlaylistId>,
    /// Joined (not owned) and present remotely
    pub subscribed: Vec<PlaylistId>,
    /// Stored for the member but gone from the provider
    pub orphaned: Vec<PlaylistId>,
}
