/// Member domain types
use crate::types::{MemberId, PlaylistId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user account linked to the music provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Provider identity
    pub id: MemberId,

    /// Current access credential
    #[serde(skip_serializing, default)]
    pub access_token: String,

    /// Current refresh credential
    #[serde(skip_serializing, default)]
    pub refresh_token: String,

    /// Playlists this member created
    pub owned_playlists: Vec<PlaylistId>,

    /// Playlists this member participates in (including owned ones)
    pub member_playlists: Vec<PlaylistId>,

    /// First time the member was seen
    pub created_at: DateTime<Utc>,
}

impl Member {
    /// Create a member with no playlist relations
    pub fn new(
        id: MemberId,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            id,
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            owned_playlists: Vec::new(),
            member_playlists: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Replace the credential pair, keeping the old refresh credential when
    /// the provider did not issue a new one
    pub fn apply_credentials(&mut self, credentials: CredentialPair) {
        self.access_token = credentials.access_token;
        if let Some(refresh_token) = credentials.refresh_token {
            self.refresh_token = refresh_token;
        }
    }

    /// Whether the member owns the given playlist
    pub fn owns(&self, playlist_id: &PlaylistId) -> bool {
        self.owned_playlists.contains(playlist_id)
    }
}

/// Access/refresh pair returned by a credential exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    pub access_token: String,
    /// Absent when the provider keeps the previous refresh credential valid
    pub refresh_token: Option<String>,
}

/// Profile of the member behind an access credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub id: MemberId,
    pub display_name: Option<String>,
}
