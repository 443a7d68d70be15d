/// Track types
use crate::types::MemberId;
use serde::{Deserialize, Serialize};

/// A track as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Provider URI, e.g. `spotify:track:...`
    pub uri: String,
    pub name: String,
    /// Credited artists, primary first
    pub artists: Vec<String>,
    pub album: String,
}

impl Track {
    pub fn new(
        uri: impl Into<String>,
        name: impl Into<String>,
        artists: Vec<String>,
        album: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
            artists,
            album: album.into(),
        }
    }

    /// First credited artist, or an empty string for artist-less items
    pub fn primary_artist(&self) -> &str {
        self.artists.first().map(String::as_str).unwrap_or_default()
    }
}

/// A track proposed for a rebuild, tagged with the member who contributed it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTrack {
    pub track: Track,
    pub contributor: MemberId,
}

impl CandidateTrack {
    pub fn new(track: Track, contributor: MemberId) -> Self {
        Self { track, contributor }
    }

    pub fn uri(&self) -> &str {
        &self.track.uri
    }
}
