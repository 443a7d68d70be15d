//! Remix Core
//!
//! Domain types, collaborator traits, and error handling shared by every
//! crate in the Remix workspace.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Member`, `Playlist`, `HistoryEntry`, `Track`, `CandidateTrack`
//! - **Collaborator Traits**: `CredentialStore` (persistence) and `MusicProvider`
//!   (the third-party music service)
//! - **Error Handling**: `RemixError` for storage-facing code, `ProviderError`
//!   for anything that crosses the provider boundary
//!
//! # Example
//!
//! ```rust
//! use remix_core::types::{CandidateTrack, MemberId, Track};
//!
//! let track = Track::new("spotify:track:1", "Song", vec!["Artist".into()], "Album");
//! let candidate = CandidateTrack::new(track, MemberId::new("alice"));
//! assert_eq!(candidate.contributor.as_str(), "alice");
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod provider;
pub mod store;
pub mod types;

pub use error::{ProviderError, RemixError, Result};
pub use provider::{MusicProvider, MAX_ITEMS_PER_REQUEST};
pub use store::CredentialStore;

pub use types::{
    CandidateTrack, CredentialPair, HistoryEntry, Member, MemberId, Playlist, PlaylistId,
    PlaylistOverview, ProviderProfile, RemotePlaylist, Track,
};
