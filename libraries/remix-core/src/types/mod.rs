mod ids;
mod member;
mod playlist;
mod track;

pub use ids::{MemberId, PlaylistId};
pub use member::{CredentialPair, Member, ProviderProfile};
pub use playlist::{HistoryEntry, Playlist, PlaylistOverview, RemotePlaylist};
pub use track::{CandidateTrack, Track};
