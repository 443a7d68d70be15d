//! Remix Provider Client
//!
//! HTTP client for the Spotify Web API, used by the playlist engine through
//! the `remix_core::MusicProvider` trait.
//!
//! # Features
//!
//! - **Credentials**: exchange a refresh credential for a new access credential
//! - **Library**: top tracks, liked tracks, current profile
//! - **Playlists**: read, clear, fill, follow and create playlists
//!
//! Listing endpoints are paginated by the provider; the client follows the
//! `next` link until it is exhausted.
//!
//! # Example
//!
//! ```ignore
//! use remix_provider_client::{ProviderConfig, SpotifyClient};
//! use remix_core::MusicProvider;
//!
//! let config = ProviderConfig::new("client-id", "client-secret");
//! let client = SpotifyClient::new(config)?;
//!
//! let tracks = client.top_tracks("access-token").await?;
//! println!("Found {} top tracks", tracks.len());
//! ```

mod auth;
mod client;
mod error;
mod library;
mod playlists;
mod types;

pub use client::SpotifyClient;
pub use error::{ProviderClientError, Result};
pub use types::{ProviderConfig, DEFAULT_ACCOUNTS_URL, DEFAULT_API_URL};

pub use auth::AuthClient;
pub use library::LibraryClient;
pub use playlists::PlaylistClient;
