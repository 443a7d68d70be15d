//! Remix Sync
//!
//! The playlist synchronization engine: decides what goes into a shared
//! playlist, serializes rebuilds per playlist, and keeps member credentials
//! valid under concurrent demand.
//!
//! Control flow for a rebuild:
//!
//! ```text
//! PlaylistService::refresh_playlist
//!   -> PlaylistRefreshQueue (one rebuild per playlist at a time)
//!   -> PlaylistRewriter::repopulate
//!        -> MusicAggregator -> interleave -> MusicProvider -> CredentialStore
//! ```
//!
//! Any provider call that fails with `Unauthorized` goes through the
//! `CredentialRefreshCoordinator` once before the error is surfaced.

mod aggregator;
mod credentials;
mod error;
mod interleave;
mod queue;
mod rewriter;
mod service;
mod types;

// Public exports
pub use aggregator::{items_per_member, MusicAggregator};
pub use credentials::CredentialRefreshCoordinator;
pub use error::{Result, SyncError};
pub use interleave::interleave;
pub use queue::{PlaylistRefreshQueue, QueuedJob, RefreshJob};
pub use rewriter::PlaylistRewriter;
pub use service::PlaylistService;
pub use types::{CredentialSettings, RefreshAllSummary, RepopulateReport, SubscribeOutcome, SyncSettings};
