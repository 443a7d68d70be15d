//! Remix Storage
//!
//! `SQLite` persistence for members, shared playlists, and playlist history.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: `members`, `playlists` and `history` each own their
//!   queries and row mapping
//! - **Trait Boundary**: [`SqliteCredentialStore`] implements
//!   `remix_core::CredentialStore` on top of the slices
//!
//! # Example
//!
//! ```rust,no_run
//! use remix_storage::{create_pool, run_migrations, SqliteCredentialStore};
//! use remix_core::CredentialStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://remix.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = SqliteCredentialStore::new(pool);
//! let playlists = store.list_playlist_ids().await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

// Vertical slices
pub mod history;
pub mod members;
pub mod playlists;

pub use context::SqliteCredentialStore;
pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `sqlite://remix.db`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, StorageError> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(database_url = %database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}
