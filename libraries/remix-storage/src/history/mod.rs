//! Playlist history: append-only, read by time window

use crate::error::{timestamp, Result};
use chrono::{DateTime, Utc};
use remix_core::types::{HistoryEntry, PlaylistId};
use sqlx::{Row, SqlitePool};

/// Append entries in one transaction
pub async fn append(pool: &SqlitePool, playlist_id: &PlaylistId, entries: &[HistoryEntry]) -> Result<()> {
    if entries.is_empty() {
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    for entry in entries {
        sqlx::query(
            r#"
            INSERT INTO playlist_history (playlist_id, track_uri, member_id, title, artist, album, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(playlist_id)
        .bind(&entry.track_uri)
        .bind(&entry.member_id)
        .bind(&entry.title)
        .bind(&entry.artist)
        .bind(&entry.album)
        .bind(entry.created_at.timestamp())
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    Ok(())
}

/// Entries for a playlist, oldest first; `since` keeps only entries created
/// at or after that instant
pub async fn get_for_playlist(
    pool: &SqlitePool,
    playlist_id: &PlaylistId,
    since: Option<DateTime<Utc>>,
) -> Result<Vec<HistoryEntry>> {
    let since = since.map_or(i64::MIN, |s| s.timestamp());

    let rows = sqlx::query(
        r#"
        SELECT track_uri, member_id, title, artist, album, created_at
        FROM playlist_history
        WHERE playlist_id = ? AND created_at >= ?
        ORDER BY created_at, id
        "#,
    )
    .bind(playlist_id)
    .bind(since)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(HistoryEntry {
                track_uri: row.get("track_uri"),
                member_id: row.get("member_id"),
                title: row.get("title"),
                artist: row.get("artist"),
                album: row.get("album"),
                created_at: timestamp(row.get::<i64, _>("created_at"))?,
            })
        })
        .collect()
}
