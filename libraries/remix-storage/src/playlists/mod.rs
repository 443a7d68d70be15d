//! Playlist queries: creation, participants, deletion

use crate::error::{timestamp, Result};
use crate::{members, StorageError};
use remix_core::types::{MemberId, Playlist, PlaylistId};
use sqlx::{Row, SqlitePool};

/// Get a playlist with its owner and participants (in join order)
pub async fn get_by_id(pool: &SqlitePool, id: &PlaylistId) -> Result<Option<Playlist>> {
    let Some(row) = sqlx::query("SELECT id, owner_id, created_at FROM playlists WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };

    let owner_id: MemberId = row.get("owner_id");
    let owner = members::get_by_id(pool, &owner_id)
        .await?
        .ok_or_else(|| StorageError::not_found("Member", owner_id.as_str()))?;

    let member_ids: Vec<MemberId> = sqlx::query_scalar(
        "SELECT member_id FROM playlist_members WHERE playlist_id = ? ORDER BY position",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let mut participants = Vec::with_capacity(member_ids.len());
    for member_id in &member_ids {
        let member = members::get_by_id(pool, member_id)
            .await?
            .ok_or_else(|| StorageError::not_found("Member", member_id.as_str()))?;
        participants.push(member);
    }

    Ok(Some(Playlist {
        id: row.get("id"),
        owner,
        members: participants,
        created_at: timestamp(row.get::<i64, _>("created_at"))?,
    }))
}

/// Record a new playlist owned by `owner`, who also becomes its first participant
pub async fn create(pool: &SqlitePool, id: &PlaylistId, owner: &MemberId) -> Result<Playlist> {
    let now = chrono::Utc::now().timestamp();
    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO playlists (id, owner_id, created_at) VALUES (?, ?, ?)")
        .bind(id)
        .bind(owner)
        .bind(now)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        "INSERT INTO playlist_members (playlist_id, member_id, position, joined_at) VALUES (?, ?, 0, ?)",
    )
    .bind(id)
    .bind(owner)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("Playlist", id.as_str()))
}

/// Append a participant; existing participants keep their position
pub async fn add_member(pool: &SqlitePool, id: &PlaylistId, member: &MemberId) -> Result<Playlist> {
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        r#"
        INSERT INTO playlist_members (playlist_id, member_id, position, joined_at)
        SELECT ?, ?, COALESCE(MAX(position) + 1, 0), ?
        FROM playlist_members WHERE playlist_id = ?
        ON CONFLICT(playlist_id, member_id) DO NOTHING
        "#,
    )
    .bind(id)
    .bind(member)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("Playlist", id.as_str()))
}

/// Delete playlists with their participants and history.
///
/// Returns the ids that actually existed.
pub async fn delete(pool: &SqlitePool, ids: &[PlaylistId]) -> Result<Vec<PlaylistId>> {
    let mut removed = Vec::new();
    let mut tx = pool.begin().await?;

    for id in ids {
        sqlx::query("DELETE FROM playlist_history WHERE playlist_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM playlist_members WHERE playlist_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM playlists WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() > 0 {
            removed.push(id.clone());
        }
    }

    tx.commit().await?;
    Ok(removed)
}

/// Ids of every stored playlist, oldest first
pub async fn list_ids(pool: &SqlitePool) -> Result<Vec<PlaylistId>> {
    let ids = sqlx::query_scalar("SELECT id FROM playlists ORDER BY created_at, id")
        .fetch_all(pool)
        .await?;
    Ok(ids)
}
