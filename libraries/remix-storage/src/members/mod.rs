//! Member queries: identity, credentials, and playlist relations

use crate::error::{timestamp, Result};
use remix_core::types::{Member, MemberId, PlaylistId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

/// Get a member by provider identity
pub async fn get_by_id(pool: &SqlitePool, id: &MemberId) -> Result<Option<Member>> {
    let row = sqlx::query(
        "SELECT id, access_token, refresh_token, created_at FROM members WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => Ok(Some(with_relations(pool, &row).await?)),
        None => Ok(None),
    }
}

/// Get the member currently holding an access credential
pub async fn get_by_access_token(pool: &SqlitePool, access_token: &str) -> Result<Option<Member>> {
    let row = sqlx::query(
        "SELECT id, access_token, refresh_token, created_at FROM members WHERE access_token = ? LIMIT 1",
    )
    .bind(access_token)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => Ok(Some(with_relations(pool, &row).await?)),
        None => Ok(None),
    }
}

/// Insert a member, or replace the credentials of an existing one
///
/// Playlist relations on the passed member are ignored; they are owned by
/// the playlists slice.
pub async fn upsert(pool: &SqlitePool, member: &Member) -> Result<Member> {
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        r#"
        INSERT INTO members (id, access_token, refresh_token, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            access_token = excluded.access_token,
            refresh_token = excluded.refresh_token,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(&member.id)
    .bind(&member.access_token)
    .bind(&member.refresh_token)
    .bind(member.created_at.timestamp())
    .bind(now)
    .execute(pool)
    .await?;

    get_by_id(pool, &member.id)
        .await?
        .ok_or_else(|| crate::StorageError::not_found("Member", member.id.as_str()))
}

/// Get all members, ordered by identity
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Member>> {
    let rows = sqlx::query(
        "SELECT id, access_token, refresh_token, created_at FROM members ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    let mut members = Vec::with_capacity(rows.len());
    for row in &rows {
        members.push(with_relations(pool, row).await?);
    }
    Ok(members)
}

async fn with_relations(pool: &SqlitePool, row: &SqliteRow) -> Result<Member> {
    let id: MemberId = row.get("id");

    let owned_playlists: Vec<PlaylistId> =
        sqlx::query_scalar("SELECT id FROM playlists WHERE owner_id = ? ORDER BY created_at, id")
            .bind(&id)
            .fetch_all(pool)
            .await?;

    let member_playlists: Vec<PlaylistId> = sqlx::query_scalar(
        "SELECT playlist_id FROM playlist_members WHERE member_id = ? ORDER BY joined_at, playlist_id",
    )
    .bind(&id)
    .fetch_all(pool)
    .await?;

    Ok(Member {
        id,
        access_token: row.get("access_token"),
        refresh_token: row.get("refresh_token"),
        owned_playlists,
        member_playlists,
        created_at: timestamp(row.get::<i64, _>("created_at"))?,
    })
}
