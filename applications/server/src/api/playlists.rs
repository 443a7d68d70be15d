/// Playlists API routes
use crate::{
    error::{Result, ServerError},
    middleware::BearerCredential,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};
use remix_core::types::{HistoryEntry, Playlist, PlaylistId, PlaylistOverview};
use remix_sync::{RepopulateReport, SubscribeOutcome};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct RemovePlaylistsRequest {
    pub playlist_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RemovePlaylistsResponse {
    pub removed: Vec<PlaylistId>,
}

/// GET /api/playlists
/// Stored playlists of the authenticated member, checked against the provider
pub async fn list_playlists(
    State(app_state): State<AppState>,
    auth: BearerCredential,
) -> Result<Json<PlaylistOverview>> {
    let overview = app_state.service.list_playlists(auth.token()).await?;
    Ok(Json(overview))
}

/// POST /api/playlists
/// Create a shared playlist owned by the authenticated member
pub async fn create_playlist(
    State(app_state): State<AppState>,
    auth: BearerCredential,
) -> Result<Json<Playlist>> {
    let playlist = app_state.service.create_playlist(auth.token()).await?;
    Ok(Json(playlist))
}

/// DELETE /api/playlists
/// Delete the listed playlists the member owns
pub async fn remove_playlists(
    State(app_state): State<AppState>,
    auth: BearerCredential,
    Json(req): Json<RemovePlaylistsRequest>,
) -> Result<Json<RemovePlaylistsResponse>> {
    if req.playlist_ids.is_empty() {
        return Err(ServerError::BadRequest(
            "playlist_ids must not be empty".to_string(),
        ));
    }

    let ids: Vec<PlaylistId> = req.playlist_ids.into_iter().map(PlaylistId::new).collect();
    let removed = app_state.service.remove_playlists(auth.token(), &ids).await?;

    Ok(Json(RemovePlaylistsResponse { removed }))
}

/// POST /api/playlists/:id/subscribe
/// Follow a playlist and join it as a participant
pub async fn subscribe(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: BearerCredential,
) -> Result<Json<Value>> {
    let playlist_id = PlaylistId::new(id);

    match app_state
        .service
        .subscribe_to_playlist(auth.token(), &playlist_id)
        .await?
    {
        SubscribeOutcome::Subscribed(playlist) => Ok(Json(
            serde_json::to_value(playlist).map_err(|e| ServerError::Internal(e.to_string()))?,
        )),
        SubscribeOutcome::AlreadyMember => Ok(Json(json!({ "already_member": true }))),
    }
}

/// POST /api/playlists/:id/refresh
/// Rebuild a playlist now and wait for the result
pub async fn refresh_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<RepopulateReport>> {
    let playlist_id = PlaylistId::new(id);

    app_state
        .service
        .refresh_playlist(&playlist_id)
        .await?
        .map(Json)
        .ok_or_else(|| ServerError::NotFound(format!("Playlist {playlist_id} not found")))
}

/// GET /api/playlists/:id/history
/// Every track ever inserted into the playlist, oldest first
pub async fn get_history(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<HistoryEntry>>> {
    let playlist_id = PlaylistId::new(id);
    let history = app_state.service.playlist_history(&playlist_id).await?;
    Ok(Json(history))
}
