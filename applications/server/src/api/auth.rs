/// Credential API routes
use crate::{error::Result, middleware::BearerCredential, state::AppState};
use axum::{extract::State, Json};
use remix_core::types::{Member, MemberId};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub member_id: Option<String>,
}

/// POST /api/auth/refresh
/// Exchange the member's refresh credential; the body may name the member
/// when the bearer credential has already been rotated elsewhere.
pub async fn refresh(
    State(app_state): State<AppState>,
    auth: BearerCredential,
    body: Option<Json<RefreshRequest>>,
) -> Result<Json<Member>> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let identity = req.member_id.map(MemberId::new);

    let member = app_state
        .service
        .refresh_member_credentials(auth.token(), identity.as_ref())
        .await?;

    Ok(Json(member))
}
