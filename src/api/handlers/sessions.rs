//! Active session management handlers (admin only)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::dto::ApiResponse;
use crate::api::handlers::AppState;

/// Active session
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionDto {
    pub id: String,
    pub user_id: String,
    pub username: String,
    /// `admin`, `encoder`, `viewer`
    pub role: String,
    pub signed_in_at: DateTime<Utc>,
}

/// List active sessions
#[utoipa::path(
    get,
    path = "/api/v1/sessions",
    tag = "Sessions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All active sessions", body = ApiResponse<Vec<SessionDto>>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_sessions(State(state): State<AppState>) -> Json<ApiResponse<Vec<SessionDto>>> {
    let sessions = state
        .sessions
        .active_sessions()
        .into_iter()
        .map(|s| SessionDto {
            id: s.id,
            user_id: s.user.id,
            username: s.user.username,
            role: s.user.role.as_str().to_string(),
            signed_in_at: s.signed_in_at,
        })
        .collect();
    Json(ApiResponse::success(sessions))
}

/// Revoke a session
///
/// The revoked session is treated as unauthenticated on its next
/// request.
#[utoipa::path(
    delete,
    path = "/api/v1/sessions/{id}",
    tag = "Sessions",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session revoked"),
        (status = 404, description = "Session not found")
    )
)]
pub async fn revoke_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    if state.sessions.revoke(&id) {
        Ok(Json(ApiResponse::success(())))
    } else {
        Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Session not found")),
        ))
    }
}
