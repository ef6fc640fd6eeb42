//! Audit log query handlers (admin only)

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::dto::{ApiResponse, PaginatedResponse, PaginationParams};
use crate::api::handlers::{domain_error_response, AppState};
use crate::domain::audit::{AuditAction, AuditEntry, AuditFilter};

/// Audit trail record
#[derive(Debug, Serialize, ToSchema)]
pub struct AuditEntryDto {
    pub id: String,
    pub user_id: String,
    /// `LOGIN`, `LOGOUT`, `CREATE`, `UPDATE`, `DELETE`, `ARCHIVE`, `EXPORT`
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub detail: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl From<AuditEntry> for AuditEntryDto {
    fn from(e: AuditEntry) -> Self {
        Self {
            id: e.id,
            user_id: e.user_id,
            action: e.action.as_str().to_string(),
            entity_type: e.entity_type,
            entity_id: e.entity_id,
            detail: e.detail,
            recorded_at: e.recorded_at,
        }
    }
}

/// Audit query parameters
#[derive(Debug, Default, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct AuditFilterParams {
    pub user_id: Option<String>,
    /// `LOGIN`, `LOGOUT`, `CREATE`, `UPDATE`, `DELETE`, `ARCHIVE`, `EXPORT`
    pub action: Option<String>,
    pub entity_type: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// List audit log entries, newest first
#[utoipa::path(
    get,
    path = "/api/v1/audit-logs",
    tag = "Audit",
    security(("bearer_auth" = [])),
    params(AuditFilterParams, PaginationParams),
    responses(
        (status = 200, description = "Audit trail page", body = PaginatedResponse<AuditEntryDto>),
        (status = 400, description = "Unknown action in filter"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_audit_logs(
    State(state): State<AppState>,
    Query(params): Query<AuditFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<AuditEntryDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let action = match &params.action {
        Some(name) => match AuditAction::parse(name) {
            Some(action) => Some(action),
            None => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::error(format!("Unknown action: {}", name))),
                ));
            }
        },
        None => None,
    };

    let filter = AuditFilter {
        user_id: params.user_id,
        action,
        entity_type: params.entity_type,
        from: params.from,
        to: params.to,
    };

    let entries = state
        .repos
        .audit_logs()
        .find_filtered(&filter)
        .await
        .map_err(domain_error_response)?;

    let dtos: Vec<AuditEntryDto> = entries.into_iter().map(Into::into).collect();
    Ok(Json(PaginatedResponse::paginate(dtos, &pagination)))
}
