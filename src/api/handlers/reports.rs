//! Report endpoints

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use crate::api::dto::ApiResponse;
use crate::api::handlers::disbursements::{DisbursementFilterParams, DisbursementSummaryDto};
use crate::api::handlers::{domain_error_response, AppState};
use crate::auth::middleware::CurrentUser;

fn bad_request(message: String) -> (StatusCode, Json<ApiResponse<()>>) {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message)))
}

/// Summary report
///
/// Same filter model as the disbursement list; totals are grouped by
/// classification, department, and fund source.
#[utoipa::path(
    get,
    path = "/api/v1/reports/summary",
    tag = "Reports",
    security(("bearer_auth" = [])),
    params(DisbursementFilterParams),
    responses(
        (status = 200, description = "Aggregated totals", body = ApiResponse<DisbursementSummaryDto>),
        (status = 400, description = "Unknown classification in filter")
    )
)]
pub async fn summary_report(
    State(state): State<AppState>,
    Query(filter): Query<DisbursementFilterParams>,
) -> Result<Json<ApiResponse<DisbursementSummaryDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let filter = filter.into_filter().map_err(bad_request)?;
    let summary = state
        .reports
        .summary(&filter)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(summary.into())))
}

/// Export disbursements as CSV
///
/// The export is recorded in the audit trail.
#[utoipa::path(
    get,
    path = "/api/v1/reports/export",
    tag = "Reports",
    security(("bearer_auth" = [])),
    params(DisbursementFilterParams),
    responses(
        (status = 200, description = "CSV file", body = String, content_type = "text/csv"),
        (status = 400, description = "Unknown classification in filter")
    )
)]
pub async fn export_report(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(filter): Query<DisbursementFilterParams>,
) -> Result<impl IntoResponse, (StatusCode, Json<ApiResponse<()>>)> {
    let filter = filter.into_filter().map_err(bad_request)?;
    let csv = state
        .reports
        .export_csv(&filter, &current.user)
        .await
        .map_err(domain_error_response)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"disbursements.csv\"",
            ),
        ],
        csv,
    ))
}
