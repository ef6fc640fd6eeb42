//! Disbursement REST API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::{ApiResponse, PaginatedResponse, PaginationParams};
use crate::api::handlers::{domain_error_response, AppState};
use crate::auth::middleware::CurrentUser;
use std::collections::BTreeMap;

use crate::domain::disbursement::{
    Classification, Disbursement, DisbursementFilter, DisbursementSummary, DisbursementUpdate,
    NewDisbursement,
};

/// Aggregated totals, amounts in centavos
#[derive(Debug, Serialize, ToSchema)]
pub struct DisbursementSummaryDto {
    pub total_amount_centavos: i64,
    pub total_count: u64,
    /// Totals keyed by classification (`PS`, `MOOE`, `CO`, `TR`)
    pub by_classification: BTreeMap<String, i64>,
    pub by_department: BTreeMap<String, i64>,
    pub by_fund_source: BTreeMap<String, i64>,
}

impl From<DisbursementSummary> for DisbursementSummaryDto {
    fn from(s: DisbursementSummary) -> Self {
        Self {
            total_amount_centavos: s.total_amount_centavos,
            total_count: s.total_count,
            by_classification: s
                .by_classification
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            by_department: s.by_department,
            by_fund_source: s.by_fund_source,
        }
    }
}

/// Disbursement record
///
/// Amounts are in centavos (smallest currency unit).
#[derive(Debug, Serialize, ToSchema)]
pub struct DisbursementDto {
    /// Unique record id (UUID)
    pub id: String,
    pub payee: String,
    /// Amount in centavos
    pub amount_centavos: i64,
    /// Formatted amount, e.g. `45000.00 PHP`
    pub amount_display: String,
    pub disbursement_date: NaiveDate,
    pub fund_source: String,
    /// Classification: `PS`, `MOOE`, `CO`, `TR`
    pub classification: String,
    pub description: String,
    /// Disbursement voucher reference (unique)
    pub reference_number: String,
    pub department: String,
    pub encoded_by: String,
    pub encoded_at: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub is_archived: bool,
}

impl From<Disbursement> for DisbursementDto {
    fn from(d: Disbursement) -> Self {
        Self {
            amount_display: Disbursement::format_amount(d.amount_centavos),
            id: d.id,
            payee: d.payee,
            amount_centavos: d.amount_centavos,
            disbursement_date: d.disbursement_date,
            fund_source: d.fund_source,
            classification: d.classification.to_string(),
            description: d.description,
            reference_number: d.reference_number,
            department: d.department,
            encoded_by: d.encoded_by,
            encoded_at: d.encoded_at,
            updated_by: d.updated_by,
            updated_at: d.updated_at,
            is_archived: d.is_archived,
        }
    }
}

/// Create-disbursement request
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[schema(example = json!({
    "payee": "Office Supplies Inc.",
    "amount_centavos": 2500000,
    "disbursement_date": "2024-01-20",
    "fund_source": "General Fund",
    "classification": "MOOE",
    "description": "Office supplies and stationery materials",
    "reference_number": "DV-2024-0002",
    "department": "Finance"
}))]
pub struct CreateDisbursementRequest {
    #[validate(length(min = 1, max = 255))]
    pub payee: String,
    /// Amount in centavos, must be positive
    #[validate(range(min = 1))]
    pub amount_centavos: i64,
    pub disbursement_date: NaiveDate,
    #[validate(length(min = 1, max = 100))]
    pub fund_source: String,
    /// Classification: `PS`, `MOOE`, `CO`, `TR`
    pub classification: String,
    pub description: String,
    #[validate(length(min = 1, max = 64))]
    pub reference_number: String,
    #[validate(length(min = 1, max = 100))]
    pub department: String,
}

/// Update-disbursement request (partial)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateDisbursementRequest {
    pub payee: Option<String>,
    pub amount_centavos: Option<i64>,
    pub disbursement_date: Option<NaiveDate>,
    pub fund_source: Option<String>,
    /// New classification: `PS`, `MOOE`, `CO`, `TR`
    pub classification: Option<String>,
    pub description: Option<String>,
    pub reference_number: Option<String>,
    pub department: Option<String>,
}

/// List/report filter parameters. All filters are conjunctive.
#[derive(Debug, Default, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct DisbursementFilterParams {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub department: Option<String>,
    /// Classification: `PS`, `MOOE`, `CO`, `TR`
    pub classification: Option<String>,
    pub fund_source: Option<String>,
    /// Case-insensitive substring match on the payee
    pub payee: Option<String>,
    pub min_amount_centavos: Option<i64>,
    pub max_amount_centavos: Option<i64>,
    pub encoded_by: Option<String>,
    /// `true` lists archived records instead of active ones
    pub archived: Option<bool>,
}

impl DisbursementFilterParams {
    pub fn into_filter(self) -> Result<DisbursementFilter, String> {
        let classification = match &self.classification {
            Some(name) => match Classification::parse(name) {
                Some(c) => Some(c),
                None => return Err(format!("Unknown classification: {}", name)),
            },
            None => None,
        };
        Ok(DisbursementFilter {
            date_from: self.date_from,
            date_to: self.date_to,
            department: self.department,
            classification,
            fund_source: self.fund_source,
            payee: self.payee,
            min_amount_centavos: self.min_amount_centavos,
            max_amount_centavos: self.max_amount_centavos,
            encoded_by: self.encoded_by,
            include_archived: self.archived,
        })
    }
}

fn bad_request(message: String) -> (StatusCode, Json<ApiResponse<()>>) {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message)))
}

/// List disbursements
///
/// Archived records are excluded unless `archived=true` is passed.
#[utoipa::path(
    get,
    path = "/api/v1/disbursements",
    tag = "Disbursements",
    security(("bearer_auth" = [])),
    params(DisbursementFilterParams, PaginationParams),
    responses(
        (status = 200, description = "Filtered disbursement list", body = PaginatedResponse<DisbursementDto>),
        (status = 400, description = "Unknown classification in filter")
    )
)]
pub async fn list_disbursements(
    State(state): State<AppState>,
    Query(filter): Query<DisbursementFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<DisbursementDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let filter = filter.into_filter().map_err(bad_request)?;
    let records = state
        .disbursements
        .list(&filter)
        .await
        .map_err(domain_error_response)?;

    let dtos: Vec<DisbursementDto> = records.into_iter().map(Into::into).collect();
    Ok(Json(PaginatedResponse::paginate(dtos, &pagination)))
}

/// Get a disbursement by id
#[utoipa::path(
    get,
    path = "/api/v1/disbursements/{id}",
    tag = "Disbursements",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Record id")),
    responses(
        (status = 200, description = "Record details", body = ApiResponse<DisbursementDto>),
        (status = 404, description = "Record not found")
    )
)]
pub async fn get_disbursement(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DisbursementDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let record = state
        .disbursements
        .get(&id)
        .await
        .map_err(domain_error_response)?;

    match record {
        Some(record) => Ok(Json(ApiResponse::success(record.into()))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Disbursement not found")),
        )),
    }
}

/// Create a disbursement record
#[utoipa::path(
    post,
    path = "/api/v1/disbursements",
    tag = "Disbursements",
    security(("bearer_auth" = [])),
    request_body = CreateDisbursementRequest,
    responses(
        (status = 201, description = "Record created", body = ApiResponse<DisbursementDto>),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Reference number already exists")
    )
)]
pub async fn create_disbursement(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateDisbursementRequest>,
) -> Result<(StatusCode, Json<ApiResponse<DisbursementDto>>), (StatusCode, Json<ApiResponse<()>>)> {
    request
        .validate()
        .map_err(|e| bad_request(e.to_string()))?;

    let Some(classification) = Classification::parse(&request.classification) else {
        return Err(bad_request(format!(
            "Unknown classification: {}",
            request.classification
        )));
    };

    let created = state
        .disbursements
        .create(
            NewDisbursement {
                payee: request.payee,
                amount_centavos: request.amount_centavos,
                disbursement_date: request.disbursement_date,
                fund_source: request.fund_source,
                classification,
                description: request.description,
                reference_number: request.reference_number,
                department: request.department,
            },
            &current.user,
        )
        .await
        .map_err(domain_error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(created.into())),
    ))
}

/// Update a disbursement record
#[utoipa::path(
    put,
    path = "/api/v1/disbursements/{id}",
    tag = "Disbursements",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Record id")),
    request_body = UpdateDisbursementRequest,
    responses(
        (status = 200, description = "Record updated", body = ApiResponse<DisbursementDto>),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Record not found"),
        (status = 409, description = "Reference number already exists")
    )
)]
pub async fn update_disbursement(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(request): Json<UpdateDisbursementRequest>,
) -> Result<Json<ApiResponse<DisbursementDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let classification = match &request.classification {
        Some(name) => match Classification::parse(name) {
            Some(c) => Some(c),
            None => return Err(bad_request(format!("Unknown classification: {}", name))),
        },
        None => None,
    };

    let updated = state
        .disbursements
        .update(
            &id,
            DisbursementUpdate {
                payee: request.payee,
                amount_centavos: request.amount_centavos,
                disbursement_date: request.disbursement_date,
                fund_source: request.fund_source,
                classification,
                description: request.description,
                reference_number: request.reference_number,
                department: request.department,
            },
            &current.user,
        )
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(updated.into())))
}

/// Archive a disbursement record
#[utoipa::path(
    post,
    path = "/api/v1/disbursements/{id}/archive",
    tag = "Disbursements",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Record id")),
    responses(
        (status = 200, description = "Record archived"),
        (status = 404, description = "Record not found")
    )
)]
pub async fn archive_disbursement(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    state
        .disbursements
        .set_archived(&id, true, &current.user)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(())))
}

/// Restore an archived disbursement record
#[utoipa::path(
    post,
    path = "/api/v1/disbursements/{id}/restore",
    tag = "Disbursements",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Record id")),
    responses(
        (status = 200, description = "Record restored"),
        (status = 404, description = "Record not found")
    )
)]
pub async fn restore_disbursement(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    state
        .disbursements
        .set_archived(&id, false, &current.user)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(())))
}

/// Delete a disbursement record
#[utoipa::path(
    delete,
    path = "/api/v1/disbursements/{id}",
    tag = "Disbursements",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Record id")),
    responses(
        (status = 200, description = "Record deleted"),
        (status = 404, description = "Record not found")
    )
)]
pub async fn delete_disbursement(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    state
        .disbursements
        .delete(&id, &current.user)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(())))
}

/// Aggregated totals over the filtered record set
#[utoipa::path(
    get,
    path = "/api/v1/disbursements/stats",
    tag = "Disbursements",
    security(("bearer_auth" = [])),
    params(DisbursementFilterParams),
    responses(
        (status = 200, description = "Totals by classification, department and fund source", body = ApiResponse<DisbursementSummaryDto>),
        (status = 400, description = "Unknown classification in filter")
    )
)]
pub async fn get_disbursement_stats(
    State(state): State<AppState>,
    Query(filter): Query<DisbursementFilterParams>,
) -> Result<Json<ApiResponse<DisbursementSummaryDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let filter = filter.into_filter().map_err(bad_request)?;
    let summary = state
        .disbursements
        .summary(&filter)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(summary.into())))
}
