//! API Handlers

pub mod audit_logs;
pub mod auth;
pub mod classifications;
pub mod disbursements;
pub mod health;
pub mod navigation;
pub mod reports;
pub mod sessions;
pub mod users;

use std::sync::Arc;

use axum::{http::StatusCode, Json};

use crate::api::dto::ApiResponse;
use crate::application::services::{DisbursementService, ReportService};
use crate::application::session::SharedSessionStore;
use crate::auth::jwt::JwtConfig;
use crate::domain::{DomainError, RepositoryProvider};

/// Shared state for all API handlers
#[derive(Clone)]
pub struct AppState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub sessions: SharedSessionStore,
    pub disbursements: Arc<DisbursementService>,
    pub reports: Arc<ReportService>,
    pub jwt_config: JwtConfig,
}

/// Translate a domain error into an HTTP error response
pub(crate) fn domain_error_response(e: DomainError) -> (StatusCode, Json<ApiResponse<()>>) {
    let status = if e.is_transient() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        match &e {
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    };
    (status, Json(ApiResponse::error(e.to_string())))
}
