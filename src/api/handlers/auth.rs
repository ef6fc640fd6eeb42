//! Authentication API handlers

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::api::dto::ApiResponse;
use crate::api::handlers::AppState;
use crate::application::session::AuthError;
use crate::auth::middleware::CurrentUser;
use crate::auth::{create_token, hash_password, verify_password};
use crate::domain::audit::{AuditAction, NewAuditEntry};
use crate::domain::user::User;

/// Sign-in request
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({
    "email": "admin@agency.gov.ph",
    "password": "secret123"
}))]
pub struct LoginRequest {
    /// Login email
    pub email: String,
    /// Password
    pub password: String,
}

/// Successful sign-in response
///
/// Carries the JWT for subsequent requests. Pass it in the
/// `Authorization: Bearer <token>` header.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// JWT access token
    pub token: String,
    /// Token type (always `Bearer`)
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    /// Signed-in user
    pub user: UserInfo,
}

/// User information
#[derive(Debug, Serialize, ToSchema)]
pub struct UserInfo {
    /// Unique user identifier (UUID)
    pub id: String,
    /// Email
    pub email: String,
    /// Username
    pub username: String,
    /// Display name
    pub full_name: String,
    /// Role: `admin`, `encoder`, `viewer`
    pub role: String,
    /// Department, if recorded
    pub department: Option<String>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
            full_name: user.display_name(),
            role: user.role.as_str().to_string(),
            department: user.department.clone(),
        }
    }
}

/// Sign in
///
/// Verifies credentials against the auth collaborator and establishes a
/// session. A deactivated account fails with the same status as wrong
/// credentials but a distinct message. When the collaborator cannot be
/// reached the error is retryable (503) and no session is created.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in, returns JWT", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials or deactivated account"),
        (status = 503, description = "Authentication service unavailable, retry later")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let session = match state.sessions.sign_in(&request.email, &request.password).await {
        Ok(session) => session,
        Err(e @ AuthError::InvalidCredentials) | Err(e @ AuthError::InactiveAccount) => {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error(e.to_string())),
            ));
        }
        Err(e @ AuthError::ServiceUnavailable) => {
            return Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::error(e.to_string())),
            ));
        }
    };

    metrics::counter!("sign_ins_total").increment(1);

    // Last-login stamp and audit entry are best-effort
    if let Err(e) = state.repos.users().record_login(&session.user.id).await {
        warn!(error = %e, "Failed to record last login");
    }
    let audit = NewAuditEntry::new(&session.user.id, AuditAction::Login, "User")
        .entity_id(&session.user.id);
    if let Err(e) = state.repos.audit_logs().append(audit).await {
        warn!(error = %e, "Failed to record login audit entry");
    }

    let token = create_token(
        &session.user.id,
        &session.user.username,
        session.user.role,
        &session.id,
        &state.jwt_config,
    )
    .map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )
    })?;

    let response = LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_config.expiration_hours * 3600,
        user: UserInfo::from(&session.user),
    };

    Ok(Json(ApiResponse::success(response)))
}

/// Sign out
///
/// Clears the session unconditionally. A failed audit write is logged
/// and never blocks the sign-out.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Signed out"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Json<ApiResponse<()>> {
    let signed_out = state.sessions.sign_out(&current.session_id);

    if let Some(user) = signed_out {
        let audit = NewAuditEntry::new(&user.id, AuditAction::Logout, "User").entity_id(&user.id);
        if let Err(e) = state.repos.audit_logs().append(audit).await {
            warn!(error = %e, "Failed to record logout audit entry");
        }
    }

    Json(ApiResponse::success(()))
}

/// Current user
///
/// Returns the profile of the user the bearer token belongs to. Use it
/// to confirm authentication and read the role.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user profile", body = ApiResponse<UserInfo>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_current_user(
    Extension(current): Extension<CurrentUser>,
) -> Json<ApiResponse<UserInfo>> {
    Json(ApiResponse::success(UserInfo::from(&current.user)))
}

/// Change-password request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    /// Current password, for confirmation
    pub current_password: String,
    /// New password (minimum 8 characters)
    pub new_password: String,
}

/// Change the current user's password
///
/// Requires the current password for confirmation.
#[utoipa::path(
    post,
    path = "/api/v1/auth/change-password",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "New password too short"),
        (status = 401, description = "Wrong current password or not authenticated")
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    if request.new_password.len() < 8 {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(
                "New password must be at least 8 characters",
            )),
        ));
    }

    // Verify against the stored hash, not the session snapshot
    let db_user = state
        .repos
        .users()
        .find_by_id(&current.user.id)
        .await
        .map_err(super::domain_error_response)?;

    let Some(db_user) = db_user else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("User not found")),
        ));
    };

    let password_valid =
        verify_password(&request.current_password, &db_user.password_hash).unwrap_or(false);
    if !password_valid {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Invalid current password")),
        ));
    }

    let new_hash = hash_password(&request.new_password).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )
    })?;

    state
        .repos
        .users()
        .update_password(&db_user.id, &new_hash)
        .await
        .map_err(super::domain_error_response)?;

    Ok(Json(ApiResponse::success(())))
}
