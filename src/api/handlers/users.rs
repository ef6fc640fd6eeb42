//! User management handlers (admin only)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::ApiResponse;
use crate::api::handlers::{domain_error_response, AppState};
use crate::auth::hash_password;
use crate::auth::middleware::CurrentUser;
use crate::domain::access::Role;
use crate::domain::audit::{AuditAction, NewAuditEntry};
use crate::domain::user::{NewUser, User, UserUpdate};

/// User account details
#[derive(Debug, Serialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Role: `admin`, `encoder`, `viewer`
    pub role: String,
    pub department: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            username: u.username,
            first_name: u.first_name,
            last_name: u.last_name,
            role: u.role.as_str().to_string(),
            department: u.department,
            is_active: u.is_active,
            created_at: u.created_at,
            last_login_at: u.last_login_at,
        }
    }
}

/// Create-user request
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[schema(example = json!({
    "email": "encoder@agency.gov.ph",
    "username": "encoder1",
    "first_name": "Juan",
    "last_name": "dela Cruz",
    "role": "encoder",
    "department": "Finance",
    "password": "secure_password_123"
}))]
pub struct CreateUserRequest {
    /// Login email (unique)
    #[validate(email)]
    pub email: String,
    /// Username (3-50 characters, unique)
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    /// Role: `admin`, `encoder`, `viewer`
    pub role: String,
    pub department: Option<String>,
    /// Password (minimum 8 characters)
    #[validate(length(min = 8))]
    pub password: String,
}

/// Update-user request (partial)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// New role: `admin`, `encoder`, `viewer`
    pub role: Option<String>,
    pub department: Option<String>,
    /// Deactivation is the normal removal path
    pub is_active: Option<bool>,
}

/// List users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All user accounts", body = ApiResponse<Vec<UserDto>>),
        (status = 403, description = "Requires user management permission")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, (StatusCode, Json<ApiResponse<()>>)> {
    let users = state
        .repos
        .users()
        .find_all()
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(
        users.into_iter().map(Into::into).collect(),
    )))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserDto>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let user = state
        .repos
        .users()
        .find_by_id(&id)
        .await
        .map_err(domain_error_response)?;

    match user {
        Some(user) => Ok(Json(ApiResponse::success(user.into()))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("User not found")),
        )),
    }
}

/// Create a user account
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserDto>),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email or username already exists")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), (StatusCode, Json<ApiResponse<()>>)> {
    request.validate().map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(e.to_string())),
        )
    })?;

    let Some(role) = Role::parse(&request.role) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!("Unknown role: {}", request.role))),
        ));
    };

    let email_taken = state
        .repos
        .users()
        .find_by_email(&request.email)
        .await
        .map_err(domain_error_response)?
        .is_some();
    let username_taken = state
        .repos
        .users()
        .find_by_username(&request.username)
        .await
        .map_err(domain_error_response)?
        .is_some();
    if email_taken || username_taken {
        return Err((
            StatusCode::CONFLICT,
            Json(ApiResponse::error("Email or username already exists")),
        ));
    }

    let password_hash = hash_password(&request.password).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )
    })?;

    let created = state
        .repos
        .users()
        .create(NewUser {
            email: request.email,
            username: request.username,
            first_name: request.first_name,
            last_name: request.last_name,
            password_hash,
            role,
            department: request.department,
        })
        .await
        .map_err(domain_error_response)?;

    let audit = NewAuditEntry::new(&current.user.id, AuditAction::Create, "User")
        .entity_id(&created.id);
    if let Err(e) = state.repos.audit_logs().append(audit).await {
        warn!(error = %e, "Failed to record user creation audit entry");
    }

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(created.into())),
    ))
}

/// Update a user account
///
/// Role changes and deactivation take effect on the user's next request;
/// active sessions can be revoked through the sessions endpoint.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserDto>),
        (status = 400, description = "Unknown role"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let role = match &request.role {
        Some(name) => match Role::parse(name) {
            Some(role) => Some(role),
            None => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::error(format!("Unknown role: {}", name))),
                ));
            }
        },
        None => None,
    };

    let updated = state
        .repos
        .users()
        .update(
            &id,
            UserUpdate {
                first_name: request.first_name,
                last_name: request.last_name,
                role,
                department: request.department.map(Some),
                is_active: request.is_active,
            },
        )
        .await
        .map_err(domain_error_response)?;

    let audit =
        NewAuditEntry::new(&current.user.id, AuditAction::Update, "User").entity_id(&updated.id);
    if let Err(e) = state.repos.audit_logs().append(audit).await {
        warn!(error = %e, "Failed to record user update audit entry");
    }

    Ok(Json(ApiResponse::success(updated.into())))
}

/// Delete a user account
///
/// Hard delete; prefer deactivation (`is_active = false`) for accounts
/// with history, since audit entries keep referencing the user id.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 400, description = "Cannot delete own account"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    if current.user.id == id {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Cannot delete own account")),
        ));
    }

    state
        .repos
        .users()
        .delete(&id)
        .await
        .map_err(domain_error_response)?;

    let audit = NewAuditEntry::new(&current.user.id, AuditAction::Delete, "User").entity_id(&id);
    if let Err(e) = state.repos.audit_logs().append(audit).await {
        warn!(error = %e, "Failed to record user deletion audit entry");
    }

    Ok(Json(ApiResponse::success(())))
}
