//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::dto::*;
use crate::api::handlers::{
    audit_logs, auth, classifications, disbursements, health, navigation, reports, sessions,
    users, AppState,
};
use crate::application::services::{DisbursementService, ReportService};
use crate::application::session::SharedSessionStore;
use crate::auth::jwt::JwtConfig;
use crate::auth::middleware::{
    auth_middleware, require_admin, require_can_edit, require_can_manage_users, require_can_view,
    AuthState,
};
use crate::domain::RepositoryProvider;

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::logout,
        auth::get_current_user,
        auth::change_password,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        // Disbursements
        disbursements::list_disbursements,
        disbursements::get_disbursement,
        disbursements::create_disbursement,
        disbursements::update_disbursement,
        disbursements::archive_disbursement,
        disbursements::restore_disbursement,
        disbursements::delete_disbursement,
        disbursements::get_disbursement_stats,
        // Classifications
        classifications::list_rules,
        classifications::create_rule,
        classifications::update_rule,
        classifications::delete_rule,
        classifications::suggest_classification,
        // Reports
        reports::summary_report,
        reports::export_report,
        // Audit
        audit_logs::list_audit_logs,
        // Sessions
        sessions::list_sessions,
        sessions::revoke_session,
        // Navigation
        navigation::get_navigation,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            PaginatedResponse<disbursements::DisbursementDto>,
            PaginatedResponse<audit_logs::AuditEntryDto>,
            PaginationParams,
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            auth::ChangePasswordRequest,
            // Users
            users::UserDto,
            users::CreateUserRequest,
            users::UpdateUserRequest,
            // Disbursements
            disbursements::DisbursementDto,
            disbursements::CreateDisbursementRequest,
            disbursements::UpdateDisbursementRequest,
            disbursements::DisbursementSummaryDto,
            // Classifications
            classifications::ClassificationRuleDto,
            classifications::CreateRuleRequest,
            classifications::UpdateRuleRequest,
            classifications::SuggestRequest,
            classifications::SuggestionDto,
            // Audit
            audit_logs::AuditEntryDto,
            // Sessions
            sessions::SessionDto,
            // Navigation
            navigation::NavEntryDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health check. Use for availability monitoring (uptime, ping, readiness)."),
        (name = "Authentication", description = "User authentication: sign-in (JWT), sign-out, password change. The token is returned in the `token` field and passed in the `Authorization: Bearer <token>` header."),
        (name = "Users", description = "User account management. Admin only. Roles: `admin` (full access), `encoder` (creates and edits records), `viewer` (read only). Deactivation is the normal removal path."),
        (name = "Disbursements", description = "CRUD for disbursement records. Reads require any role, writes require `admin` or `encoder`, deletion requires `admin`. Amounts are integer centavos. Reference numbers are unique."),
        (name = "Classifications", description = "Classification rules and the suggestion engine. Rules are admin-managed; suggestions score keywords (+20 each), amount bounds (+10 each) and department (+15), defaulting to `MOOE` at confidence 30, capped at 95."),
        (name = "Reports", description = "Summary reports grouped by classification, department and fund source, plus CSV export. Exports are recorded in the audit trail."),
        (name = "Audit", description = "Append-only audit trail of sign-ins, sign-outs, mutations and exports. Admin only."),
        (name = "Sessions", description = "Active session management. Admin only. Revoking a session signs that user out on their next request."),
        (name = "Navigation", description = "Menu tree filtered to the current user's role. Display only; the route guards remain the enforcement point."),
    ),
    info(
        title = "Fund Disbursement Tracking API",
        version = "1.0.0",
        description = "REST API for role-based tracking of government fund disbursements.

## Roles

- **admin**: full access, including user management, archival, deletion, audit logs and sessions
- **encoder**: creates, edits and classifies disbursement records
- **viewer**: read-only access to records and reports

## Authentication

Obtain a token via `POST /api/v1/auth/login` and pass it in the
`Authorization: Bearer <token>` header. An unauthenticated request gets
`401` with `\"redirect\": \"/auth/login\"`; an authenticated request that
lacks the required role gets `403` with `\"redirect\": \"/unauthorized\"`.

## Response format

All REST responses are wrapped in a standard envelope:
```json
{\"success\": true, \"data\": {...}, \"error\": null}
```

On failure:
```json
{\"success\": false, \"data\": null, \"error\": \"description\"}
```

## Pagination

List endpoints accept `page` (from 1) and `limit` (default 50).",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    repos: Arc<dyn RepositoryProvider>,
    sessions_store: SharedSessionStore,
    disbursement_service: Arc<DisbursementService>,
    report_service: Arc<ReportService>,
    jwt_config: JwtConfig,
    prometheus_handle: PrometheusHandle,
) -> Router {
    let auth_state = AuthState {
        jwt_config: jwt_config.clone(),
        sessions: sessions_store.clone(),
    };

    let app_state = AppState {
        repos,
        sessions: sessions_store,
        disbursements: disbursement_service,
        reports: report_service,
        jwt_config,
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .with_state(app_state.clone());

    // Auth routes (protected)
    let auth_protected_routes = Router::new()
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::get_current_user))
        .route("/change-password", post(auth::change_password))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(app_state.clone());

    // Disbursement routes, grouped by required capability
    let disbursement_read_routes = Router::new()
        .route("/", get(disbursements::list_disbursements))
        .route("/stats", get(disbursements::get_disbursement_stats))
        .route("/{id}", get(disbursements::get_disbursement))
        .layer(middleware::from_fn(require_can_view));

    let disbursement_write_routes = Router::new()
        .route("/", post(disbursements::create_disbursement))
        .route("/{id}", put(disbursements::update_disbursement))
        .route("/{id}/archive", post(disbursements::archive_disbursement))
        .route("/{id}/restore", post(disbursements::restore_disbursement))
        .layer(middleware::from_fn(require_can_edit));

    let disbursement_admin_routes = Router::new()
        .route("/{id}", delete(disbursements::delete_disbursement))
        .layer(middleware::from_fn(require_admin));

    let disbursement_routes = Router::new()
        .merge(disbursement_read_routes)
        .merge(disbursement_write_routes)
        .merge(disbursement_admin_routes)
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(app_state.clone());

    // Classification rules (admin) + suggestion (encoders)
    let classification_rule_routes = Router::new()
        .route(
            "/rules",
            get(classifications::list_rules).post(classifications::create_rule),
        )
        .route(
            "/rules/{id}",
            put(classifications::update_rule).delete(classifications::delete_rule),
        )
        .layer(middleware::from_fn(require_admin));

    let classification_suggest_routes = Router::new()
        .route("/suggest", post(classifications::suggest_classification))
        .layer(middleware::from_fn(require_can_edit));

    let classification_routes = Router::new()
        .merge(classification_rule_routes)
        .merge(classification_suggest_routes)
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(app_state.clone());

    // Reports (any role)
    let report_routes = Router::new()
        .route("/summary", get(reports::summary_report))
        .route("/export", get(reports::export_report))
        .layer(middleware::from_fn(require_can_view))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(app_state.clone());

    // User management (admin via canManageUsers)
    let user_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .layer(middleware::from_fn(require_can_manage_users))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(app_state.clone());

    // Audit logs (admin)
    let audit_routes = Router::new()
        .route("/", get(audit_logs::list_audit_logs))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(app_state.clone());

    // Active sessions (admin)
    let session_routes = Router::new()
        .route("/", get(sessions::list_sessions))
        .route("/{id}", delete(sessions::revoke_session))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(app_state.clone());

    // Navigation (any authenticated user)
    let navigation_routes = Router::new()
        .route("/", get(navigation::get_navigation))
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(app_state);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // Build router
    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health
        .route("/health", get(health::health_check))
        // Prometheus metrics
        .route(
            "/metrics",
            get(move || {
                let handle = prometheus_handle.clone();
                async move { handle.render() }
            }),
        )
        // Auth
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/auth", auth_protected_routes)
        // Disbursements
        .nest("/api/v1/disbursements", disbursement_routes)
        // Classifications
        .nest("/api/v1/classifications", classification_routes)
        // Reports
        .nest("/api/v1/reports", report_routes)
        // Users
        .nest("/api/v1/users", user_routes)
        // Audit logs
        .nest("/api/v1/audit-logs", audit_routes)
        // Sessions
        .nest("/api/v1/sessions", session_routes)
        // Navigation
        .nest("/api/v1/navigation", navigation_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
