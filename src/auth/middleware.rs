//! Authentication middleware for Axum
//!
//! Authenticates bearer tokens against the session store and enforces
//! per-route requirements through the domain guard. An unauthenticated
//! request and an authenticated-but-unauthorized request produce
//! different outcomes (401 with a login redirect hint vs 403 with an
//! unauthorized redirect hint).

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::jwt::{verify_token, JwtConfig};
use crate::application::session::SharedSessionStore;
use crate::domain::access::{
    authorize, AccessDecision, Capability, RedirectTarget, Role, RouteRequirement,
};
use crate::domain::user::User;

/// Authentication state consulted by the middleware
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
    pub sessions: SharedSessionStore,
}

/// The authenticated principal, added to request extensions
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub session_id: String,
    pub user: User,
}

/// Extract token from Authorization header
fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

fn unauthenticated_response(message: &str) -> Response {
    let body = Json(json!({
        "success": false,
        "error": message,
        "redirect": RedirectTarget::Login.path(),
    }));
    (StatusCode::UNAUTHORIZED, body).into_response()
}

fn unauthorized_response() -> Response {
    let body = Json(json!({
        "success": false,
        "error": "Insufficient permissions",
        "redirect": RedirectTarget::Unauthorized.path(),
    }));
    (StatusCode::FORBIDDEN, body).into_response()
}

/// Bearer-token authentication middleware - requires an active session.
///
/// The session store is authoritative: sign-out and revocation take
/// effect on the very next request, regardless of the token's own
/// expiry. Inactive accounts are treated as unauthenticated.
pub async fn auth_middleware(
    State(auth): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(String::from);
    let Some(auth_header) = auth_header else {
        return unauthenticated_response("Missing authentication token");
    };

    let Some(token) = extract_token(&auth_header) else {
        return unauthenticated_response("Invalid authentication token");
    };

    match verify_token(token, &auth.jwt_config) {
        Ok(claims) => {
            if claims.is_expired() {
                return unauthenticated_response("Token has expired");
            }

            let Some(user) = auth.sessions.current_user(&claims.sid) else {
                return unauthenticated_response("Session is no longer active");
            };

            if !user.is_active {
                return unauthenticated_response("Account is deactivated");
            }

            request.extensions_mut().insert(CurrentUser {
                session_id: claims.sid,
                user,
            });
            next.run(request).await
        }
        Err(_) => unauthenticated_response("Invalid authentication token"),
    }
}

/// Evaluate a route requirement against the request's principal.
/// Runs fresh on every request; decisions are never cached.
async fn apply_guard(
    requirement: RouteRequirement,
    request: Request<Body>,
    next: Next,
) -> Response {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .map(|current| current.user.clone());

    match authorize(user.as_ref(), &requirement) {
        AccessDecision::Proceed => next.run(request).await,
        AccessDecision::Redirect(RedirectTarget::Login) => {
            unauthenticated_response("Not authenticated")
        }
        AccessDecision::Redirect(RedirectTarget::Unauthorized) => unauthorized_response(),
    }
}

/// Admin-only routes - must be layered after `auth_middleware`
pub async fn require_admin(request: Request<Body>, next: Next) -> Response {
    apply_guard(RouteRequirement::roles([Role::Admin]), request, next).await
}

/// Write access (admin or encoder) - must be layered after `auth_middleware`
pub async fn require_can_edit(request: Request<Body>, next: Next) -> Response {
    apply_guard(
        RouteRequirement::capabilities([Capability::CanEdit]),
        request,
        next,
    )
    .await
}

/// Read access (any role) - must be layered after `auth_middleware`
pub async fn require_can_view(request: Request<Body>, next: Next) -> Response {
    apply_guard(
        RouteRequirement::capabilities([Capability::CanView]),
        request,
        next,
    )
    .await
}

/// User management - must be layered after `auth_middleware`
pub async fn require_can_manage_users(request: Request<Body>, next: Next) -> Response {
    apply_guard(
        RouteRequirement::capabilities([Capability::CanManageUsers]),
        request,
        next,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_token_requires_bearer_scheme() {
        assert_eq!(extract_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_token("Basic dXNlcjpwdw=="), None);
        assert_eq!(extract_token(""), None);
    }
}
