//! Route authorization guard
//!
//! Decides, per navigation attempt, whether to proceed and if not where
//! to redirect. Pure decision logic; HTTP enforcement lives in the auth
//! middleware.

use super::capability::{has_any_role, Capability};
use super::role::Role;
use crate::domain::user::User;

/// Where a denied navigation is sent.
///
/// An unauthenticated attempt and an authenticated-but-unauthorized
/// attempt are different user-facing outcomes and must never share a
/// destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectTarget {
    Login,
    Unauthorized,
}

impl RedirectTarget {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/auth/login",
            Self::Unauthorized => "/unauthorized",
        }
    }
}

/// Outcome of a guard evaluation. Never an error: a guard decision
/// always resolves to proceed-or-redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Proceed,
    Redirect(RedirectTarget),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Proceed)
    }
}

/// Declared requirement of a route. A route may require roles,
/// capabilities, or both; when both are declared both must pass.
#[derive(Debug, Clone, Default)]
pub struct RouteRequirement {
    pub roles: Vec<Role>,
    pub capabilities: Vec<Capability>,
}

impl RouteRequirement {
    /// Requires only that a user is signed in.
    pub fn authenticated() -> Self {
        Self::default()
    }

    pub fn roles(roles: impl Into<Vec<Role>>) -> Self {
        Self {
            roles: roles.into(),
            capabilities: Vec::new(),
        }
    }

    pub fn capabilities(capabilities: impl Into<Vec<Capability>>) -> Self {
        Self {
            roles: Vec::new(),
            capabilities: capabilities.into(),
        }
    }

    pub fn with_capabilities(mut self, capabilities: impl Into<Vec<Capability>>) -> Self {
        self.capabilities = capabilities.into();
        self
    }
}

/// Evaluate a navigation attempt.
///
/// Runs fresh on every attempt; a prior decision is never reused across
/// target routes.
pub fn authorize(user: Option<&User>, requirement: &RouteRequirement) -> AccessDecision {
    let Some(user) = user else {
        return AccessDecision::Redirect(RedirectTarget::Login);
    };

    if !requirement.roles.is_empty() && !has_any_role(Some(user), &requirement.roles) {
        return AccessDecision::Redirect(RedirectTarget::Unauthorized);
    }

    if !requirement
        .capabilities
        .iter()
        .all(|cap| cap.granted(Some(user)))
    {
        return AccessDecision::Redirect(RedirectTarget::Unauthorized);
    }

    AccessDecision::Proceed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_user(role: Role) -> User {
        User {
            id: "user-1".into(),
            email: "user@agency.gov.ph".into(),
            username: "user1".into(),
            first_name: "Test".into(),
            last_name: "User".into(),
            password_hash: String::new(),
            role,
            department: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_login_at: None,
        }
    }

    #[test]
    fn unauthenticated_redirects_to_login() {
        let req = RouteRequirement::roles([Role::Admin]);
        assert_eq!(
            authorize(None, &req),
            AccessDecision::Redirect(RedirectTarget::Login)
        );
    }

    #[test]
    fn wrong_role_redirects_to_unauthorized() {
        let encoder = sample_user(Role::Encoder);
        let req = RouteRequirement::roles([Role::Admin]);
        assert_eq!(
            authorize(Some(&encoder), &req),
            AccessDecision::Redirect(RedirectTarget::Unauthorized)
        );
    }

    #[test]
    fn admin_passes_capability_requirement() {
        let admin = sample_user(Role::Admin);
        let req = RouteRequirement::capabilities([Capability::CanManageUsers]);
        assert_eq!(authorize(Some(&admin), &req), AccessDecision::Proceed);
    }

    #[test]
    fn encoder_fails_viewer_capability() {
        let encoder = sample_user(Role::Encoder);
        let req = RouteRequirement::capabilities([Capability::IsViewer]);
        assert_eq!(
            authorize(Some(&encoder), &req),
            AccessDecision::Redirect(RedirectTarget::Unauthorized)
        );
    }

    #[test]
    fn empty_requirement_admits_any_authenticated_user() {
        let viewer = sample_user(Role::Viewer);
        assert_eq!(
            authorize(Some(&viewer), &RouteRequirement::authenticated()),
            AccessDecision::Proceed
        );
        assert_eq!(
            authorize(None, &RouteRequirement::authenticated()),
            AccessDecision::Redirect(RedirectTarget::Login)
        );
    }

    #[test]
    fn both_roles_and_capabilities_must_pass() {
        let encoder = sample_user(Role::Encoder);
        let req = RouteRequirement::roles([Role::Admin, Role::Encoder])
            .with_capabilities([Capability::CanManageUsers]);
        assert_eq!(
            authorize(Some(&encoder), &req),
            AccessDecision::Redirect(RedirectTarget::Unauthorized)
        );

        let admin = sample_user(Role::Admin);
        assert_eq!(authorize(Some(&admin), &req), AccessDecision::Proceed);
    }

    #[test]
    fn redirect_targets_are_distinct() {
        assert_ne!(RedirectTarget::Login.path(), RedirectTarget::Unauthorized.path());
    }

    #[test]
    fn decision_is_recomputed_per_call() {
        let admin = sample_user(Role::Admin);
        let admin_only = RouteRequirement::roles([Role::Admin]);
        assert!(authorize(Some(&admin), &admin_only).is_allowed());
        // Same requirement, different principal: decision must not leak.
        let viewer = sample_user(Role::Viewer);
        assert!(!authorize(Some(&viewer), &admin_only).is_allowed());
    }
}
