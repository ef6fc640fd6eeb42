//! Permission evaluator
//!
//! Pure mapping from a user (or absence of one) to capability booleans.
//! Every predicate is computed fresh on each call from the user value it
//! is handed; nothing here caches, performs I/O, or mutates state.

use serde::{Deserialize, Serialize};

use super::role::Role;
use crate::domain::user::User;

/// True iff a user is present and holds exactly `role`.
pub fn has_role(user: Option<&User>, role: Role) -> bool {
    matches!(user, Some(u) if u.role == role)
}

/// True iff a user is present and holds any of `roles`.
pub fn has_any_role(user: Option<&User>, roles: &[Role]) -> bool {
    matches!(user, Some(u) if roles.contains(&u.role))
}

pub fn is_admin(user: Option<&User>) -> bool {
    has_role(user, Role::Admin)
}

pub fn is_encoder(user: Option<&User>) -> bool {
    has_role(user, Role::Encoder)
}

pub fn is_viewer(user: Option<&User>) -> bool {
    has_role(user, Role::Viewer)
}

pub fn can_edit(user: Option<&User>) -> bool {
    has_any_role(user, &[Role::Admin, Role::Encoder])
}

pub fn can_view(user: Option<&User>) -> bool {
    has_any_role(user, &[Role::Admin, Role::Encoder, Role::Viewer])
}

pub fn can_manage_users(user: Option<&User>) -> bool {
    is_admin(user)
}

/// Named capability, as declared on routes and navigation entries.
///
/// A closed enumeration: route configuration written in code cannot name a
/// capability that does not exist. Free-form names only enter through
/// [`Capability::parse`], where unknown names deny rather than panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    CanEdit,
    CanView,
    CanManageUsers,
    IsAdmin,
    IsEncoder,
    IsViewer,
}

impl Capability {
    /// Parse a capability name from route configuration.
    /// Unknown names yield `None`; callers must treat that as denied.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "canEdit" => Some(Self::CanEdit),
            "canView" => Some(Self::CanView),
            "canManageUsers" => Some(Self::CanManageUsers),
            "isAdmin" => Some(Self::IsAdmin),
            "isEncoder" => Some(Self::IsEncoder),
            "isViewer" => Some(Self::IsViewer),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CanEdit => "canEdit",
            Self::CanView => "canView",
            Self::CanManageUsers => "canManageUsers",
            Self::IsAdmin => "isAdmin",
            Self::IsEncoder => "isEncoder",
            Self::IsViewer => "isViewer",
        }
    }

    /// Evaluate this capability against a user.
    pub fn granted(&self, user: Option<&User>) -> bool {
        match self {
            Self::CanEdit => can_edit(user),
            Self::CanView => can_view(user),
            Self::CanManageUsers => can_manage_users(user),
            Self::IsAdmin => is_admin(user),
            Self::IsEncoder => is_encoder(user),
            Self::IsViewer => is_viewer(user),
        }
    }
}

/// Evaluate a capability by its configuration name.
///
/// Unknown names evaluate to `false` so that a typo in route
/// configuration fails safe instead of crashing navigation.
pub fn capability_granted_by_name(user: Option<&User>, name: &str) -> bool {
    Capability::parse(name).is_some_and(|cap| cap.granted(user))
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::User;
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
    fn admin_has_full_capabilities() {
        let admin = sample_user(Role::Admin);
        assert!(can_edit(Some(&admin)));
        assert!(can_view(Some(&admin)));
        assert!(can_manage_users(Some(&admin)));
        assert!(is_admin(Some(&admin)));
        assert!(!is_encoder(Some(&admin)));
        assert!(!is_viewer(Some(&admin)));
    }

    #[test]
    fn encoder_can_edit_but_not_manage_users() {
        let encoder = sample_user(Role::Encoder);
        assert!(can_edit(Some(&encoder)));
        assert!(can_view(Some(&encoder)));
        assert!(!can_manage_users(Some(&encoder)));
    }

    #[test]
    fn viewer_is_read_only() {
        let viewer = sample_user(Role::Viewer);
        assert!(!can_edit(Some(&viewer)));
        assert!(can_view(Some(&viewer)));
        assert!(!can_manage_users(Some(&viewer)));
    }

    #[test]
    fn absent_user_denies_every_capability() {
        assert!(!has_role(None, Role::Admin));
        assert!(!has_any_role(None, &[Role::Admin, Role::Encoder, Role::Viewer]));
        assert!(!can_edit(None));
        assert!(!can_view(None));
        assert!(!can_manage_users(None));
        assert!(!is_admin(None));
        assert!(!is_encoder(None));
        assert!(!is_viewer(None));
    }

    #[test]
    fn predicates_are_idempotent() {
        let encoder = sample_user(Role::Encoder);
        for _ in 0..2 {
            assert!(can_edit(Some(&encoder)));
            assert!(!can_manage_users(Some(&encoder)));
        }
    }

    #[test]
    fn capability_enum_dispatches_to_predicates() {
        let admin = sample_user(Role::Admin);
        assert!(Capability::CanManageUsers.granted(Some(&admin)));
        assert!(Capability::IsAdmin.granted(Some(&admin)));
        assert!(!Capability::IsViewer.granted(Some(&admin)));
        assert!(!Capability::CanEdit.granted(None));
    }

    #[test]
    fn parse_known_capability_names() {
        assert_eq!(Capability::parse("canEdit"), Some(Capability::CanEdit));
        assert_eq!(
            Capability::parse("canManageUsers"),
            Some(Capability::CanManageUsers)
        );
    }

    #[test]
    fn unknown_capability_name_denies() {
        let admin = sample_user(Role::Admin);
        assert_eq!(Capability::parse("canDoAnything"), None);
        assert!(!capability_granted_by_name(Some(&admin), "canDoAnything"));
        assert!(capability_granted_by_name(Some(&admin), "canManageUsers"));
    }
}
