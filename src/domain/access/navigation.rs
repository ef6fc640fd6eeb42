//! Navigation filter
//!
//! Derives the visible menu tree for a user from the same permission
//! evaluator the route guard uses, so what is shown always matches what
//! is reachable. Visibility only: hiding an entry never substitutes for
//! guarding its route.

use serde::Serialize;

use super::capability::has_any_role;
use super::role::Role;
use crate::domain::user::User;

/// One entry in the static navigation tree.
#[derive(Debug, Clone, Serialize)]
pub struct NavEntry {
    pub label: &'static str,
    pub path: &'static str,
    pub allowed_roles: Vec<Role>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavEntry>,
}

impl NavEntry {
    pub fn leaf(label: &'static str, path: &'static str, allowed_roles: impl Into<Vec<Role>>) -> Self {
        Self {
            label,
            path,
            allowed_roles: allowed_roles.into(),
            children: Vec::new(),
        }
    }

    pub fn group(
        label: &'static str,
        path: &'static str,
        allowed_roles: impl Into<Vec<Role>>,
        children: impl Into<Vec<NavEntry>>,
    ) -> Self {
        Self {
            label,
            path,
            allowed_roles: allowed_roles.into(),
            children: children.into(),
        }
    }
}

/// Stable, order-preserving filter of the navigation tree.
///
/// Children are filtered first; a parent stays when it is directly
/// allowed for the user's role or when at least one child survived.
pub fn visible_items(user: Option<&User>, entries: &[NavEntry]) -> Vec<NavEntry> {
    entries
        .iter()
        .filter_map(|entry| {
            let children = visible_items(user, &entry.children);
            let directly_allowed = has_any_role(user, &entry.allowed_roles);
            if directly_allowed || !children.is_empty() {
                Some(NavEntry {
                    label: entry.label,
                    path: entry.path,
                    allowed_roles: entry.allowed_roles.clone(),
                    children,
                })
            } else {
                None
            }
        })
        .collect()
}

/// The application menu tree.
pub fn navigation_tree() -> Vec<NavEntry> {
    use Role::{Admin, Encoder, Viewer};

    vec![
        NavEntry::leaf("Dashboard", "/dashboard", [Admin, Encoder, Viewer]),
        NavEntry::group(
            "Disbursements",
            "/disbursements",
            [Admin, Encoder],
            [
                NavEntry::leaf("All Entries", "/disbursements", [Admin, Encoder]),
                NavEntry::leaf("New Entry", "/disbursements/new", [Admin, Encoder]),
                NavEntry::leaf("Classify", "/disbursements/classify", [Admin, Encoder]),
            ],
        ),
        NavEntry::group(
            "Reports",
            "/reports",
            [Admin, Encoder, Viewer],
            [
                NavEntry::leaf("Summary", "/reports/summary", [Admin, Encoder, Viewer]),
                NavEntry::leaf("Export", "/reports/export", [Admin, Encoder, Viewer]),
            ],
        ),
        NavEntry::leaf("Archived", "/archived", [Admin, Encoder, Viewer]),
        NavEntry::group(
            "Administration",
            "/admin",
            [Admin],
            [
                NavEntry::leaf("Manage Users", "/admin/users", [Admin]),
                NavEntry::leaf("Classification Rules", "/admin/classifications", [Admin]),
                NavEntry::leaf("Active Sessions", "/admin/sessions", [Admin]),
                NavEntry::leaf("Audit Logs", "/admin/audit-logs", [Admin]),
            ],
        ),
    ]
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
    fn parent_visible_through_visible_child() {
        let tree = vec![NavEntry::group(
            "Admin Area",
            "/admin",
            [Role::Admin],
            [NavEntry::leaf("Shared Tool", "/admin/tool", [Role::Admin, Role::Encoder])],
        )];
        let encoder = sample_user(Role::Encoder);

        let visible = visible_items(Some(&encoder), &tree);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].label, "Admin Area");
        assert_eq!(visible[0].children.len(), 1);
        assert_eq!(visible[0].children[0].label, "Shared Tool");
    }

    #[test]
    fn disallowed_entries_are_dropped() {
        let viewer = sample_user(Role::Viewer);
        let visible = visible_items(Some(&viewer), &navigation_tree());
        assert!(visible.iter().all(|e| e.label != "Administration"));
        assert!(visible.iter().all(|e| e.label != "Disbursements"));
        assert!(visible.iter().any(|e| e.label == "Reports"));
    }

    #[test]
    fn no_user_sees_nothing() {
        assert!(visible_items(None, &navigation_tree()).is_empty());
    }

    #[test]
    fn order_is_preserved() {
        let admin = sample_user(Role::Admin);
        let visible = visible_items(Some(&admin), &navigation_tree());
        let labels: Vec<_> = visible.iter().map(|e| e.label).collect();
        assert_eq!(
            labels,
            vec!["Dashboard", "Disbursements", "Reports", "Archived", "Administration"]
        );
    }

    #[test]
    fn filter_is_idempotent() {
        let encoder = sample_user(Role::Encoder);
        let once = visible_items(Some(&encoder), &navigation_tree());
        let twice = visible_items(Some(&encoder), &once);
        let labels_once: Vec<_> = once.iter().map(|e| e.label).collect();
        let labels_twice: Vec<_> = twice.iter().map(|e| e.label).collect();
        assert_eq!(labels_once, labels_twice);
    }
}
