//! User roles
//!
//! The flat three-value role model: a user is exactly one of
//! Admin, Encoder, or Viewer.

use serde::{Deserialize, Serialize};

/// Coarse-grained identity classification of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including user management
    Admin,
    /// Creates and edits disbursement records
    Encoder,
    /// Read-only access
    Viewer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Encoder => "encoder",
            Self::Viewer => "viewer",
        }
    }

    /// Parse a role name. Unknown names are rejected, not defaulted.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "encoder" => Some(Self::Encoder),
            "viewer" => Some(Self::Viewer),
            _ => None,
        }
    }

    /// Human-readable label for display surfaces
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Admin => "Administrator",
            Self::Encoder => "Data Encoder",
            Self::Viewer => "Viewer",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::Viewer
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_roles() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("encoder"), Some(Role::Encoder));
        assert_eq!(Role::parse("viewer"), Some(Role::Viewer));
    }

    #[test]
    fn parse_unknown_role_is_rejected() {
        assert_eq!(Role::parse("operator"), None);
        assert_eq!(Role::parse("ADMIN"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn display_round_trips_through_parse() {
        for role in [Role::Admin, Role::Encoder, Role::Viewer] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }
}
