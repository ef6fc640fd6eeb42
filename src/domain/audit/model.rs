//! Audit trail entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Action recorded in the audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Login,
    Logout,
    Create,
    Update,
    Delete,
    Archive,
    Export,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "LOGIN",
            Self::Logout => "LOGOUT",
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Archive => "ARCHIVE",
            Self::Export => "EXPORT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "LOGIN" => Some(Self::Login),
            "LOGOUT" => Some(Self::Logout),
            "CREATE" => Some(Self::Create),
            "UPDATE" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            "ARCHIVE" => Some(Self::Archive),
            "EXPORT" => Some(Self::Export),
            _ => None,
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One audit trail record. Append-only.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: String,
    pub user_id: String,
    pub action: AuditAction,
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub detail: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Fields for appending an audit record
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub user_id: String,
    pub action: AuditAction,
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub detail: Option<String>,
}

impl NewAuditEntry {
    pub fn new(user_id: impl Into<String>, action: AuditAction, entity_type: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            action,
            entity_type: entity_type.into(),
            entity_id: None,
            detail: None,
        }
    }

    pub fn entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Filter for audit queries
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub user_id: Option<String>,
    pub action: Option<AuditAction>,
    pub entity_type: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}
