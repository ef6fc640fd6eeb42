//! Audit log repository interface

use async_trait::async_trait;

use super::model::{AuditEntry, AuditFilter, NewAuditEntry};
use crate::domain::DomainResult;

#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    async fn append(&self, entry: NewAuditEntry) -> DomainResult<()>;
    /// Filtered listing, newest first.
    async fn find_filtered(&self, filter: &AuditFilter) -> DomainResult<Vec<AuditEntry>>;
}
