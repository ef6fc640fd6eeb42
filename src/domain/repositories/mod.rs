//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider` — unified access to all per-aggregate repositories
//! - `DomainResult` — standard result type for domain operations

use super::audit::AuditLogRepository;
use super::classification::ClassificationRuleRepository;
use super::disbursement::DisbursementRepository;
use super::user::UserRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let user = repos.users().find_by_email("enc@agency.gov.ph").await?;
///     let records = repos.disbursements().find_filtered(&filter).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn disbursements(&self) -> &dyn DisbursementRepository;
    fn classification_rules(&self) -> &dyn ClassificationRuleRepository;
    fn audit_logs(&self) -> &dyn AuditLogRepository;
}
