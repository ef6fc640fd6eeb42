//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::audit::AuditLogRepository;
use crate::domain::classification::ClassificationRuleRepository;
use crate::domain::disbursement::DisbursementRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::user::UserRepository;

use super::audit_log_repository::SeaOrmAuditLogRepository;
use super::classification_rule_repository::SeaOrmClassificationRuleRepository;
use super::disbursement_repository::SeaOrmDisbursementRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let user = repos.users().find_by_email("enc@agency.gov.ph").await?;
/// let records = repos.disbursements().find_filtered(&filter).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    disbursements: SeaOrmDisbursementRepository,
    classification_rules: SeaOrmClassificationRuleRepository,
    audit_logs: SeaOrmAuditLogRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            disbursements: SeaOrmDisbursementRepository::new(db.clone()),
            classification_rules: SeaOrmClassificationRuleRepository::new(db.clone()),
            audit_logs: SeaOrmAuditLogRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn disbursements(&self) -> &dyn DisbursementRepository {
        &self.disbursements
    }

    fn classification_rules(&self) -> &dyn ClassificationRuleRepository {
        &self.classification_rules
    }

    fn audit_logs(&self) -> &dyn AuditLogRepository {
        &self.audit_logs
    }
}
