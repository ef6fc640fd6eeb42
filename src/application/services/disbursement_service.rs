//! Disbursement service
//!
//! Orchestrates record mutations: validation, duplicate checks, encoder
//! attribution, and the audit trail. Audit writes never fail the
//! triggering operation.

use std::sync::Arc;

use tracing::warn;

use crate::domain::audit::{AuditAction, NewAuditEntry};
use crate::domain::classification::{suggest, ClassificationCandidate, Suggestion};
use crate::domain::disbursement::{
    summarize, Disbursement, DisbursementFilter, DisbursementSummary, DisbursementUpdate,
    NewDisbursement,
};
use crate::domain::user::User;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

/// Service for disbursement record operations
pub struct DisbursementService {
    repos: Arc<dyn RepositoryProvider>,
}

impl DisbursementService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Create a record, attributed to `actor`.
    pub async fn create(&self, record: NewDisbursement, actor: &User) -> DomainResult<Disbursement> {
        validate_new(&record)?;

        if self
            .repos
            .disbursements()
            .find_by_reference_number(&record.reference_number)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(format!(
                "Reference number already exists: {}",
                record.reference_number
            )));
        }

        let created = self.repos.disbursements().create(record, &actor.id).await?;
        metrics::counter!("disbursements_created_total").increment(1);

        self.record_audit(
            NewAuditEntry::new(&actor.id, AuditAction::Create, "Disbursement")
                .entity_id(&created.id)
                .detail(format!("reference {}", created.reference_number)),
        )
        .await;

        Ok(created)
    }

    /// Partially update a record, attributed to `actor`.
    pub async fn update(
        &self,
        id: &str,
        update: DisbursementUpdate,
        actor: &User,
    ) -> DomainResult<Disbursement> {
        if let Some(amount) = update.amount_centavos {
            if amount <= 0 {
                return Err(DomainError::Validation(
                    "Amount must be positive".to_string(),
                ));
            }
        }

        if let Some(reference) = &update.reference_number {
            if let Some(existing) = self
                .repos
                .disbursements()
                .find_by_reference_number(reference)
                .await?
            {
                if existing.id != id {
                    return Err(DomainError::Conflict(format!(
                        "Reference number already exists: {reference}"
                    )));
                }
            }
        }

        let updated = self
            .repos
            .disbursements()
            .update(id, update, &actor.id)
            .await?;

        self.record_audit(
            NewAuditEntry::new(&actor.id, AuditAction::Update, "Disbursement").entity_id(id),
        )
        .await;

        Ok(updated)
    }

    /// Archive or restore a record.
    pub async fn set_archived(&self, id: &str, archived: bool, actor: &User) -> DomainResult<()> {
        self.repos
            .disbursements()
            .set_archived(id, archived, &actor.id)
            .await?;

        let detail = if archived { "archived" } else { "restored" };
        self.record_audit(
            NewAuditEntry::new(&actor.id, AuditAction::Archive, "Disbursement")
                .entity_id(id)
                .detail(detail),
        )
        .await;

        Ok(())
    }

    /// Hard-delete a record.
    pub async fn delete(&self, id: &str, actor: &User) -> DomainResult<()> {
        self.repos.disbursements().delete(id).await?;

        self.record_audit(
            NewAuditEntry::new(&actor.id, AuditAction::Delete, "Disbursement").entity_id(id),
        )
        .await;

        Ok(())
    }

    pub async fn get(&self, id: &str) -> DomainResult<Option<Disbursement>> {
        self.repos.disbursements().find_by_id(id).await
    }

    pub async fn list(&self, filter: &DisbursementFilter) -> DomainResult<Vec<Disbursement>> {
        self.repos.disbursements().find_filtered(filter).await
    }

    /// Aggregate totals over the filtered record set.
    pub async fn summary(&self, filter: &DisbursementFilter) -> DomainResult<DisbursementSummary> {
        let records = self.repos.disbursements().find_filtered(filter).await?;
        Ok(summarize(&records))
    }

    /// Run the suggestion engine against the active rule set.
    pub async fn suggest_classification(
        &self,
        candidate: &ClassificationCandidate,
    ) -> DomainResult<Suggestion> {
        let rules = self.repos.classification_rules().find_active().await?;
        Ok(suggest(candidate, &rules))
    }

    /// Audit writes are best-effort: a failed write is logged, never
    /// surfaced to the caller.
    async fn record_audit(&self, entry: NewAuditEntry) {
        if let Err(e) = self.repos.audit_logs().append(entry).await {
            warn!(error = %e, "Failed to record audit entry");
        }
    }
}

fn validate_new(record: &NewDisbursement) -> DomainResult<()> {
    if record.payee.trim().is_empty() {
        return Err(DomainError::Validation("Payee is required".to_string()));
    }
    if record.amount_centavos <= 0 {
        return Err(DomainError::Validation(
            "Amount must be positive".to_string(),
        ));
    }
    if record.reference_number.trim().is_empty() {
        return Err(DomainError::Validation(
            "Reference number is required".to_string(),
        ));
    }
    if record.department.trim().is_empty() {
        return Err(DomainError::Validation(
            "Department is required".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::domain::disbursement::Classification;

    fn new_record() -> NewDisbursement {
        NewDisbursement {
            payee: "Office Supplies Inc.".into(),
            amount_centavos: 25_000_00,
            disbursement_date: NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
            fund_source: "General Fund".into(),
            classification: Classification::MOOE,
            description: "Office supplies".into(),
            reference_number: "DV-2024-0002".into(),
            department: "Finance".into(),
        }
    }

    #[test]
    fn validate_rejects_empty_payee() {
        let mut r = new_record();
        r.payee = "  ".into();
        assert!(matches!(validate_new(&r), Err(DomainError::Validation(_))));
    }

    #[test]
    fn validate_rejects_non_positive_amount() {
        let mut r = new_record();
        r.amount_centavos = 0;
        assert!(matches!(validate_new(&r), Err(DomainError::Validation(_))));
        r.amount_centavos = -5;
        assert!(matches!(validate_new(&r), Err(DomainError::Validation(_))));
    }

    #[test]
    fn validate_accepts_complete_record() {
        assert!(validate_new(&new_record()).is_ok());
    }
}
