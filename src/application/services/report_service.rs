//! Report generation over disbursement records

use std::sync::Arc;

use tracing::warn;

use crate::domain::audit::{AuditAction, NewAuditEntry};
use crate::domain::disbursement::{
    summarize, Disbursement, DisbursementFilter, DisbursementSummary,
};
use crate::domain::user::User;
use crate::domain::{DomainResult, RepositoryProvider};

/// Service for summary reports and exports
pub struct ReportService {
    repos: Arc<dyn RepositoryProvider>,
}

impl ReportService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Aggregate totals over the filtered record set.
    pub async fn summary(&self, filter: &DisbursementFilter) -> DomainResult<DisbursementSummary> {
        let records = self.repos.disbursements().find_filtered(filter).await?;
        Ok(summarize(&records))
    }

    /// Export the filtered record set as CSV. The export is recorded in
    /// the audit trail; a failed audit write is logged, never surfaced.
    pub async fn export_csv(
        &self,
        filter: &DisbursementFilter,
        actor: &User,
    ) -> DomainResult<String> {
        let records = self.repos.disbursements().find_filtered(filter).await?;
        let csv = render_csv(&records);

        let entry = NewAuditEntry::new(&actor.id, AuditAction::Export, "Disbursement")
            .detail(format!("{} records exported", records.len()));
        if let Err(e) = self.repos.audit_logs().append(entry).await {
            warn!(error = %e, "Failed to record export audit entry");
        }

        Ok(csv)
    }
}

const CSV_HEADER: &str = "reference_number,disbursement_date,payee,amount,classification,fund_source,department,description,encoded_by,is_archived";

/// Render records as CSV, one line per record. Pure.
pub fn render_csv(records: &[Disbursement]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');

    for r in records {
        let fields = [
            r.reference_number.clone(),
            r.disbursement_date.to_string(),
            r.payee.clone(),
            format_csv_amount(r.amount_centavos),
            r.classification.to_string(),
            r.fund_source.clone(),
            r.department.clone(),
            r.description.clone(),
            r.encoded_by.clone(),
            r.is_archived.to_string(),
        ];
        let line: Vec<String> = fields.iter().map(|f| escape_csv_field(f)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }

    out
}

fn format_csv_amount(centavos: i64) -> String {
    format!("{}.{:02}", centavos / 100, (centavos % 100).abs())
}

/// Quote a field when it contains a comma, quote, or newline.
fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    use crate::domain::disbursement::Classification;

    fn sample(payee: &str, reference: &str) -> Disbursement {
        Disbursement {
            id: uuid::Uuid::new_v4().to_string(),
            payee: payee.into(),
            amount_centavos: 45_000_00,
            disbursement_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            fund_source: "Payroll Fund".into(),
            classification: Classification::PS,
            description: "Monthly salary".into(),
            reference_number: reference.into(),
            department: "Human Resources".into(),
            encoded_by: "encoder-1".into(),
            encoded_at: Utc::now(),
            updated_by: None,
            updated_at: None,
            is_archived: false,
        }
    }

    #[test]
    fn csv_has_header_and_one_line_per_record() {
        let csv = render_csv(&[sample("John Doe", "DV-0001"), sample("Jane Roe", "DV-0002")]);
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("reference_number,"));
        assert!(lines[1].starts_with("DV-0001,2024-01-15,John Doe,45000.00,PS,"));
    }

    #[test]
    fn csv_escapes_commas_and_quotes() {
        let csv = render_csv(&[sample("Acme, Inc. \"Main\"", "DV-0003")]);
        assert!(csv.contains("\"Acme, Inc. \"\"Main\"\"\""));
    }

    #[test]
    fn csv_of_empty_set_is_header_only() {
        let csv = render_csv(&[]);
        assert_eq!(csv.lines().count(), 1);
    }
}
