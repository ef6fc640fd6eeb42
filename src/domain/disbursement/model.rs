//! Disbursement domain entity

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Expense classification per the national budget circular
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Classification {
    /// Personnel Services
    PS,
    /// Maintenance and Other Operating Expenses
    MOOE,
    /// Capital Outlay
    CO,
    /// Trust Receipts
    TR,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PS => "PS",
            Self::MOOE => "MOOE",
            Self::CO => "CO",
            Self::TR => "TR",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PS" => Some(Self::PS),
            "MOOE" => Some(Self::MOOE),
            "CO" => Some(Self::CO),
            "TR" => Some(Self::TR),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::PS => "Personnel Services",
            Self::MOOE => "Maintenance and Other Operating Expenses",
            Self::CO => "Capital Outlay",
            Self::TR => "Trust Receipts",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Disbursement record
///
/// Amounts are stored in centavos (smallest currency unit) to keep
/// aggregation exact.
#[derive(Debug, Clone)]
pub struct Disbursement {
    pub id: String,
    pub payee: String,
    pub amount_centavos: i64,
    pub disbursement_date: NaiveDate,
    pub fund_source: String,
    pub classification: Classification,
    pub description: String,
    pub reference_number: String,
    pub department: String,
    pub encoded_by: String,
    pub encoded_at: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub is_archived: bool,
}

impl Disbursement {
    /// Format an amount in centavos as a display string
    pub fn format_amount(centavos: i64) -> String {
        let major = centavos / 100;
        let minor = (centavos % 100).abs();
        format!("{}.{:02} PHP", major, minor)
    }
}

/// Fields required to create a disbursement
#[derive(Debug, Clone)]
pub struct NewDisbursement {
    pub payee: String,
    pub amount_centavos: i64,
    pub disbursement_date: NaiveDate,
    pub fund_source: String,
    pub classification: Classification,
    pub description: String,
    pub reference_number: String,
    pub department: String,
}

/// Partial update of a disbursement
#[derive(Debug, Clone, Default)]
pub struct DisbursementUpdate {
    pub payee: Option<String>,
    pub amount_centavos: Option<i64>,
    pub disbursement_date: Option<NaiveDate>,
    pub fund_source: Option<String>,
    pub classification: Option<Classification>,
    pub description: Option<String>,
    pub reference_number: Option<String>,
    pub department: Option<String>,
}

/// Filter for list and report queries. All fields are conjunctive.
#[derive(Debug, Clone, Default)]
pub struct DisbursementFilter {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub department: Option<String>,
    pub classification: Option<Classification>,
    pub fund_source: Option<String>,
    /// Case-insensitive substring match on the payee
    pub payee: Option<String>,
    pub min_amount_centavos: Option<i64>,
    pub max_amount_centavos: Option<i64>,
    pub encoded_by: Option<String>,
    /// None = active records only, Some(true) = archived only,
    /// Some(false) = active only
    pub include_archived: Option<bool>,
}

/// Aggregated totals over a set of disbursements
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisbursementSummary {
    pub total_amount_centavos: i64,
    pub total_count: u64,
    pub by_classification: BTreeMap<Classification, i64>,
    pub by_department: BTreeMap<String, i64>,
    pub by_fund_source: BTreeMap<String, i64>,
}

/// Aggregate totals over a slice of records. Pure.
pub fn summarize(records: &[Disbursement]) -> DisbursementSummary {
    let mut summary = DisbursementSummary {
        total_amount_centavos: 0,
        total_count: records.len() as u64,
        by_classification: BTreeMap::new(),
        by_department: BTreeMap::new(),
        by_fund_source: BTreeMap::new(),
    };

    for record in records {
        summary.total_amount_centavos += record.amount_centavos;
        *summary
            .by_classification
            .entry(record.classification)
            .or_insert(0) += record.amount_centavos;
        *summary
            .by_department
            .entry(record.department.clone())
            .or_insert(0) += record.amount_centavos;
        *summary
            .by_fund_source
            .entry(record.fund_source.clone())
            .or_insert(0) += record.amount_centavos;
    }

    summary
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(
        amount: i64,
        classification: Classification,
        department: &str,
        fund_source: &str,
    ) -> Disbursement {
        Disbursement {
            id: uuid::Uuid::new_v4().to_string(),
            payee: "Payee".into(),
            amount_centavos: amount,
            disbursement_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            fund_source: fund_source.into(),
            classification,
            description: "desc".into(),
            reference_number: "DV-0001".into(),
            department: department.into(),
            encoded_by: "encoder-1".into(),
            encoded_at: Utc::now(),
            updated_by: None,
            updated_at: None,
            is_archived: false,
        }
    }

    use chrono::Utc;

    #[test]
    fn summarize_totals_and_groups() {
        let records = vec![
            sample(100_00, Classification::PS, "HR", "Payroll Fund"),
            sample(250_00, Classification::PS, "HR", "Payroll Fund"),
            sample(75_50, Classification::MOOE, "Finance", "General Fund"),
        ];

        let summary = summarize(&records);
        assert_eq!(summary.total_count, 3);
        assert_eq!(summary.total_amount_centavos, 425_50);
        assert_eq!(summary.by_classification[&Classification::PS], 350_00);
        assert_eq!(summary.by_classification[&Classification::MOOE], 75_50);
        assert_eq!(summary.by_department["HR"], 350_00);
        assert_eq!(summary.by_fund_source["General Fund"], 75_50);
    }

    #[test]
    fn summarize_empty_slice() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_count, 0);
        assert_eq!(summary.total_amount_centavos, 0);
        assert!(summary.by_classification.is_empty());
    }

    #[test]
    fn classification_parse_round_trip() {
        for c in [
            Classification::PS,
            Classification::MOOE,
            Classification::CO,
            Classification::TR,
        ] {
            assert_eq!(Classification::parse(c.as_str()), Some(c));
        }
        assert_eq!(Classification::parse("XX"), None);
    }

    #[test]
    fn format_amount_smallest_units() {
        assert_eq!(Disbursement::format_amount(12345), "123.45 PHP");
        assert_eq!(Disbursement::format_amount(0), "0.00 PHP");
        assert_eq!(Disbursement::format_amount(5), "0.05 PHP");
    }
}
