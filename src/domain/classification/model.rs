//! Classification rules and the suggestion engine

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::disbursement::Classification;

/// Admin-managed rule used to suggest a classification for an entry
#[derive(Debug, Clone)]
pub struct ClassificationRule {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub classification: Classification,
    /// Matched case-insensitively against payee and description
    pub keywords: Vec<String>,
    pub min_amount_centavos: Option<i64>,
    pub max_amount_centavos: Option<i64>,
    pub department: Option<String>,
    pub is_active: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a rule
#[derive(Debug, Clone)]
pub struct NewClassificationRule {
    pub name: String,
    pub description: Option<String>,
    pub classification: Classification,
    pub keywords: Vec<String>,
    pub min_amount_centavos: Option<i64>,
    pub max_amount_centavos: Option<i64>,
    pub department: Option<String>,
    pub is_active: bool,
}

/// The entry being classified
#[derive(Debug, Clone)]
pub struct ClassificationCandidate {
    pub payee: String,
    pub amount_centavos: i64,
    pub description: String,
    pub department: String,
}

/// Result of the suggestion engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub classification: Classification,
    /// 0..=95
    pub confidence: u32,
    pub reason: String,
    pub matched_rule: Option<String>,
    pub matched_keywords: Vec<String>,
}

const KEYWORD_SCORE: u32 = 20;
const AMOUNT_BOUND_SCORE: u32 = 10;
const DEPARTMENT_SCORE: u32 = 15;
const DEFAULT_CONFIDENCE: u32 = 30;
const MAX_CONFIDENCE: u32 = 95;

/// Score a candidate against the rule set and return the best suggestion.
///
/// Scoring per rule: each keyword found in the payee or description adds
/// 20, each satisfied amount bound adds 10, a department match adds 15.
/// Inactive rules are skipped. A rule only displaces the running best on
/// a strictly higher score, so the first rule wins ties and the default
/// (MOOE at confidence 30) stands when nothing scores above it.
/// Confidence is capped at 95; a suggestion is never a certainty.
pub fn suggest(candidate: &ClassificationCandidate, rules: &[ClassificationRule]) -> Suggestion {
    let description = candidate.description.to_lowercase();
    let payee = candidate.payee.to_lowercase();

    let mut best = Suggestion {
        classification: Classification::MOOE,
        confidence: DEFAULT_CONFIDENCE,
        reason: "Default classification".to_string(),
        matched_rule: None,
        matched_keywords: Vec::new(),
    };

    for rule in rules {
        if !rule.is_active {
            continue;
        }

        let mut score = 0;
        let mut matched_keywords = Vec::new();

        for keyword in &rule.keywords {
            let needle = keyword.to_lowercase();
            if description.contains(&needle) || payee.contains(&needle) {
                score += KEYWORD_SCORE;
                matched_keywords.push(keyword.clone());
            }
        }

        if let Some(min) = rule.min_amount_centavos {
            if candidate.amount_centavos >= min {
                score += AMOUNT_BOUND_SCORE;
            }
        }
        if let Some(max) = rule.max_amount_centavos {
            if candidate.amount_centavos <= max {
                score += AMOUNT_BOUND_SCORE;
            }
        }

        if let Some(department) = &rule.department {
            if *department == candidate.department {
                score += DEPARTMENT_SCORE;
            }
        }

        if score > best.confidence {
            best = Suggestion {
                classification: rule.classification,
                confidence: score.min(MAX_CONFIDENCE),
                reason: format!("Matched rule: {}", rule.name),
                matched_rule: Some(rule.name.clone()),
                matched_keywords,
            };
        }
    }

    best
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(
        name: &str,
        classification: Classification,
        keywords: &[&str],
    ) -> ClassificationRule {
        ClassificationRule {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            description: None,
            classification,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            min_amount_centavos: None,
            max_amount_centavos: None,
            department: None,
            is_active: true,
            created_by: "admin-1".into(),
            created_at: Utc::now(),
        }
    }

    fn candidate(payee: &str, amount: i64, description: &str, department: &str) -> ClassificationCandidate {
        ClassificationCandidate {
            payee: payee.into(),
            amount_centavos: amount,
            description: description.into(),
            department: department.into(),
        }
    }

    #[test]
    fn no_rules_yields_default() {
        let s = suggest(&candidate("Anyone", 1000_00, "something", "Finance"), &[]);
        assert_eq!(s.classification, Classification::MOOE);
        assert_eq!(s.confidence, 30);
        assert_eq!(s.reason, "Default classification");
        assert!(s.matched_rule.is_none());
    }

    #[test]
    fn keyword_matches_add_twenty_each() {
        let rules = vec![rule("Salary Payments", Classification::PS, &["salary", "wage"])];
        let s = suggest(
            &candidate("John Doe", 45_000_00, "Monthly salary and wage payment", "HR"),
            &rules,
        );
        assert_eq!(s.classification, Classification::PS);
        assert_eq!(s.confidence, 40);
        assert_eq!(s.matched_keywords, vec!["salary", "wage"]);
        assert_eq!(s.reason, "Matched rule: Salary Payments");
    }

    #[test]
    fn keyword_match_is_case_insensitive_and_checks_payee() {
        let rules = vec![rule(
            "Office Supplies",
            Classification::MOOE,
            &["supplies", "stationery"],
        )];
        let s = suggest(
            &candidate("Office SUPPLIES Inc.", 25_000_00, "Stationery order", "Finance"),
            &rules,
        );
        // "supplies" matches via the payee, "stationery" via the description
        assert_eq!(s.confidence, 40);
        assert_eq!(s.matched_rule.as_deref(), Some("Office Supplies"));
        assert_eq!(s.matched_keywords, vec!["supplies", "stationery"]);
    }

    #[test]
    fn single_bound_ties_with_default_and_loses() {
        let mut r = rule("Equipment Purchase", Classification::CO, &["equipment"]);
        r.min_amount_centavos = Some(15_000_00);
        let s = suggest(
            &candidate("Tech Solutions Corp.", 150_000_00, "Computer equipment", "IT"),
            &[r],
        );
        // keyword (20) + min bound satisfied (10) = 30, which does not
        // strictly beat the default confidence of 30
        assert_eq!(s.classification, Classification::MOOE);
        assert_eq!(s.confidence, 30);
        assert!(s.matched_rule.is_none());
    }

    #[test]
    fn both_amount_bounds_beat_default() {
        let mut r = rule("Equipment Purchase", Classification::CO, &["equipment"]);
        r.min_amount_centavos = Some(15_000_00);
        r.max_amount_centavos = Some(500_000_00);
        let s = suggest(
            &candidate("Tech Solutions Corp.", 150_000_00, "Computer equipment", "IT"),
            &[r],
        );
        // keyword (20) + min (10) + max (10) = 40
        assert_eq!(s.classification, Classification::CO);
        assert_eq!(s.confidence, 40);
        assert_eq!(s.matched_rule.as_deref(), Some("Equipment Purchase"));
    }

    #[test]
    fn department_match_adds_fifteen() {
        let mut r = rule("Salary Payments", Classification::PS, &["salary"]);
        r.department = Some("Human Resources".into());
        let s = suggest(
            &candidate("John Doe", 45_000_00, "Monthly salary payment", "Human Resources"),
            &[r],
        );
        // keyword (20) + department (15) = 35 beats the default 30
        assert_eq!(s.classification, Classification::PS);
        assert_eq!(s.confidence, 35);
    }

    #[test]
    fn confidence_caps_at_ninety_five() {
        let mut r = rule(
            "Everything",
            Classification::CO,
            &["alpha", "beta", "gamma", "delta", "epsilon"],
        );
        r.min_amount_centavos = Some(0);
        r.max_amount_centavos = Some(i64::MAX);
        let s = suggest(
            &candidate("alpha beta", 100, "gamma delta epsilon", "IT"),
            &[r],
        );
        // 5 keywords (100) + both bounds (20) = 120, capped
        assert_eq!(s.confidence, 95);
    }

    #[test]
    fn inactive_rules_are_skipped() {
        let mut r = rule("Salary Payments", Classification::PS, &["salary", "wage", "pay"]);
        r.is_active = false;
        let s = suggest(
            &candidate("John Doe", 45_000_00, "salary wage pay", "HR"),
            &[r],
        );
        assert_eq!(s.classification, Classification::MOOE);
        assert!(s.matched_rule.is_none());
    }

    #[test]
    fn first_rule_wins_ties() {
        let first = rule("First", Classification::PS, &["shared", "common"]);
        let second = rule("Second", Classification::CO, &["shared", "common"]);
        let s = suggest(
            &candidate("x", 0, "shared common words", "IT"),
            &[first, second],
        );
        assert_eq!(s.matched_rule.as_deref(), Some("First"));
        assert_eq!(s.classification, Classification::PS);
    }

    #[test]
    fn best_scoring_rule_wins() {
        let weak = rule("Weak", Classification::TR, &["receipt"]);
        let strong = rule("Strong", Classification::PS, &["salary", "wage", "pay"]);
        let s = suggest(
            &candidate("payroll office", 0, "salary wage pay receipt", "HR"),
            &[weak, strong],
        );
        assert_eq!(s.matched_rule.as_deref(), Some("Strong"));
        assert_eq!(s.confidence, 60);
    }
}
