//! Student loan eligibility rule

use super::documents::{check_documents, missing_documents};
use crate::models::{LoanDecision, LoanVerdict, StudentRecord};
use tracing::{debug, info};

/// Documents required to process a loan application.
pub const LOAN_REQUIRED_DOCUMENTS: &[&str] = &[
    "10th Marksheet",
    "12th Marksheet",
    "Aadhar Card",
    "Photo",
    "Income Certificate",
];

pub const INCOME_CERTIFICATE: &str = "Income Certificate";

/// Inclusive minimum percentage for both 10th and 12th marks.
pub const MIN_LOAN_MARKS: f64 = 50.0;

/// Query words that count as an attempt to apply for a loan.
const APPLY_KEYWORDS: &[&str] = &["apply", "submit", "get", "eligible", "loan"];

/// True when the income certificate is missing and the query is an attempt
/// to apply. Without any of the keywords the rule still evaluates fully.
pub fn requires_income_certificate(query: &str, record: &StudentRecord) -> bool {
    if record.income_certificate {
        return false;
    }
    let query = query.to_lowercase();
    APPLY_KEYWORDS.iter().any(|kw| query.contains(kw))
}

/// Evaluate academic and document criteria, collecting every failure.
pub fn evaluate_loan(record: &StudentRecord) -> LoanVerdict {
    let marks_10th = record.marks_10th_or_zero();
    let marks_12th = record.marks_12th_or_zero();

    let mut submitted = record.documents_submitted.clone();
    if record.income_certificate {
        submitted.push(INCOME_CERTIFICATE.to_string());
    }

    let doc_status = check_documents(LOAN_REQUIRED_DOCUMENTS, &submitted);
    let missing = missing_documents(&doc_status);

    let mut reasons = Vec::new();
    if marks_10th < MIN_LOAN_MARKS {
        reasons.push("10th marks below 50%".to_string());
    }
    if marks_12th < MIN_LOAN_MARKS {
        reasons.push("12th marks below 50%".to_string());
    }
    if !missing.is_empty() {
        reasons.push(format!("Missing documents: {}", missing.join(", ")));
    }

    let eligible = reasons.is_empty();

    debug!(
        eligible,
        marks_10th,
        marks_12th,
        missing_count = missing.len(),
        "Loan eligibility evaluated"
    );

    LoanVerdict {
        eligible,
        reasons,
        doc_status,
        marks_10th,
        marks_12th,
    }
}

/// Full loan branch decision: the certificate gate first, then the rule.
pub fn decide_loan(query: &str, record: &StudentRecord) -> LoanDecision {
    if requires_income_certificate(query, record) {
        info!(student = %record.name, "Loan request blocked: income certificate missing");
        return LoanDecision::CertificateRequired;
    }
    LoanDecision::Evaluated(evaluate_loan(record))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn applicant(marks_10th: f64, marks_12th: f64, docs: &[&str], income_certificate: bool) -> StudentRecord {
        StudentRecord {
            name: "Arjun Rao".to_string(),
            age: Some(19),
            course_applied: "B.Com".to_string(),
            marks_10th: Some(marks_10th),
            marks_12th: Some(marks_12th),
            documents_submitted: docs.iter().map(|d| d.to_string()).collect(),
            loan_requested: 150000.0,
            income_certificate,
        }
    }

    const FOUR_DOCS: &[&str] = &["10th Marksheet", "12th Marksheet", "Aadhar Card", "Photo"];

    #[test]
    fn test_eligible_with_flag_supplying_certificate() {
        let verdict = evaluate_loan(&applicant(55.0, 60.0, FOUR_DOCS, true));
        assert!(verdict.eligible);
        assert!(verdict.reasons.is_empty());
        assert!(verdict.doc_status.iter().all(|s| s.submitted));
        assert_eq!(verdict.doc_status.len(), 5);
    }

    #[test]
    fn test_all_failures_listed() {
        let verdict = evaluate_loan(&applicant(
            40.0,
            60.0,
            &["10th Marksheet", "12th Marksheet", "Photo", "Income Certificate"],
            true,
        ));
        assert!(!verdict.eligible);
        assert!(verdict.reasons.contains(&"10th marks below 50%".to_string()));
        assert!(verdict.reasons.contains(&"Missing documents: Aadhar Card".to_string()));
        assert_eq!(verdict.reasons.len(), 2);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let verdict = evaluate_loan(&applicant(50.0, 50.0, FOUR_DOCS, true));
        assert!(verdict.eligible);

        let verdict = evaluate_loan(&applicant(50.0, 49.99, FOUR_DOCS, true));
        assert_eq!(verdict.reasons, vec!["12th marks below 50%".to_string()]);
    }

    #[test]
    fn test_missing_certificate_without_keywords_falls_through() {
        let record = applicant(70.0, 70.0, FOUR_DOCS, false);
        let decision = decide_loan("what is the interest rate?", &record);

        match decision {
            LoanDecision::Evaluated(verdict) => {
                assert!(!verdict.eligible);
                assert_eq!(verdict.reasons, vec!["Missing documents: Income Certificate".to_string()]);
            }
            LoanDecision::CertificateRequired => panic!("gate should not trigger without keywords"),
        }
    }

    #[test]
    fn test_certificate_gate_keywords_case_insensitive() {
        let record = applicant(70.0, 70.0, FOUR_DOCS, false);
        assert_eq!(decide_loan("Can I APPLY now?", &record), LoanDecision::CertificateRequired);
        assert_eq!(decide_loan("am I Eligible", &record), LoanDecision::CertificateRequired);
        // "together" contains "get"
        assert_eq!(decide_loan("put it together", &record), LoanDecision::CertificateRequired);
    }

    #[test]
    fn test_certificate_flag_bypasses_gate() {
        let record = applicant(70.0, 70.0, FOUR_DOCS, true);
        assert!(!requires_income_certificate("I want to apply for a loan", &record));
    }

    #[test]
    fn test_listed_certificate_counts_without_flag() {
        let mut docs = FOUR_DOCS.to_vec();
        docs.push("Income Certificate");
        let verdict = evaluate_loan(&applicant(70.0, 70.0, &docs, false));
        assert!(verdict.eligible);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let record = applicant(45.0, 80.0, &["Photo"], true);
        let first = evaluate_loan(&record);
        let second = evaluate_loan(&record);
        assert_eq!(first, second);
        assert_eq!(record.documents_submitted, vec!["Photo".to_string()]);
    }
}
