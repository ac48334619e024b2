//! Deterministic admission checks
//!
//! Loan eligibility and document completeness are decided here, locally,
//! before any language model is involved. The model only narrates the verdict.

pub mod documents;
pub mod loan;
pub mod report;

pub use documents::{
    check_documents, evaluate_documents, is_submitted, missing_documents, normalize_document_name,
    ADMISSION_REQUIRED_DOCUMENTS, TRANSFER_CERTIFICATE,
};
pub use loan::{
    decide_loan, evaluate_loan, requires_income_certificate, INCOME_CERTIFICATE,
    LOAN_REQUIRED_DOCUMENTS, MIN_LOAN_MARKS,
};
