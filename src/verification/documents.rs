//! Document name reconciliation and the document-completeness rule
//!
//! Submitted document labels are free text typed or picked by students
//! ("Marksheet 10th", "12th Marksheet Copy", ...). Matching is deliberately
//! fuzzy: a required name matches when its normalized form is a substring of
//! some normalized submission. This over-matches: "Photo" is satisfied by
//! "Photocopy of Aadhar".

use crate::models::{DocumentStatus, DocumentVerdict, StudentRecord};
use tracing::debug;

/// Documents that must all be present for admission approval.
pub const ADMISSION_REQUIRED_DOCUMENTS: &[&str] =
    &["10th Marksheet", "12th Marksheet", "Aadhar Card", "Photo"];

/// Reported alongside the admission documents but never required.
pub const TRANSFER_CERTIFICATE: &str = "Transfer Certificate";

/// Lowercase, drop every space, drop the word "marksheet".
pub fn normalize_document_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "").replace("marksheet", "")
}

/// Whether `required` is covered by any entry of `submitted`.
pub fn is_submitted<S: AsRef<str>>(required: &str, submitted: &[S]) -> bool {
    let needle = normalize_document_name(required);
    submitted
        .iter()
        .any(|doc| normalize_document_name(doc.as_ref()).contains(&needle))
}

/// Per-document status for a fixed requirement list, in list order.
pub fn check_documents<S: AsRef<str>>(required: &[&str], submitted: &[S]) -> Vec<DocumentStatus> {
    required
        .iter()
        .map(|name| DocumentStatus {
            name: (*name).to_string(),
            submitted: is_submitted(name, submitted),
        })
        .collect()
}

/// Names from `statuses` that were not submitted, in order.
pub fn missing_documents(statuses: &[DocumentStatus]) -> Vec<String> {
    statuses
        .iter()
        .filter(|status| !status.submitted)
        .map(|status| status.name.clone())
        .collect()
}

/// Approve admission paperwork when all four required documents are present.
pub fn evaluate_documents(record: &StudentRecord) -> DocumentVerdict {
    let submitted = &record.documents_submitted;
    let per_doc_status = check_documents(ADMISSION_REQUIRED_DOCUMENTS, submitted);
    let approved = per_doc_status.iter().all(|status| status.submitted);
    let transfer_certificate_present = is_submitted(TRANSFER_CERTIFICATE, submitted);

    debug!(
        approved,
        transfer_certificate_present,
        submitted_count = submitted.len(),
        "Document completeness evaluated"
    );

    DocumentVerdict {
        approved,
        per_doc_status,
        transfer_certificate_present,
    }
}
