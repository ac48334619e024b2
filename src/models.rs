//! Core data models for the admission helpdesk

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

//
// ================= Student Record =================
//

/// Flat student profile as captured by the intake form.
///
/// `name` is the only identity: two records whose names are equal after
/// lowercasing are the same student. Numeric intake fields are optional so
/// that an incomplete form can still be represented and rejected by the
/// intake validator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StudentRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub course_applied: String,
    #[serde(default)]
    pub marks_10th: Option<f64>,
    #[serde(default)]
    pub marks_12th: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub documents_submitted: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub loan_requested: f64,
    /// Independent of whether "Income Certificate" appears in `documents_submitted`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub income_certificate: bool,
}

impl StudentRecord {
    /// Store identifier: the lowercased name.
    pub fn student_id(&self) -> String {
        student_id(&self.name)
    }

    pub fn marks_10th_or_zero(&self) -> f64 {
        self.marks_10th.unwrap_or(0.0)
    }

    pub fn marks_12th_or_zero(&self) -> f64 {
        self.marks_12th.unwrap_or(0.0)
    }
}

/// Lowercased name used as the record store key.
pub fn student_id(name: &str) -> String {
    name.to_lowercase()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

//
// ================= Intent =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Eligibility,
    Loan,
    Document,
    Counselling,
    Unknown,
}

impl Intent {
    /// The closed set the classifier may answer with.
    pub const CATEGORIES: [Intent; 4] = [
        Intent::Eligibility,
        Intent::Loan,
        Intent::Document,
        Intent::Counselling,
    ];

    /// Map a raw classifier answer onto the closed set.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "eligibility" => Intent::Eligibility,
            "loan" => Intent::Loan,
            "document" => Intent::Document,
            "counselling" => Intent::Counselling,
            _ => Intent::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Eligibility => "eligibility",
            Intent::Loan => "loan",
            Intent::Document => "document",
            Intent::Counselling => "counselling",
            Intent::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ================= Verdicts =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentStatus {
    pub name: String,
    pub submitted: bool,
}

/// Result of the local loan eligibility rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoanVerdict {
    pub eligible: bool,
    /// One line per failing criterion; empty when eligible.
    pub reasons: Vec<String>,
    pub doc_status: Vec<DocumentStatus>,
    pub marks_10th: f64,
    pub marks_12th: f64,
}

/// Outcome of the loan branch before any narrative is generated.
#[derive(Debug, Clone, PartialEq)]
pub enum LoanDecision {
    /// Income certificate missing and the query asks to apply; nothing else is evaluated.
    CertificateRequired,
    Evaluated(LoanVerdict),
}

/// Result of the document-completeness rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentVerdict {
    pub approved: bool,
    pub per_doc_status: Vec<DocumentStatus>,
    /// Informational only; never gates approval.
    pub transfer_certificate_present: bool,
}

//
// ================= Query Reply =================
//

/// What the router answered and which branch produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryReply {
    /// `None` when the query was rejected before classification.
    pub intent: Option<Intent>,
    pub response: String,
}
