//! Admission Helpdesk
//!
//! A rule-based intent router for a student-admission helpdesk that:
//! - Validates the student profile before anything else happens
//! - Classifies the query (eligibility, loan, document, counselling) via an LLM
//! - Decides loan eligibility and document completeness deterministically
//! - Hands the verdict to an agent persona for the final narrative
//! - Persists profiles keyed by lowercased student name
//!
//! FLOW:
//! QUERY + PROFILE → VALIDATE → CLASSIFY → ROUTE → (EVALUATE) → RESPOND

pub mod agent;
pub mod api;
pub mod classifier;
pub mod config;
pub mod error;
pub mod intake;
pub mod llm;
pub mod memory;
pub mod models;
pub mod state;
pub mod verification;

pub use error::Result;

// Re-export common types
pub use agent::AdmissionOfficer;
pub use classifier::IntentClassifier;
pub use models::*;
