//! Error types for the admission helpdesk

use thiserror::Error;

/// Result type alias for helpdesk operations
pub type Result<T> = std::result::Result<T, HelpdeskError>;

#[derive(Error, Debug)]
pub enum HelpdeskError {

    // =============================
    // Domain Errors
    // =============================

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // =============================
    // External Service Errors
    // =============================

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("LLM call timed out after {0}s")]
    LlmTimeout(u64),

    #[error("Database error: {0}")]
    Database(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HelpdeskError {
    /// True for failures raised by a collaborator service (model or store)
    /// rather than by the helpdesk's own rules.
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            HelpdeskError::Llm(_)
                | HelpdeskError::LlmTimeout(_)
                | HelpdeskError::Database(_)
                | HelpdeskError::Http(_)
                | HelpdeskError::Sql(_)
        )
    }
}
