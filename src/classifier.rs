//! Intent Classifier
//!
//! Asks the language model to name one of the four helpdesk categories.
//! Best effort: one call, no retry, anything off-list becomes `Unknown`.

use crate::llm::LanguageModel;
use crate::models::Intent;
use tracing::info;

/// Build the single-word classification prompt for a query.
pub fn classification_prompt(query: &str) -> String {
    let categories = Intent::CATEGORIES
        .iter()
        .map(|intent| format!("- {}", intent))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Classify the following student query into one of the following categories:\n\
         {}\n\
         \n\
         Only respond with the category name.\n\
         \n\
         Query: \"{}\"",
        categories, query
    )
}

/// Intent classifier backed by a language model
pub struct IntentClassifier<'a> {
    model: &'a dyn LanguageModel,
}

impl<'a> IntentClassifier<'a> {
    pub fn new(model: &'a dyn LanguageModel) -> Self {
        Self { model }
    }

    /// Classify a query. Model failures propagate; odd answers do not.
    pub async fn classify(&self, query: &str) -> crate::Result<Intent> {
        let answer = self.model.call(&classification_prompt(query)).await?;
        let intent = Intent::from_label(&answer);

        info!(intent = %intent, raw = %answer.trim(), "Detected intent");

        Ok(intent)
    }
}
