//! Admission officer - routes a student query to the right agent
//!
//! VALIDATE → CLASSIFY → ROUTE → (EVALUATE) → RESPOND

pub mod roles;

pub use roles::{AgentRole, Task};

use crate::classifier::IntentClassifier;
use crate::intake::{self, MissingField};
use crate::llm::LanguageModel;
use crate::memory::{ConversationEntry, ConversationLog, MessageRole};
use crate::models::{Intent, LoanDecision, QueryReply, StudentRecord};
use crate::verification::{self, report};
use crate::Result;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

pub const UNKNOWN_INTENT_MESSAGE: &str = "❓ Sorry, I couldn't understand your request. Could you rephrase it or choose a category like eligibility, loan, documents, or counselling?";

const ELIGIBILITY_OUTPUT: &str = "Bullet-pointed evaluation of admission eligibility.";
const COUNSELLING_OUTPUT: &str = "Bullet-pointed advice and next steps for the student.";

/// User-facing text for a failed intake check.
pub fn validation_message(missing: &MissingField) -> String {
    format!(
        "⚠️ Error: {}. Please provide complete and correct student information.",
        missing
    )
}

/// Where a classified query goes next.
#[derive(Debug, Clone)]
pub enum Route {
    /// Answered locally with fixed text; the model is not consulted again.
    Reply(String),
    /// Narrated by an agent.
    Delegate(Task),
}

/// Build the route for a classified query. Pure: loan and document verdicts
/// are computed here and embedded in the task.
pub fn route(intent: Intent, query: &str, record: &StudentRecord) -> Route {
    let name = record.name.as_str();

    match intent {
        Intent::Eligibility => Route::Delegate(Task::new(
            report::profile_context(record, query),
            AgentRole::Shortlisting,
            ELIGIBILITY_OUTPUT,
        )),

        Intent::Counselling => Route::Delegate(Task::new(
            report::profile_context(record, query),
            AgentRole::Counsellor,
            COUNSELLING_OUTPUT,
        )),

        Intent::Loan => match verification::decide_loan(query, record) {
            LoanDecision::CertificateRequired => {
                Route::Reply(report::certificate_required_letter(name))
            }
            LoanDecision::Evaluated(verdict) => Route::Delegate(Task::new(
                report::loan_report(&verdict),
                AgentRole::LoanAdvisor,
                report::loan_expected_output(name, &verdict),
            )),
        },

        Intent::Document => {
            let verdict = verification::evaluate_documents(record);
            let description = format!(
                "{}\n{}",
                report::profile_context(record, query),
                report::document_summary(&verdict)
            );
            Route::Delegate(Task::new(
                description,
                AgentRole::DocumentChecker,
                report::document_expected_output(name, &verdict),
            ))
        }

        Intent::Unknown => Route::Reply(UNKNOWN_INTENT_MESSAGE.to_string()),
    }
}

/// Query router with injected model and conversation log
pub struct AdmissionOfficer {
    model: Arc<dyn LanguageModel>,
    conversation_log: Arc<dyn ConversationLog>,
}

impl AdmissionOfficer {
    pub fn new(model: Arc<dyn LanguageModel>, conversation_log: Arc<dyn ConversationLog>) -> Self {
        Self {
            model,
            conversation_log,
        }
    }

    pub fn conversation_log(&self) -> &Arc<dyn ConversationLog> {
        &self.conversation_log
    }

    /// Answer a query for a student. Validation and classification problems
    /// come back as text; only model failures are errors.
    pub async fn process_query(&self, query: &str, record: &StudentRecord) -> Result<String> {
        Ok(self.handle_query(query, record).await?.response)
    }

    /// Like `process_query`, also reporting which intent handled the query.
    pub async fn handle_query(&self, query: &str, record: &StudentRecord) -> Result<QueryReply> {
        let start_time = Instant::now();

        // === VALIDATE ===
        if let Err(missing) = intake::validate(record) {
            warn!(field = missing.field, "Student profile failed intake validation");
            return Ok(QueryReply {
                intent: None,
                response: validation_message(&missing),
            });
        }

        self.log(ConversationEntry::new(record, MessageRole::User, None, query))
            .await;

        // === CLASSIFY ===
        let intent = IntentClassifier::new(self.model.as_ref())
            .classify(query)
            .await?;

        // === ROUTE ===
        let response = match route(intent, query, record) {
            Route::Reply(text) => text,
            Route::Delegate(task) => {
                let output = task.execute(self.model.as_ref()).await?;
                info!(
                    intent = %intent,
                    agent = task.agent.name(),
                    "[AGENT OUTPUT - {}]:\n{}",
                    intent,
                    output
                );
                output
            }
        };

        self.log(ConversationEntry::new(
            record,
            MessageRole::Agent,
            Some(intent),
            response.as_str(),
        ))
        .await;

        info!(
            student_id = %record.student_id(),
            intent = %intent,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Query processed"
        );

        Ok(QueryReply {
            intent: Some(intent),
            response,
        })
    }

    async fn log(&self, entry: ConversationEntry) {
        if let Err(error) = self.conversation_log.record(entry).await {
            warn!("Conversation log write failed, response will still be returned: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedModel;
    use crate::memory::InMemoryConversationLog;

    fn student(docs: &[&str], income_certificate: bool) -> StudentRecord {
        StudentRecord {
            name: "Priya Sharma".to_string(),
            age: Some(18),
            course_applied: "B.Sc Nursing".to_string(),
            marks_10th: Some(55.0),
            marks_12th: Some(60.0),
            documents_submitted: docs.iter().map(|d| d.to_string()).collect(),
            loan_requested: 120000.0,
            income_certificate,
        }
    }

    fn officer(model: Arc<ScriptedModel>) -> (AdmissionOfficer, Arc<InMemoryConversationLog>) {
        let log = Arc::new(InMemoryConversationLog::new());
        (AdmissionOfficer::new(model, log.clone()), log)
    }

    #[test]
    fn test_route_unknown_replies_directly() {
        match route(Intent::Unknown, "hmm", &student(&[], false)) {
            Route::Reply(text) => assert_eq!(text, UNKNOWN_INTENT_MESSAGE),
            Route::Delegate(_) => panic!("unknown intent must not reach an agent"),
        }
    }

    #[test]
    fn test_route_loan_gate() {
        match route(Intent::Loan, "How do I apply?", &student(&[], false)) {
            Route::Reply(text) => {
                assert!(text.starts_with("Dear Priya Sharma,"));
                assert!(text.contains("Income Certificate is a mandatory requirement"));
            }
            Route::Delegate(_) => panic!("gate should short-circuit"),
        }
    }

    #[test]
    fn test_route_document_embeds_summary() {
        let Route::Delegate(task) = route(Intent::Document, "Are my papers ok?", &student(&["Photo"], false)) else {
            panic!("document intent delegates");
        };
        assert_eq!(task.agent, AgentRole::DocumentChecker);
        assert!(task.description.contains("STUDENT QUERY:\nAre my papers ok?"));
        assert!(task.description.contains("DOCUMENT CHECK SUMMARY:"));
        assert!(task.expected_output.contains("❌ Admission Status: Not Approved"));
    }

    #[test]
    fn test_route_eligibility_passes_context_through() {
        let record = student(&["Photo"], true);
        let Route::Delegate(task) = route(Intent::Eligibility, "Am I eligible?", &record) else {
            panic!("eligibility intent delegates");
        };
        assert_eq!(task.agent, AgentRole::Shortlisting);
        assert_eq!(task.description, report::profile_context(&record, "Am I eligible?"));
        assert_eq!(task.expected_output, ELIGIBILITY_OUTPUT);
    }

    #[tokio::test]
    async fn test_validation_failure_skips_model() {
        let model = Arc::new(ScriptedModel::new(["loan"]));
        let (officer, log) = officer(model.clone());
        let mut record = student(&[], true);
        record.course_applied.clear();

        let response = officer.process_query("loan please", &record).await.unwrap();
        assert_eq!(
            response,
            "⚠️ Error: Missing or invalid field: course_applied. Please provide complete and correct student information."
        );
        assert!(model.prompts().is_empty());
        assert!(log.history("priya sharma").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_counselling_logs_both_turns() {
        let model = Arc::new(ScriptedModel::new(["counselling", "- Consider a foundation course"]));
        let (officer, log) = officer(model.clone());

        let reply = officer
            .handle_query("Which course suits me?", &student(&["Photo"], true))
            .await
            .unwrap();

        assert_eq!(reply.intent, Some(Intent::Counselling));
        assert_eq!(reply.response, "- Consider a foundation course");

        let history = log.history("priya sharma").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "Which course suits me?");
        assert_eq!(history[1].intent, Some(Intent::Counselling));
        assert_eq!(history[0].profile_hash, history[1].profile_hash);
    }
}
