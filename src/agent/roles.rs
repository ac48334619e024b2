//! Agent roles and the tasks handed to them

use crate::llm::LanguageModel;
use serde::Serialize;
use tracing::debug;

/// The four helpdesk personas the language model is asked to play.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Shortlisting,
    DocumentChecker,
    Counsellor,
    LoanAdvisor,
}

impl AgentRole {
    pub fn name(&self) -> &'static str {
        match self {
            AgentRole::Shortlisting => "Shortlisting Agent",
            AgentRole::DocumentChecker => "Document Checker Agent",
            AgentRole::Counsellor => "Student Counsellor",
            AgentRole::LoanAdvisor => "Student Loan Agent",
        }
    }

    pub fn role(&self) -> &'static str {
        match self {
            AgentRole::Shortlisting => "Admission Eligibility Verifier",
            AgentRole::DocumentChecker => "Document Validator",
            AgentRole::Counsellor => "Admission Guidance Expert",
            AgentRole::LoanAdvisor => "Student Loan Advisor",
        }
    }

    pub fn goal(&self) -> &'static str {
        match self {
            AgentRole::Shortlisting => {
                "Evaluate the student's eligibility for admission based on academic performance and criteria."
            }
            AgentRole::DocumentChecker => {
                "Verify if the submitted documents are complete and valid for the admission process."
            }
            AgentRole::Counsellor => {
                "Guide students about the admission process, course offerings, and counseling."
            }
            AgentRole::LoanAdvisor => {
                "Assist students in understanding and applying for student loans."
            }
        }
    }

    pub fn backstory(&self) -> String {
        format!("{} is responsible for {}", self.name(), self.goal().to_lowercase())
    }
}

/// One unit of work for an agent: what to look at and what to produce.
#[derive(Debug, Clone)]
pub struct Task {
    pub description: String,
    pub agent: AgentRole,
    pub expected_output: String,
}

impl Task {
    pub fn new(description: impl Into<String>, agent: AgentRole, expected_output: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            agent,
            expected_output: expected_output.into(),
        }
    }

    /// Persona, task and expected output as one prompt.
    pub fn prompt(&self) -> String {
        format!(
            "You are {name}, acting as {role}.\n\
             {backstory}\n\
             Your goal: {goal}\n\
             \n\
             TASK:\n\
             {description}\n\
             \n\
             EXPECTED OUTPUT:\n\
             {expected}\n",
            name = self.agent.name(),
            role = self.agent.role(),
            backstory = self.agent.backstory(),
            goal = self.agent.goal(),
            description = self.description.trim_end(),
            expected = self.expected_output,
        )
    }

    /// Run the task with a single model call.
    pub async fn execute(&self, model: &dyn LanguageModel) -> crate::Result<String> {
        debug!(agent = self.agent.name(), "Executing agent task");
        model.call(&self.prompt()).await
    }
}
