//! Language model clients
//!
//! The helpdesk treats the model as `prompt -> text`. `OllamaClient` talks to a
//! local Ollama server over a long-lived, connection-pooled reqwest::Client;
//! `TimeoutModel` bounds any model call; `ScriptedModel` replays canned answers.

use crate::config::LlmConfig;
use crate::error::HelpdeskError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Prompt in, free text out. No schema, no determinism.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn call(&self, prompt: &str) -> crate::Result<String>;
}

//
// ================= Ollama =================
//

/// Reusable Ollama client (connection-pooled)
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OllamaClient {
    pub fn new(config: &LlmConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_for(&self, prompt: &str) -> GenerateRequest {
        GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
                num_predict: self.max_tokens,
            },
        }
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn call(&self, prompt: &str) -> crate::Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let request = self.request_for(prompt);

        debug!(model = %self.model, prompt_len = prompt.len(), "Calling Ollama API");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Ollama API request failed: {}", e);
                HelpdeskError::Llm(format!("Ollama API error: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Ollama API error response ({}): {}", status, error_text);
            return Err(HelpdeskError::Llm(format!(
                "Ollama API error ({}): {}",
                status, error_text
            )));
        }

        let generated: GenerateResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Ollama response: {}", e);
            HelpdeskError::Llm(format!("Ollama parse error: {}", e))
        })?;

        info!(
            model = %self.model,
            done_reason = generated.done_reason.as_deref().unwrap_or("unknown"),
            "Ollama response received"
        );

        Ok(generated.response)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    done_reason: Option<String>,
}

//
// ================= Timeout =================
//

/// Bounds every call of the wrapped model; elapsed calls become `LlmTimeout`.
pub struct TimeoutModel<M> {
    inner: M,
    timeout: Duration,
}

impl<M: LanguageModel> TimeoutModel<M> {
    pub fn new(inner: M, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl<M: LanguageModel> LanguageModel for TimeoutModel<M> {
    async fn call(&self, prompt: &str) -> crate::Result<String> {
        match tokio::time::timeout(self.timeout, self.inner.call(prompt)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout_secs = self.timeout.as_secs(), "Language model call timed out");
                Err(HelpdeskError::LlmTimeout(self.timeout.as_secs()))
            }
        }
    }
}

//
// ================= Scripted =================
//

/// Mock model for development & testing
/// Replies with queued answers in order, then with a fixed fallback.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<String>>,
    fallback: String,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            fallback: "Thank you for your query. Our admissions team will follow up shortly.".to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// Every prompt received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn call(&self, prompt: &str) -> crate::Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let next = self
            .replies
            .lock()
            .map_err(|_| HelpdeskError::Llm("scripted model poisoned".to_string()))?
            .pop_front();

        Ok(next.unwrap_or_else(|| self.fallback.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StalledModel;

    #[async_trait]
    impl LanguageModel for StalledModel {
        async fn call(&self, _prompt: &str) -> crate::Result<String> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("too late".to_string())
        }
    }

    #[test]
    fn test_request_serialization() {
        let client = OllamaClient::new(&LlmConfig::default()).unwrap();
        let request = client.request_for("List the required documents for student admission.");

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama3");
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["num_predict"], 512);
        assert!(json["prompt"].as_str().unwrap().contains("required documents"));
    }

    #[test]
    fn test_response_parsing() {
        let parsed: GenerateResponse = serde_json::from_str(
            r#"{"model":"llama3","response":"loan","done":true,"done_reason":"stop"}"#,
        )
        .unwrap();
        assert_eq!(parsed.response, "loan");
        assert_eq!(parsed.done_reason.as_deref(), Some("stop"));
    }

    #[tokio::test]
    async fn test_scripted_replies_in_order() {
        let model = ScriptedModel::new(["document", "All documents look fine."]).with_fallback("n/a");

        assert_eq!(model.call("first").await.unwrap(), "document");
        assert_eq!(model.call("second").await.unwrap(), "All documents look fine.");
        assert_eq!(model.call("third").await.unwrap(), "n/a");
        assert_eq!(model.prompts(), vec!["first", "second", "third"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_reports_failure() {
        let model = TimeoutModel::new(StalledModel, Duration::from_secs(5));
        let err = model.call("hello").await.unwrap_err();
        assert!(matches!(err, HelpdeskError::LlmTimeout(5)));
    }

    #[tokio::test]
    async fn test_timeout_passes_through_fast_calls() {
        let model = TimeoutModel::new(ScriptedModel::new(["counselling"]), Duration::from_secs(5));
        tokio_test::assert_ok!(model.call("hello").await);
    }
}
