//! Runtime configuration loaded from the environment (and `.env`).

use crate::error::HelpdeskError;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Settings for the language model client.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3".to_string(),
            temperature: 0.7,
            max_tokens: 512,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Top-level configuration for the helpdesk binaries.
#[derive(Debug, Clone)]
pub struct HelpdeskConfig {
    pub llm: LlmConfig,
    /// Postgres connection string; the in-memory store is used when absent.
    pub database_url: Option<String>,
    pub port: u16,
}

impl HelpdeskConfig {
    pub fn from_env() -> crate::Result<Self> {
        dotenv::dotenv().ok();

        let defaults = LlmConfig::default();
        let llm = LlmConfig {
            base_url: env::var("OLLAMA_BASE_URL").unwrap_or(defaults.base_url),
            model: env::var("OLLAMA_MODEL").unwrap_or(defaults.model),
            temperature: parse_var("LLM_TEMPERATURE", defaults.temperature)?,
            max_tokens: parse_var("LLM_MAX_TOKENS", defaults.max_tokens)?,
            timeout: model_timeout(parse_var("LLM_TIMEOUT_SECS", defaults.timeout.as_secs())?)?,
        };

        let database_url = env::var("POSTGRES_URL")
            .or_else(|_| env::var("DATABASE_URL"))
            .ok()
            .filter(|url| !url.trim().is_empty());

        let port = match env::var("PORT").or_else(|_| env::var("API_PORT")) {
            Ok(raw) => parse_value("PORT", &raw)?,
            Err(_) => 8080,
        };

        Ok(Self {
            llm,
            database_url,
            port,
        })
    }
}

/// A zero timeout would fail every model call before it starts.
fn model_timeout(secs: u64) -> crate::Result<Duration> {
    if secs == 0 {
        return Err(HelpdeskError::Config(
            "LLM_TIMEOUT_SECS must be at least 1".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

fn parse_var<T: FromStr>(key: &str, default: T) -> crate::Result<T> {
    match env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> crate::Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| HelpdeskError::Config(format!("{} has an invalid value: {:?}", key, raw)))
}
