//! Core `ScriptWriter` trait and the `ApiScriptWriter` implementation.
//!
//! `ApiScriptWriter` calls any OpenAI-compatible `/v1/chat/completions`
//! endpoint. All connection details come from [`LlmConfig`]; nothing is
//! hardcoded. One request per script, no retry.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::LlmConfig;
use crate::llm::parse::parse_script;
use crate::llm::prompt::PromptBuilder;
use crate::tier::Tier;
use crate::video::CaptionLine;

// ---------------------------------------------------------------------------
// LlmError
// ---------------------------------------------------------------------------

/// Errors that can occur while generating a script.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No API key configured.
    #[error("LLM gateway is not configured (missing API key)")]
    NotConfigured,

    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("LLM request timed out")]
    Timeout,

    /// The gateway answered with a non-success status.
    #[error("LLM gateway returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The reply could not be turned into a valid script.
    #[error("failed to parse LLM response: {0}")]
    Parse(String),

    /// The reply carried no text content.
    #[error("LLM returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

/// Narration text plus its timed caption lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub narration: String,
    pub captions: Vec<CaptionLine>,
}

// ---------------------------------------------------------------------------
// ScriptWriter trait
// ---------------------------------------------------------------------------

/// Produces the onboarding narration for a tier.
///
/// Implementors must be `Send + Sync` so they can be shared as
/// `Arc<dyn ScriptWriter>`.
#[async_trait]
pub trait ScriptWriter: Send + Sync {
    async fn write_script(&self, tier: Tier) -> Result<Script, LlmError>;
}

// ---------------------------------------------------------------------------
// ApiScriptWriter
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/v1/chat/completions` endpoint.
pub struct ApiScriptWriter {
    client: reqwest::Client,
    config: LlmConfig,
}

impl ApiScriptWriter {
    /// Build from config. The HTTP client carries the per-request timeout
    /// from `config.timeout_secs`; a default client is used if the builder
    /// fails.
    pub fn from_config(config: &LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    fn api_key(&self) -> Option<&str> {
        self.config.api_key.as_deref().filter(|k| !k.is_empty())
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ScriptWriter for ApiScriptWriter {
    async fn write_script(&self, tier: Tier) -> Result<Script, LlmError> {
        let key = self.api_key().ok_or(LlmError::NotConfigured)?;
        let (system_msg, user_msg) = PromptBuilder::new(tier).build_chat();

        let body = serde_json::json!({
            "model":       self.config.model,
            "messages": [
                { "role": "system", "content": system_msg },
                { "role": "user",   "content": user_msg   }
            ],
            "stream":      false,
            "temperature": self.config.temperature
        });

        log::debug!("llm: requesting {tier} script from {}", self.config.model);
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(LlmError::EmptyResponse)?;

        parse_script(content)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
