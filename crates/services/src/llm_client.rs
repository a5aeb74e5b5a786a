//! Shared chat-completion plumbing for the grading and generation oracles.
//!
//! Both oracles speak the same OpenAI-compatible wire format; only their
//! prompts and response parsing differ, so the HTTP side lives here once.

use std::env;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::LlmClientError;

#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl LlmConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("TUTOR_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url =
            env::var("TUTOR_AI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
        let model = env::var("TUTOR_AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    config: Option<LlmConfig>,
}

impl LlmClient {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(LlmConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<LlmConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Send one prompt and return the model's text reply.
    ///
    /// # Errors
    ///
    /// Returns `LlmClientError` when the client is disabled, the request
    /// fails, or the response carries no content.
    pub async fn complete(&self, prompt: &str) -> Result<String, LlmClientError> {
        let config = self.config.as_ref().ok_or(LlmClientError::Disabled)?;

        let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.to_string(),
            }],
            temperature: 0.2,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LlmClientError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(LlmClientError::EmptyResponse)?;

        Ok(content.trim().to_string())
    }
}

/// Strips a surrounding markdown code fence, if present.
///
/// Models asked for bare JSON still wrap it in ```json fences often enough
/// that tolerating them is cheaper than re-prompting.
#[must_use]
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    inner.trim()
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}
