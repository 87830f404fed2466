use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerationConfig {
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl GenerationConfig {
    pub fn new(temperature: f32, max_output_tokens: u32) -> Self {
        Self {
            temperature: Some(temperature),
            max_output_tokens: Some(max_output_tokens),
        }
    }
}

/// A text-generation capability. Implementations may fail for any reason;
/// callers go through [`LlmService`], which never surfaces those failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str, config: GenerationConfig) -> Result<String>;
}

/// Result of interpreting capability output under an expected contract.
#[derive(Debug, Clone, PartialEq)]
pub enum CapabilityOutput<T> {
    Parsed(T),
    Malformed(String),
}

impl<T> CapabilityOutput<T> {
    pub fn parsed(self) -> Option<T> {
        match self {
            CapabilityOutput::Parsed(value) => Some(value),
            CapabilityOutput::Malformed(_) => None,
        }
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// Client for any OpenAI-compatible chat-completions endpoint.
#[derive(Clone)]
pub struct ChatCompletionClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl ChatCompletionClient {
    pub fn new(client: Client, api_url: String, api_key: String, model: String) -> Self {
        Self {
            client,
            api_url,
            api_key,
            model,
        }
    }
}

#[async_trait]
impl LanguageModel for ChatCompletionClient {
    async fn generate(&self, prompt: &str, config: GenerationConfig) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: config.temperature,
            max_tokens: config.max_output_tokens,
        };

        let res = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(Error::Llm(format!("LLM API error {}: {}", status, text)));
        }

        let body: ChatResponse = res.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| Error::Llm("LLM returned empty content".to_string()))
    }
}

/// Wraps an optional [`LanguageModel`] with a bounded timeout. Every failure,
/// including a missing credential, is logged and reported as `None`.
#[derive(Clone)]
pub struct LlmService {
    model: Option<Arc<dyn LanguageModel>>,
    timeout: Duration,
}

impl LlmService {
    pub fn new(model: Option<Arc<dyn LanguageModel>>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    pub fn disabled() -> Self {
        Self {
            model: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.model.is_some()
    }

    pub async fn generate(&self, purpose: &str, prompt: &str, config: GenerationConfig) -> Option<String> {
        let Some(model) = self.model.as_ref() else {
            tracing::debug!(purpose, "No LLM API key configured, using fallback");
            return None;
        };

        match tokio::time::timeout(self.timeout, model.generate(prompt, config)).await {
            Ok(Ok(text)) => Some(text),
            Ok(Err(e)) => {
                tracing::warn!(purpose, error = %e, "LLM call failed, using fallback");
                None
            }
            Err(_) => {
                tracing::warn!(purpose, timeout_secs = self.timeout.as_secs(), "LLM call timed out, using fallback");
                None
            }
        }
    }
}
