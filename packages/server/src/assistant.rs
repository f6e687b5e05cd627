//! Chat-completion client for the assistant side panel and example sentences.
//!
//! Plain request/response over an OpenAI-compatible endpoint. Callers must
//! not hold the session lock while a request is in flight.

use std::collections::VecDeque;
use std::time::Duration;

use parola_algo::VocabCard;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::sleep;
use tracing::warn;

use crate::config::env_string;

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_API_ENDPOINT: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_MS: u64 = 60_000;
const MAX_RETRIES: usize = 3;
const BASE_BACKOFF_MS: u64 = 200;

pub const ASSISTANT_SYSTEM_PROMPT: &str =
    "You are a patient language tutor. Answer briefly and include the target-language word when useful.";

const EXAMPLE_SYSTEM_PROMPT: &str =
    "You write one short, natural example sentence for a vocabulary word, followed by its translation on a new line.";

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_endpoint: String,
    pub timeout: Duration,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl AssistantConfig {
    pub fn from_env() -> Self {
        let api_key = env_string("LLM_API_KEY");
        let model = env_string("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let api_endpoint = normalize_endpoint(
            env_string("LLM_API_ENDPOINT")
                .or_else(|| env_string("LLM_BASE_URL"))
                .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string()),
        );
        let timeout = Duration::from_millis(
            env_string("LLM_TIMEOUT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_MS),
        );

        Self {
            api_key,
            model,
            api_endpoint,
            timeout,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".into(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".into(), content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: "assistant".into(), content: content.into() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub model: Option<String>,
    pub choices: Vec<ChatChoice>,
}

impl ChatResponse {
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("assistant not configured: {0}")]
    NotConfigured(&'static str),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: reqwest::StatusCode, body: String },
    #[error("JSON decode failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("empty response")]
    EmptyChoices,
}

/// Bounded conversation log; the oldest message goes first once full
#[derive(Debug, Clone)]
pub struct ChatLog {
    messages: VecDeque<ChatMessage>,
    limit: usize,
}

impl ChatLog {
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            messages: VecDeque::with_capacity(limit),
            limit,
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        if self.messages.len() == self.limit {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }
}

#[derive(Clone)]
pub struct AssistantClient {
    config: AssistantConfig,
    client: reqwest::Client,
}

impl AssistantClient {
    pub fn new(config: AssistantConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { config, client }
    }

    pub fn is_available(&self) -> bool {
        self.config.api_key.as_deref().is_some_and(|v| !v.trim().is_empty())
            && !self.config.model.trim().is_empty()
            && !self.config.api_endpoint.trim().is_empty()
    }

    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<ChatResponse, AssistantError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or(AssistantError::NotConfigured("LLM_API_KEY"))?;

        let url = format!("{}/chat/completions", self.config.api_endpoint.trim_end_matches('/'));
        let payload = serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "stream": false
        });

        self.post_with_retry(&url, api_key, &payload).await
    }

    /// Reply text for a system prompt followed by the given conversation
    pub async fn reply(&self, system: &str, history: &[ChatMessage]) -> Result<String, AssistantError> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(system));
        messages.extend_from_slice(history);
        let response = self.chat(&messages).await?;
        response
            .first_content()
            .map(|s| s.trim().to_string())
            .ok_or(AssistantError::EmptyChoices)
    }

    pub async fn example_sentence(&self, card: &VocabCard) -> Result<String, AssistantError> {
        let prompt = match card.part_of_speech.as_deref() {
            Some(pos) => format!("Word: {} ({pos}), meaning: {}", card.text, card.translation),
            None => format!("Word: {}, meaning: {}", card.text, card.translation),
        };
        self.reply(EXAMPLE_SYSTEM_PROMPT, &[ChatMessage::user(prompt)]).await
    }

    async fn post_with_retry(
        &self,
        url: &str,
        api_key: &str,
        payload: &serde_json::Value,
    ) -> Result<ChatResponse, AssistantError> {
        let mut last_error: Option<AssistantError> = None;

        for retry in 0..=MAX_RETRIES {
            match self.client.post(url).bearer_auth(api_key).json(payload).send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        let bytes = resp.bytes().await?;
                        return serde_json::from_slice(&bytes).map_err(|e| {
                            tracing::error!(error = %e, "failed to parse completion response");
                            AssistantError::Json(e)
                        });
                    }
                    let body = resp.text().await.unwrap_or_default();
                    let err = AssistantError::HttpStatus { status, body };
                    if retry < MAX_RETRIES && is_retryable(status) {
                        warn!(retry, ?status, "completion request failed, retrying");
                        sleep(backoff(retry)).await;
                        last_error = Some(err);
                        continue;
                    }
                    return Err(err);
                }
                Err(e) => {
                    let err = AssistantError::Request(e);
                    if retry < MAX_RETRIES {
                        warn!(retry, "completion request error, retrying");
                        sleep(backoff(retry)).await;
                        last_error = Some(err);
                        continue;
                    }
                    return Err(err);
                }
            }
        }
        Err(last_error.unwrap_or(AssistantError::NotConfigured("unknown")))
    }
}

fn backoff(retry: usize) -> Duration {
    Duration::from_millis(BASE_BACKOFF_MS * (1 << retry))
}

fn normalize_endpoint(endpoint: String) -> String {
    let trimmed = endpoint.trim().trim_end_matches('/');
    if trimmed.ends_with("/v1") || trimmed.contains("/v1/") {
        trimmed.to_string()
    } else {
        format!("{trimmed}/v1")
    }
}

fn is_retryable(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::TOO_MANY_REQUESTS
        || status == reqwest::StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
}
