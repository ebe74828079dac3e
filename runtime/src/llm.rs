// Copyright 2026 Paperflow Contributors
// SPDX-License-Identifier: Apache-2.0

//! Chat-completion client for the answer pipeline.

use async_trait::async_trait;
use paperflow::{Completion, CompletionMessage};
use serde::{Deserialize, Serialize};

use crate::acquisition::http_client::HttpClient;
use crate::config::CompletionConfig;

/// Errors from the completion endpoint.
#[derive(thiserror::Error, Debug)]
pub enum CompletionError {
    #[error("completion API key is not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("completion API returned no choices")]
    EmptyResponse,

    #[error("invalid completion response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that turns a prompt into a completion.
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<Completion, CompletionError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: CompletionMessage,
}

/// OpenAI-compatible chat-completions client (non-streaming).
pub struct ChatCompletionClient {
    http: HttpClient,
    config: CompletionConfig,
}

impl ChatCompletionClient {
    pub fn new(http: HttpClient, config: CompletionConfig) -> Self {
        Self { http, config }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl Completer for ChatCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<Completion, CompletionError> {
        if self.config.api_key.is_empty() {
            return Err(CompletionError::MissingApiKey);
        }
        tracing::debug!(model = %self.config.model, prompt_chars = prompt.chars().count(), "requesting completion");

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };

        let resp = self
            .http
            .inner()
            .post(&self.config.url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message: api_error_message(&body)
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string()),
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body)?;
        let message = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(CompletionError::EmptyResponse)?
            .message;
        Ok(Completion::from(message))
    }
}

/// `error.message` of an OpenAI-style error body.
fn api_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message() {
        assert_eq!(
            api_error_message(r#"{"error":{"message":"quota exceeded","code":"429"}}"#).as_deref(),
            Some("quota exceeded")
        );
        assert!(api_error_message("<html>").is_none());
        assert!(api_error_message(r#"{"error":"flat"}"#).is_none());
    }

    #[test]
    fn test_request_shape() {
        let req = ChatRequest {
            model: "deepseek-r1",
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            stream: false,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "deepseek-r1",
                "messages": [{"role": "user", "content": "hi"}],
                "stream": false
            })
        );
    }
}
