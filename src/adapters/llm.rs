//! OpenAI-compatible chat-completion client.
//!
//! Sends `POST {base_url}/chat/completions` with a single user message and
//! returns `choices[0].message.content` untouched.

use crate::config::toml_config::LlmConfig;
use crate::domain::ports::ChatClient;
use crate::utils::error::{Result, WildlifeError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct ChatCompletionClient {
    client: Client,
    url: String,
    api_key: String,
    model: String,
    timeout_seconds: u64,
}

impl ChatCompletionClient {
    pub fn new(config: &LlmConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| WildlifeError::ConfigError {
                message: format!("Failed to build completion HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            url: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key,
            model: config.model.clone(),
            timeout_seconds: config.timeout_seconds,
        })
    }
}

fn extract_content(response: ChatResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| WildlifeError::Generation {
            message: "completion response missing choices[0].message.content".to_string(),
        })
}

#[async_trait]
impl ChatClient for ChatCompletionClient {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            max_tokens,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!("POST {} (model {}, max_tokens {})", self.url, self.model, max_tokens);

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| match WildlifeError::from_transport(&self.url, self.timeout_seconds, e) {
                WildlifeError::Network { message, .. } => WildlifeError::Generation {
                    message: format!("completion request failed: {}", message),
                },
                other => other,
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_string());
            return Err(WildlifeError::Generation {
                message: format!("completion service returned {}: {}", status, error_body),
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                WildlifeError::Timeout {
                    url: self.url.clone(),
                    seconds: self.timeout_seconds,
                }
            } else {
                WildlifeError::Generation {
                    message: format!("completion response parse failed: {}", e),
                }
            }
        })?;

        extract_content(parsed)
    }
}
