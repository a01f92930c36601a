//! OpenAI chat-completions client.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use super::{ChatMessage, LlmClient, LlmResponse, Role};
use crate::errors::LlmError;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

pub struct OpenAiClient {
    pub model: String,
    pub api_key: String,
    pub temperature: f32,
    pub timeout: Duration,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(model: String, api_key: String, temperature: f32, timeout: Duration) -> Self {
        Self {
            model,
            api_key,
            temperature,
            timeout,
            client: reqwest::Client::new(),
        }
    }

    fn connection_error(&self, message: impl Into<String>) -> LlmError {
        LlmError::Connection {
            provider: "openai".to_string(),
            message: message.into(),
        }
    }
}

fn role_str(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<LlmResponse, LlmError> {
        let payload: Vec<serde_json::Value> = messages
            .iter()
            .map(|m| json!({ "role": role_str(m.role), "content": m.content }))
            .collect();

        let body = json!({
            "model": self.model,
            "messages": payload,
            "temperature": self.temperature,
        });

        let resp = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout {
                        provider: "openai".to_string(),
                        timeout: self.timeout,
                    }
                } else {
                    self.connection_error(e.to_string())
                }
            })?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(LlmError::RateLimited {
                provider: "openai".to_string(),
                retry_after,
            });
        }
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(self.connection_error(format!("status {status}: {text}")));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| self.connection_error(format!("invalid response body: {e}")))?;

        let text = json
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| self.connection_error("response missing choices[0].message.content"))?
            .to_string();

        Ok(LlmResponse {
            text,
            provider: "openai".to_string(),
            model: self.model.clone(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
