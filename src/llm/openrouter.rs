//! OpenRouter-backed chat-completions client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ChatMessage, LlmClient};

const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Production [`LlmClient`] talking to OpenRouter.
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

impl OpenRouterClient {
    pub fn new(api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to build HTTP client");

        Self { client, api_key }
    }
}

#[async_trait]
impl LlmClient for OpenRouterClient {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: Option<&[Value]>,
    ) -> anyhow::Result<ChatMessage> {
        let mut payload = json!({
            "model": model,
            "messages": messages,
        });

        if let Some(tools) = tools {
            if !tools.is_empty() {
                let obj = payload.as_object_mut().expect("payload is an object");
                obj.insert("tools".to_string(), json!(tools));
                obj.insert("tool_choice".to_string(), json!("auto"));
            }
        }

        let response = self
            .client
            .post(OPENROUTER_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("chat completion request failed ({}): {}", status, body);
        }

        let body: Value = response.json().await?;
        if let Some(error) = body.get("error") {
            anyhow::bail!("provider error: {}", error);
        }

        let parsed: CompletionResponse = serde_json::from_value(body)?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| anyhow::anyhow!("provider returned no choices"))
    }
}
