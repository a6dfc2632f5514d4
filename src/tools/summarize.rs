//! `summarize_news` tool: condense article text with one auxiliary model call.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::llm::{ChatMessage, LlmClient};

use super::Tool;

const SUMMARIZE_INSTRUCTION: &str = "You summarize news articles. Produce a short briefing of the articles you are given: key facts first, one short paragraph per story, no boilerplate.";

/// Summarizes article text via a single tool-free model call.
pub struct SummarizeNews {
    llm: Arc<dyn LlmClient>,
    model: String,
}

impl SummarizeNews {
    pub fn new(llm: Arc<dyn LlmClient>, model: String) -> Self {
        Self { llm, model }
    }
}

#[async_trait]
impl Tool for SummarizeNews {
    fn name(&self) -> &str {
        "summarize_news"
    }

    fn description(&self) -> &str {
        "Summarize a block of news article text into a short briefing. Pass the raw output of fetch_news."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "articles_text": {
                    "type": "string",
                    "description": "The article text to summarize"
                }
            },
            "required": ["articles_text"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let articles_text = args["articles_text"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'articles_text' argument"))?;

        let messages = [
            ChatMessage::system(SUMMARIZE_INSTRUCTION),
            ChatMessage::user(articles_text),
        ];

        match self.llm.chat_completion(&self.model, &messages, None).await {
            Ok(response) => Ok(response
                .content
                .unwrap_or_else(|| "The summarizer returned no text.".to_string())),
            Err(e) => Ok(format!("Failed to summarize articles: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedLlm {
        reply: Option<String>,
        fail: bool,
    }

    #[async_trait]
    impl LlmClient for FixedLlm {
        async fn chat_completion(
            &self,
            _model: &str,
            messages: &[ChatMessage],
            tools: Option<&[Value]>,
        ) -> anyhow::Result<ChatMessage> {
            // The auxiliary call must be tool-free and carry the input text.
            assert!(tools.is_none());
            assert_eq!(messages.len(), 2);
            if self.fail {
                anyhow::bail!("provider down");
            }
            Ok(ChatMessage::assistant(self.reply.clone().unwrap_or_default()))
        }
    }

    #[tokio::test]
    async fn returns_the_model_summary() {
        let tool = SummarizeNews::new(
            Arc::new(FixedLlm {
                reply: Some("Three stories about rockets.".to_string()),
                fail: false,
            }),
            "test-model".to_string(),
        );

        let out = tool
            .execute(json!({"articles_text": "long article text"}))
            .await
            .unwrap();
        assert_eq!(out, "Three stories about rockets.");
    }

    #[tokio::test]
    async fn provider_failure_becomes_tool_output() {
        let tool = SummarizeNews::new(
            Arc::new(FixedLlm {
                reply: None,
                fail: true,
            }),
            "test-model".to_string(),
        );

        let out = tool
            .execute(json!({"articles_text": "text"}))
            .await
            .unwrap();
        assert!(out.contains("Failed to summarize"));
    }

    #[tokio::test]
    async fn missing_argument_is_an_error() {
        let tool = SummarizeNews::new(
            Arc::new(FixedLlm {
                reply: None,
                fail: false,
            }),
            "test-model".to_string(),
        );

        let err = tool.execute(json!({})).await.unwrap_err();
        assert!(err.to_string().contains("articles_text"));
    }
}
