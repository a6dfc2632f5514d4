//! LLM provider integration.
//!
//! Message and tool-call types follow the OpenAI chat-completions wire
//! format so one client works against any compatible provider. The
//! [`LlmClient`] trait is the seam the engine (and tests) program against.

mod openrouter;

pub use openrouter::OpenRouterClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role of a message in the provider-facing log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A single entry in the provider-facing message log.
///
/// `tool_calls` is only present on assistant messages that request tool
/// execution; `tool_call_id` only on tool-role messages, linking a result
/// back to its request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn assistant_with_tools(content: Option<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content,
            tool_calls: Some(tool_calls),
            tool_call_id: None,
        }
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    /// Whether this message carries at least one tool call.
    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls.as_ref().is_some_and(|c| !c.is_empty())
    }
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Opaque id, unique within the turn.
    pub id: String,
    #[serde(rename = "type")]
    pub call_type: String,
    pub function: FunctionCall,
}

/// The function half of a tool call: name plus JSON-encoded arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON object, serialized as a string per the chat-completions format.
    pub arguments: String,
}

impl ToolCall {
    /// Parse the argument string into a JSON value. Malformed arguments
    /// become `Null` so the tool itself can report the missing fields.
    pub fn parsed_arguments(&self) -> Value {
        serde_json::from_str(&self.function.arguments).unwrap_or(Value::Null)
    }
}

/// Client for an OpenAI-compatible chat-completions provider.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send the full message log (plus tool schemas, when tools are enabled
    /// for this call) and return the assistant message the model produced.
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: Option<&[Value]>,
    ) -> anyhow::Result<ChatMessage>;
}
