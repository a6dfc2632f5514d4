//! Tools the model may call, and the registry that dispatches them.

mod news;
mod summarize;

pub use news::FetchNews;
pub use summarize::SummarizeNews;

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("{0}")]
    Execution(#[from] anyhow::Error),
}

/// A callable tool exposed to the model.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name, as presented to the model.
    fn name(&self) -> &str;

    /// Description shown to the model when deciding what to call.
    fn description(&self) -> &str;

    /// JSON schema for the tool's parameters.
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, args: Value) -> anyhow::Result<String>;
}

/// Registry of available tools, resolved by name.
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool under its own name. Last registration wins.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Look up a tool by name and run it.
    pub async fn execute(&self, name: &str, args: Value) -> Result<String, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        Ok(tool.execute(args).await?)
    }

    /// Tool definitions in chat-completions `tools` format, passed to the
    /// provider on every invocation so it knows what it may call.
    pub fn schemas(&self) -> Vec<Value> {
        self.tools
            .values()
            .map(|tool| {
                json!({
                    "type": "function",
                    "function": {
                        "name": tool.name(),
                        "description": tool.description(),
                        "parameters": tool.parameters_schema(),
                    }
                })
            })
            .collect()
    }

    /// Name/description pairs for prompt building.
    pub fn list_tools(&self) -> Vec<(&str, &str)> {
        self.tools
            .values()
            .map(|tool| (tool.name(), tool.description()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
