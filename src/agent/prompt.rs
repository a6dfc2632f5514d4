//! System prompt for the news agent.

use crate::tools::ToolRegistry;

/// Build the system prompt with tool definitions and the preference
/// protocol. The onboarding questions themselves are scripted in code; the
/// prompt tells the model how to use the answers it can see in the history.
pub fn build_system_prompt(tools: &ToolRegistry) -> String {
    let tool_descriptions = tools
        .list_tools()
        .iter()
        .map(|(name, description)| format!("- **{}**: {}", name, description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a helpful assistant that provides news updates tailored to the user's preferences.

## Preferences

The conversation opens with five onboarding questions covering the user's:
- preferred tone of voice
- preferred response format
- language preference
- interaction style
- preferred news topics

The questions and the user's answers are visible earlier in this conversation. Honor every answer in each reply: write in the requested tone and language, use the requested format, and match the requested level of detail.

## Your Capabilities

You have access to the following tools:
{tool_descriptions}

## Rules and Guidelines

1. **Fetch before you report** - Use fetch_news for any news request; never invent headlines or facts.

2. **Summarize long material** - When fetched articles are long, pass them through summarize_news before answering.

3. **Handle tool errors gracefully** - If a tool result reports a failure, tell the user what went wrong and suggest trying again; do not retry endlessly.

4. **Stay on topic** - Lean toward the user's preferred news topics unless they explicitly ask for something else.

If you need to use a tool, respond with a tool call. The system will execute it and return the result."#,
        tool_descriptions = tool_descriptions
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::Tool;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct NamedTool;

    #[async_trait]
    impl Tool for NamedTool {
        fn name(&self) -> &str {
            "fetch_news"
        }
        fn description(&self) -> &str {
            "Search recent news"
        }
        fn parameters_schema(&self) -> Value {
            json!({"type": "object", "properties": {}})
        }
        async fn execute(&self, _args: Value) -> anyhow::Result<String> {
            Ok(String::new())
        }
    }

    #[test]
    fn prompt_lists_registered_tools() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(NamedTool));

        let prompt = build_system_prompt(&registry);
        assert!(prompt.contains("**fetch_news**: Search recent news"));
        assert!(prompt.contains("preferred news topics"));
    }
}
