//! Core engine: one turn of conversation, including the model/tool cycle.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::chat::{next_scripted_question, SessionStore, TranscriptEntry};
use crate::llm::{ChatMessage, LlmClient, ToolCall};
use crate::tools::ToolRegistry;

/// Agent reply when the model provider itself is unreachable.
pub const PROVIDER_FAILURE_REPLY: &str =
    "Sorry, I couldn't reach the language model just now. Please try again in a moment.";

/// Agent reply when the model keeps requesting tools past the iteration cap.
pub const TOOL_LOOP_REPLY: &str =
    "Sorry, I wasn't able to complete that request. Please try rephrasing it.";

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("userInput must not be empty")]
    EmptyInput,

    #[error("a turn is already in progress for this conversation")]
    TurnInProgress,
}

/// Drives conversations: scripted onboarding first, then a bounded
/// model/tool cycle per turn.
pub struct ChatEngine {
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
    sessions: SessionStore,
    model: String,
    max_iterations: usize,
}

impl ChatEngine {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        tools: ToolRegistry,
        sessions: SessionStore,
        model: String,
        max_iterations: usize,
    ) -> Self {
        Self {
            llm,
            tools,
            sessions,
            model,
            max_iterations,
        }
    }

    /// Process one user utterance and return the new agent transcript entry.
    ///
    /// Exactly one turn runs per conversation at a time; a second caller
    /// gets `TurnInProgress` instead of queueing.
    pub async fn handle_turn(
        &self,
        session_id: Uuid,
        user_text: &str,
    ) -> Result<TranscriptEntry, EngineError> {
        let user_text = user_text.trim();
        if user_text.is_empty() {
            return Err(EngineError::EmptyInput);
        }

        let conversation = self.sessions.get_or_create(session_id).await;
        let mut convo = conversation
            .try_lock()
            .map_err(|_| EngineError::TurnInProgress)?;

        // Record the utterance before any provider call so it stays
        // recorded even if the rest of the turn fails.
        convo.append_provider_message(ChatMessage::user(user_text));
        convo.append_display_message(TranscriptEntry::user(user_text));

        let reply = match next_scripted_question(convo.user_message_count()) {
            Some(question) => {
                debug!("onboarding reply served from script");
                question.to_string()
            }
            None => self.run_model_cycle(&mut convo).await,
        };

        convo.append_provider_message(ChatMessage::assistant(reply.clone()));
        let entry = TranscriptEntry::agent(reply);
        convo.append_display_message(entry.clone());
        Ok(entry)
    }

    /// The current display transcript for a session.
    pub async fn snapshot(&self, session_id: Uuid) -> Vec<TranscriptEntry> {
        let conversation = self.sessions.get_or_create(session_id).await;
        let convo = conversation.lock().await;
        convo.snapshot_display()
    }

    /// Restore a session to its initial greeting state.
    pub async fn reset(&self, session_id: Uuid) -> Result<(), EngineError> {
        let conversation = self.sessions.get_or_create(session_id).await;
        let mut convo = conversation
            .try_lock()
            .map_err(|_| EngineError::TurnInProgress)?;
        convo.reset();
        Ok(())
    }

    /// Run the model/tool cycle to a terminal reply.
    ///
    /// Cycle messages accumulate in a scratch suffix and are committed to
    /// the conversation only once a terminal response arrives, so a failed
    /// provider call or an exceeded cap leaves no partial assistant/tool
    /// entries behind.
    async fn run_model_cycle(&self, convo: &mut crate::chat::Conversation) -> String {
        let schemas = self.tools.schemas();
        let mut messages = convo.provider_log().to_vec();
        let mut scratch: Vec<ChatMessage> = Vec::new();

        for iteration in 0..self.max_iterations {
            debug!("model cycle iteration {}/{}", iteration + 1, self.max_iterations);

            let response = match self
                .llm
                .chat_completion(&self.model, &messages, Some(&schemas))
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    error!(error = %e, "model provider call failed, aborting turn");
                    return PROVIDER_FAILURE_REPLY.to_string();
                }
            };

            if response.has_tool_calls() {
                let tool_calls = response.tool_calls.clone().unwrap_or_default();
                let assistant =
                    ChatMessage::assistant_with_tools(response.content.clone(), tool_calls.clone());
                messages.push(assistant.clone());
                scratch.push(assistant);

                // Execute in the order the provider listed the calls; later
                // calls may depend on earlier results, and the model must
                // see every result before it is asked again.
                for call in &tool_calls {
                    let result = self.execute_tool_call(call).await;
                    let tool_message = ChatMessage::tool_result(call.id.clone(), result);
                    messages.push(tool_message.clone());
                    scratch.push(tool_message);
                }
                continue;
            }

            match response.content {
                Some(content) if !content.is_empty() => {
                    for message in scratch {
                        convo.append_provider_message(message);
                    }
                    return content;
                }
                _ => {
                    error!("model returned neither content nor tool calls, aborting turn");
                    return PROVIDER_FAILURE_REPLY.to_string();
                }
            }
        }

        warn!(
            "tool loop exceeded {} iterations, aborting turn",
            self.max_iterations
        );
        TOOL_LOOP_REPLY.to_string()
    }

    /// Execute one tool call. Failures, including unknown tool names,
    /// become readable tool results the model can react to.
    async fn execute_tool_call(&self, call: &ToolCall) -> String {
        info!(tool = %call.function.name, "executing tool call");
        match self
            .tools
            .execute(&call.function.name, call.parsed_arguments())
            .await
        {
            Ok(result) => result,
            Err(e) => format!("Error: {}", e),
        }
    }
}
