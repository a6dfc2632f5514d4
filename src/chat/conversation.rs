//! A single conversation's two logs.
//!
//! The provider log is what the model sees (system prompt, tool traffic
//! included); the transcript is the user-safe projection served over HTTP.
//! Both are append-only for the lifetime of the conversation; `reset`
//! restores the initial post-startup state.

use serde::{Deserialize, Serialize};

use crate::llm::ChatMessage;

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Agent,
}

/// A user-visible transcript entry. Never carries system prompts, tool
/// messages, or tool-call metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub author: Author,
    pub message: String,
}

impl TranscriptEntry {
    pub fn user(message: impl Into<String>) -> Self {
        Self {
            author: Author::User,
            message: message.into(),
        }
    }

    pub fn agent(message: impl Into<String>) -> Self {
        Self {
            author: Author::Agent,
            message: message.into(),
        }
    }
}

/// One conversation: provider log plus display transcript.
pub struct Conversation {
    system_prompt: String,
    greeting: String,
    provider_log: Vec<ChatMessage>,
    transcript: Vec<TranscriptEntry>,
}

impl Conversation {
    /// Seed a fresh conversation: the provider log opens with the system
    /// prompt and the greeting (as an assistant message, so later model
    /// calls see it); the transcript opens with the greeting alone.
    pub fn new(system_prompt: impl Into<String>, greeting: impl Into<String>) -> Self {
        let system_prompt = system_prompt.into();
        let greeting = greeting.into();
        let mut conversation = Self {
            system_prompt,
            greeting,
            provider_log: Vec::new(),
            transcript: Vec::new(),
        };
        conversation.reset();
        conversation
    }

    pub fn append_provider_message(&mut self, message: ChatMessage) {
        self.provider_log.push(message);
    }

    pub fn append_display_message(&mut self, entry: TranscriptEntry) {
        self.transcript.push(entry);
    }

    pub fn provider_log(&self) -> &[ChatMessage] {
        &self.provider_log
    }

    /// A copy of the display transcript in order.
    pub fn snapshot_display(&self) -> Vec<TranscriptEntry> {
        self.transcript.clone()
    }

    /// Number of user-authored transcript entries, which is also the number
    /// of completed preference answers while collecting.
    pub fn user_message_count(&self) -> usize {
        self.transcript
            .iter()
            .filter(|e| e.author == Author::User)
            .count()
    }

    /// Restore both logs to their initial state.
    pub fn reset(&mut self) {
        self.provider_log.clear();
        self.transcript.clear();
        self.provider_log
            .push(ChatMessage::system(self.system_prompt.clone()));
        self.provider_log
            .push(ChatMessage::assistant(self.greeting.clone()));
        self.transcript
            .push(TranscriptEntry::agent(self.greeting.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;

    fn conversation() -> Conversation {
        Conversation::new("system prompt", "hello, what do you like?")
    }

    #[test]
    fn starts_with_system_and_greeting() {
        let convo = conversation();

        let log = convo.provider_log();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].role, Role::System);
        assert_eq!(log[0].content.as_deref(), Some("system prompt"));
        assert_eq!(log[1].role, Role::Assistant);

        let transcript = convo.snapshot_display();
        assert_eq!(
            transcript,
            vec![TranscriptEntry::agent("hello, what do you like?")]
        );
    }

    #[test]
    fn snapshot_is_idempotent() {
        let mut convo = conversation();
        convo.append_display_message(TranscriptEntry::user("hi"));

        assert_eq!(convo.snapshot_display(), convo.snapshot_display());
    }

    #[test]
    fn counts_user_messages_only() {
        let mut convo = conversation();
        assert_eq!(convo.user_message_count(), 0);

        convo.append_display_message(TranscriptEntry::user("one"));
        convo.append_display_message(TranscriptEntry::agent("reply"));
        convo.append_display_message(TranscriptEntry::user("two"));
        assert_eq!(convo.user_message_count(), 2);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut convo = conversation();
        convo.append_provider_message(ChatMessage::user("hi"));
        convo.append_display_message(TranscriptEntry::user("hi"));
        convo.append_display_message(TranscriptEntry::agent("hello"));

        convo.reset();

        assert_eq!(convo.provider_log().len(), 2);
        assert_eq!(
            convo.snapshot_display(),
            vec![TranscriptEntry::agent("hello, what do you like?")]
        );
    }
}
