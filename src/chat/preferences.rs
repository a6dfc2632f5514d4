//! Scripted preference-collection phase.
//!
//! The first replies of every conversation are a fixed question sequence,
//! enforced in code: the phase is derived from how many user messages the
//! transcript holds, and while collecting, the next agent reply is the
//! question at that index. No model or tool call happens until the list is
//! exhausted. The final entry is the handoff line that moves the
//! conversation into the free phase.

/// Ordered onboarding script. Index 0 doubles as the opening greeting.
pub const PREFERENCE_QUESTIONS: [&str; 6] = [
    "First, what's your preferred tone of voice (e.g., formal, casual, enthusiastic)?",
    "Got it. What's your preferred response format (e.g., bullet points, paragraphs)?",
    "Okay. What's your language preference?",
    "Next, what's your interaction style (e.g., concise, detailed)?",
    "Almost done! What are your preferred news topics?",
    "Thank you! I have all your preferences. What news can I get for you?",
];

/// Where a conversation stands in the onboarding script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Still collecting; the contained index is the next scripted reply.
    Collecting(usize),
    /// Script exhausted; turns are model-driven.
    Free,
}

/// Derive the phase from the number of user messages seen so far.
pub fn phase(user_messages: usize) -> Phase {
    if user_messages < PREFERENCE_QUESTIONS.len() {
        Phase::Collecting(user_messages)
    } else {
        Phase::Free
    }
}

/// The scripted reply owed after the `user_messages`-th user message, if
/// the conversation is still collecting.
pub fn next_scripted_question(user_messages: usize) -> Option<&'static str> {
    PREFERENCE_QUESTIONS.get(user_messages).copied()
}
