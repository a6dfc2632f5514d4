//! Agent module - the conversation engine.
//!
//! Each turn follows a "tools in a loop" pattern once onboarding is done:
//! 1. Append the user utterance to both logs
//! 2. Serve a scripted onboarding question, or call the LLM with the tools
//! 3. If the LLM requests tool calls, execute them in order and feed the
//!    results back
//! 4. Repeat until the LLM produces a final reply or the cap is reached

mod agent_loop;
mod prompt;

pub use agent_loop::{ChatEngine, EngineError, PROVIDER_FAILURE_REPLY, TOOL_LOOP_REPLY};
pub use prompt::build_system_prompt;
