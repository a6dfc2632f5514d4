//! # Newsdesk
//!
//! A conversational news agent backend.
//!
//! This library provides:
//! - An HTTP API for a single chat conversation
//! - A scripted onboarding phase that collects the user's preferences
//! - A tool-based agent loop for answering news requests
//! - Integration with OpenRouter for LLM access
//!
//! ## Architecture
//!
//! The engine keeps two logs per conversation: the provider-facing message
//! log (system prompt, tool traffic included) and the user-facing
//! transcript. A turn first records the user utterance in both, then either
//! serves the next scripted preference question or runs a bounded
//! "tools in a loop" cycle:
//! 1. Call the LLM with the full provider log and the tool schemas
//! 2. Execute any requested tool calls in order, feed results back
//! 3. Repeat until the model replies with text or the cap is reached
//!
//! ## Example
//!
//! ```rust,ignore
//! use newsdesk::{config::Config, api};
//!
//! let config = Config::from_env()?;
//! api::serve(config).await?;
//! ```

pub mod agent;
pub mod api;
pub mod chat;
pub mod config;
pub mod llm;
pub mod news;
pub mod tools;

pub use config::Config;
