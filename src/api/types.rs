//! API request and response types.

use serde::{Deserialize, Serialize};

/// Body of `POST /chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserInput {
    /// The user's utterance. Must be non-empty.
    #[serde(rename = "userInput")]
    pub user_input: String,
}

/// Body returned by `POST /chat/clear`.
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Human-readable confirmation
    pub message: String,
}

/// Error body for rejected requests.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// What went wrong
    pub error: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}
