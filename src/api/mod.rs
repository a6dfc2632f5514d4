//! HTTP API - thin plumbing over the chat engine.
//!
//! Three operations, matching what the chat frontend consumes:
//! `GET /history`, `POST /chat`, `POST /chat/clear`, plus a health check.

mod types;

pub use types::{ClearResponse, ErrorResponse, HealthResponse, UserInput};

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::agent::{build_system_prompt, ChatEngine, EngineError};
use crate::chat::{SessionStore, TranscriptEntry, DEFAULT_SESSION_ID, PREFERENCE_QUESTIONS};
use crate::config::Config;
use crate::llm::OpenRouterClient;
use crate::news::DuckDuckGoNews;
use crate::tools::{FetchNews, SummarizeNews, ToolRegistry};

/// Shared state handed to every handler.
pub struct AppState {
    engine: ChatEngine,
}

impl AppState {
    pub fn new(engine: ChatEngine) -> Self {
        Self { engine }
    }
}

/// Wire up the engine from configuration and run the server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let llm = Arc::new(OpenRouterClient::new(config.api_key.clone()));
    let news = Arc::new(DuckDuckGoNews::new());

    let mut tools = ToolRegistry::new();
    tools.register(Box::new(FetchNews::new(news)));
    tools.register(Box::new(SummarizeNews::new(
        llm.clone(),
        config.default_model.clone(),
    )));

    let sessions = SessionStore::new(build_system_prompt(&tools), PREFERENCE_QUESTIONS[0]);
    // Seed the conversation up front so the first GET /history already
    // shows the opening question.
    sessions.get_or_create(DEFAULT_SESSION_ID).await;

    let engine = ChatEngine::new(
        llm,
        tools,
        sessions,
        config.default_model.clone(),
        config.max_iterations,
    );
    let state = Arc::new(AppState::new(engine));

    let cors = CorsLayer::new()
        .allow_origin(config.frontend_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    let app = router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/history", get(get_history))
        .route("/chat", post(post_chat))
        .route("/chat/clear", post(clear_chat))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /history - the current display transcript.
async fn get_history(State(state): State<Arc<AppState>>) -> Json<Vec<TranscriptEntry>> {
    Json(state.engine.snapshot(DEFAULT_SESSION_ID).await)
}

/// POST /chat - run one turn, return the full transcript.
async fn post_chat(
    State(state): State<Arc<AppState>>,
    Json(input): Json<UserInput>,
) -> Result<Json<Vec<TranscriptEntry>>, (StatusCode, Json<ErrorResponse>)> {
    if input.user_input.trim().is_empty() {
        return Err(reject(
            StatusCode::UNPROCESSABLE_ENTITY,
            "userInput must not be empty",
        ));
    }

    state
        .engine
        .handle_turn(DEFAULT_SESSION_ID, &input.user_input)
        .await
        .map_err(|e| match e {
            EngineError::EmptyInput => reject(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string()),
            EngineError::TurnInProgress => reject(StatusCode::CONFLICT, &e.to_string()),
        })?;

    Ok(Json(state.engine.snapshot(DEFAULT_SESSION_ID).await))
}

/// POST /chat/clear - reset the conversation to its opening question.
async fn clear_chat(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClearResponse>, (StatusCode, Json<ErrorResponse>)> {
    state
        .engine
        .reset(DEFAULT_SESSION_ID)
        .await
        .map_err(|e| reject(StatusCode::CONFLICT, &e.to_string()))?;

    Ok(Json(ClearResponse {
        message: "Chat history cleared.".to_string(),
    }))
}

fn reject(status: StatusCode, error: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatMessage, LlmClient};
    use async_trait::async_trait;
    use serde_json::Value;

    struct IdleLlm;

    #[async_trait]
    impl LlmClient for IdleLlm {
        async fn chat_completion(
            &self,
            _model: &str,
            _messages: &[ChatMessage],
            _tools: Option<&[Value]>,
        ) -> anyhow::Result<ChatMessage> {
            Ok(ChatMessage::assistant("stub reply"))
        }
    }

    fn test_state() -> Arc<AppState> {
        let sessions = SessionStore::new("test system prompt", PREFERENCE_QUESTIONS[0]);
        let engine = ChatEngine::new(
            Arc::new(IdleLlm),
            ToolRegistry::new(),
            sessions,
            "test-model".to_string(),
            10,
        );
        Arc::new(AppState::new(engine))
    }

    #[tokio::test]
    async fn history_starts_with_the_opening_question() {
        let state = test_state();
        let Json(history) = get_history(State(state)).await;
        assert_eq!(history, vec![TranscriptEntry::agent(PREFERENCE_QUESTIONS[0])]);
    }

    #[tokio::test]
    async fn chat_appends_user_and_agent_entries() {
        let state = test_state();
        let Json(history) = post_chat(
            State(state),
            Json(UserInput {
                user_input: "Formal".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(history.len(), 3);
        assert_eq!(history[1], TranscriptEntry::user("Formal"));
        assert_eq!(history[2], TranscriptEntry::agent(PREFERENCE_QUESTIONS[1]));
    }

    #[tokio::test]
    async fn empty_input_is_rejected_before_the_engine() {
        let state = test_state();
        let (status, Json(body)) = post_chat(
            State(state.clone()),
            Json(UserInput {
                user_input: "   ".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.error.contains("userInput"));
        // Nothing was recorded.
        let Json(history) = get_history(State(state)).await;
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn clear_resets_to_the_opening_question() {
        let state = test_state();
        post_chat(
            State(state.clone()),
            Json(UserInput {
                user_input: "Formal".to_string(),
            }),
        )
        .await
        .unwrap();

        let Json(cleared) = clear_chat(State(state.clone())).await.unwrap();
        assert_eq!(cleared.message, "Chat history cleared.");

        let Json(history) = get_history(State(state)).await;
        assert_eq!(history, vec![TranscriptEntry::agent(PREFERENCE_QUESTIONS[0])]);
    }
}
