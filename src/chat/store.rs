//! In-memory, session-keyed conversation store (non-persistent).

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::Conversation;

/// Session used by the HTTP layer, which exposes a single conversation.
pub const DEFAULT_SESSION_ID: Uuid = Uuid::from_u128(0);

/// Maps session ids to their conversations. Each conversation sits behind
/// its own mutex; holding it is what makes a turn exclusive.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<Mutex<Conversation>>>>>,
    system_prompt: String,
    greeting: String,
}

impl SessionStore {
    pub fn new(system_prompt: impl Into<String>, greeting: impl Into<String>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            system_prompt: system_prompt.into(),
            greeting: greeting.into(),
        }
    }

    /// Fetch a session's conversation, seeding a fresh one on first use.
    pub async fn get_or_create(&self, session_id: Uuid) -> Arc<Mutex<Conversation>> {
        {
            let sessions = self.sessions.read().await;
            if let Some(conversation) = sessions.get(&session_id) {
                return conversation.clone();
            }
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id)
            .or_insert_with(|| {
                Arc::new(Mutex::new(Conversation::new(
                    self.system_prompt.clone(),
                    self.greeting.clone(),
                )))
            })
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_session_returns_same_conversation() {
        let store = SessionStore::new("system", "hello");
        let id = Uuid::new_v4();

        let a = store.get_or_create(id).await;
        let b = store.get_or_create(id).await;
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = SessionStore::new("system", "hello");

        let a = store.get_or_create(Uuid::new_v4()).await;
        let b = store.get_or_create(Uuid::new_v4()).await;
        assert!(!Arc::ptr_eq(&a, &b));

        a.lock()
            .await
            .append_display_message(crate::chat::TranscriptEntry::user("hi"));
        assert_eq!(b.lock().await.snapshot_display().len(), 1);
    }
}
