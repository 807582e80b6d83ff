//! In-memory conversation store (non-persistent).
//!
//! Conversations are keyed by a caller-supplied identifier. The store does
//! not serialize concurrent turns on the same conversation; callers must.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::message::Message;

/// Storage for conversation histories.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// History for `id`; empty if the conversation does not exist yet.
    async fn load(&self, id: &str) -> Vec<Message>;

    /// Replace the history for `id`.
    async fn save(&self, id: &str, messages: Vec<Message>);

    /// Forget a conversation. Returns whether it existed.
    async fn clear(&self, id: &str) -> bool;

    /// Known conversation identifiers, sorted.
    async fn list(&self) -> Vec<String>;
}

#[derive(Clone, Default)]
pub struct InMemoryConversationStore {
    conversations: Arc<RwLock<HashMap<String, Vec<Message>>>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn load(&self, id: &str) -> Vec<Message> {
        self.conversations
            .read()
            .await
            .get(id)
            .cloned()
            .unwrap_or_default()
    }

    async fn save(&self, id: &str, messages: Vec<Message>) {
        self.conversations
            .write()
            .await
            .insert(id.to_string(), messages);
    }

    async fn clear(&self, id: &str) -> bool {
        self.conversations.write().await.remove(id).is_some()
    }

    async fn list(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.conversations.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn conversations_are_isolated_by_id() {
        let store = InMemoryConversationStore::new();
        assert!(store.load("a").await.is_empty());

        store.save("a", vec![Message::user("hi")]).await;
        store
            .save("b", vec![Message::user("hello"), Message::assistant("hey")])
            .await;

        assert_eq!(store.load("a").await.len(), 1);
        assert_eq!(store.load("b").await.len(), 2);
        assert_eq!(store.list().await, vec!["a".to_string(), "b".to_string()]);

        assert!(store.clear("a").await);
        assert!(!store.clear("a").await);
        assert!(store.load("a").await.is_empty());
    }
}
