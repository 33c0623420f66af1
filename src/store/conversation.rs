// ABOUTME: Conversation store — the ordered message list plus session token, mirrored to storage.
// ABOUTME: Every mutation rewrites the full list synchronously; the in-memory copy is authoritative.

use crate::config::StorageConfig;
use crate::store::message::Message;
use crate::store::session::{generate_session_id, is_valid_session_id, next_session_id};
use crate::store::storage::Storage;

/// Storage keys for one conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreKeys {
    pub messages: String,
    pub session: String,
    pub seen: String,
}

impl From<&StorageConfig> for StoreKeys {
    fn from(config: &StorageConfig) -> Self {
        Self {
            messages: config.messages_key.clone(),
            session: config.session_key.clone(),
            seen: config.seen_key.clone(),
        }
    }
}

impl Default for StoreKeys {
    fn default() -> Self {
        Self::from(&StorageConfig::default())
    }
}

/// Append-only message list and session token for one profile.
pub struct ConversationStore {
    storage: Box<dyn Storage>,
    keys: StoreKeys,
    messages: Vec<Message>,
    session_id: String,
}

impl ConversationStore {
    /// Load the persisted conversation, creating a session token if none exists.
    ///
    /// A missing or unreadable message list loads as empty.
    pub fn load(storage: Box<dyn Storage>, keys: StoreKeys) -> Self {
        let mut store = Self {
            storage,
            keys,
            messages: Vec::new(),
            session_id: String::new(),
        };

        match store.storage.get(&store.keys.session) {
            Some(id) if is_valid_session_id(&id) => store.session_id = id,
            _ => {
                store.session_id = generate_session_id();
                store.persist_session();
                tracing::info!(session_id = %store.session_id, "created new session");
            }
        }

        if let Some(raw) = store.storage.get(&store.keys.messages) {
            match serde_json::from_str::<Vec<Message>>(&raw) {
                Ok(messages) => store.messages = messages,
                Err(e) => {
                    tracing::warn!(error = %e, "discarding unreadable message history");
                }
            }
        }

        store
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Append a message and persist the full list.
    pub fn append(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        self.persist_messages();
        &self.messages[self.messages.len() - 1]
    }

    /// Drop every message and persist the empty list.
    pub fn clear_messages(&mut self) {
        self.messages.clear();
        self.persist_messages();
    }

    /// Replace the session token with a new one and persist it.
    pub fn rotate_session(&mut self) -> &str {
        self.session_id = next_session_id(&self.session_id);
        self.persist_session();
        tracing::info!(session_id = %self.session_id, "rotated session");
        &self.session_id
    }

    /// Returns true exactly once per profile, recording that the chat has been seen.
    pub fn first_visit(&mut self) -> bool {
        if self.storage.get(&self.keys.seen).as_deref() == Some("true") {
            return false;
        }
        if let Err(e) = self.storage.set(&self.keys.seen, "true") {
            tracing::warn!(error = %e, "failed to persist seen flag");
        }
        true
    }

    fn persist_messages(&mut self) {
        let serialized = match serde_json::to_string(&self.messages) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize messages");
                return;
            }
        };
        if let Err(e) = self.storage.set(&self.keys.messages, &serialized) {
            tracing::warn!(error = %e, "failed to persist messages");
        }
    }

    fn persist_session(&mut self) {
        if let Err(e) = self.storage.set(&self.keys.session, &self.session_id) {
            tracing::warn!(error = %e, "failed to persist session token");
        }
    }
}
