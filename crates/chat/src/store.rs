use chrono::{DateTime, Local};
use snafu::ensure;

use crate::error::{ChatResult, EmptyUserMessageSnafu};
use crate::history::HistoryEntry;
use crate::message::{ChatMessage, MessageId, Role};

/// Append-only, ordered transcript owned by one chat surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageStore {
    messages: Vec<ChatMessage>,
    next_message_id: u64,
}

impl MessageStore {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            next_message_id: 1,
        }
    }

    /// Appends one message stamped with `timestamp`.
    ///
    /// User messages must carry visible text; assistant content is taken as-is.
    pub fn append(
        &mut self,
        role: Role,
        content: impl Into<String>,
        timestamp: DateTime<Local>,
    ) -> ChatResult<MessageId> {
        let content = content.into();
        ensure!(
            role != Role::User || !content.trim().is_empty(),
            EmptyUserMessageSnafu {
                stage: "message-store-append",
                role,
            }
        );

        let id = self.alloc_message_id();
        self.messages
            .push(ChatMessage::new(id, role, content, timestamp));
        Ok(id)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Compact one-line-per-message projection; storage is left untouched.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.messages.iter().map(HistoryEntry::from_message).collect()
    }

    fn alloc_message_id(&mut self) -> MessageId {
        let id = MessageId::new(self.next_message_id.max(1));
        self.next_message_id = id.0.saturating_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_keep_send_order_and_unique_ids() {
        let mut store = MessageStore::new();
        let first = store
            .append(Role::User, "What is fair use?", Local::now())
            .unwrap();
        let second = store.append(Role::Assistant, "reply", Local::now()).unwrap();

        assert_eq!(store.len(), 2);
        assert!(first < second);
        assert_eq!(store.messages()[0].content, "What is fair use?");
        assert_eq!(store.last().map(|message| message.role), Some(Role::Assistant));
    }

    #[test]
    fn blank_user_content_is_rejected() {
        let mut store = MessageStore::new();
        let error = store.append(Role::User, "  \t ", Local::now()).unwrap_err();

        assert!(error.to_string().contains("empty"));
        assert!(store.is_empty());
    }

    #[test]
    fn history_truncates_without_touching_storage() {
        let mut store = MessageStore::new();
        let long = "x".repeat(80);
        store.append(Role::User, long.clone(), Local::now()).unwrap();

        let history = store.history();
        assert_eq!(history[0].preview, format!("{}...", "x".repeat(50)));
        assert_eq!(store.messages()[0].content, long);
    }

    #[test]
    fn default_store_still_allocates_nonzero_ids() {
        let mut store = MessageStore::default();
        let id = store.append(Role::Assistant, "reply", Local::now()).unwrap();

        assert_eq!(id, MessageId::new(1));
    }
}
