//! Handler types and dependencies

use std::sync::Arc;

use teloxide::types::Message;

use crate::storage::{SheetStore, UserStore};

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub store: Arc<dyn UserStore + Send + Sync>,
    pub sheets: Arc<SheetStore>,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(store: Arc<dyn UserStore + Send + Sync>, sheets: Arc<SheetStore>) -> Self {
        Self { store, sheets }
    }
}

/// State key for the message's sender.
///
/// State is partitioned per user, not per chat: in a group every member
/// keeps their own password, cookie-mode flag, and sheets. `None` for
/// updates without a sender (channel posts); those are ignored.
pub fn sender_id(msg: &Message) -> Option<i64> {
    msg.from.as_ref().map(|user| user.id.0 as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn group_message(chat_id: i64, from_id: u64) -> Message {
        serde_json::from_value(serde_json::json!({
            "message_id": 1,
            "date": 0,
            "chat": { "id": chat_id, "type": "group", "title": "g" },
            "from": { "id": from_id, "is_bot": false, "first_name": "u" },
            "text": "hi"
        }))
        .unwrap()
    }

    #[test]
    fn test_sender_key_is_the_user_not_the_chat() {
        let msg = group_message(-100_123, 42);
        assert_eq!(sender_id(&msg), Some(42));
    }

    #[test]
    fn test_senders_in_one_group_get_distinct_keys() {
        let alice = group_message(-100_123, 42);
        let bob = group_message(-100_123, 43);
        assert_ne!(sender_id(&alice), sender_id(&bob));
        assert_ne!(sender_id(&alice), Some(alice.chat.id.0));
    }

    #[test]
    fn test_message_without_sender_has_no_key() {
        let msg: Message = serde_json::from_value(serde_json::json!({
            "message_id": 2,
            "date": 0,
            "chat": { "id": -100_123, "type": "channel", "title": "c" },
            "text": "post"
        }))
        .unwrap();
        assert_eq!(sender_id(&msg), None);
    }
}
