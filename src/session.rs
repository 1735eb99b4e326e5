//! Chat session history
//!
//! Holds the ordered conversation shown to the user during one run of the
//! dashboard. The history lives only in memory; the durable copy of each
//! message goes through the record store.
//!
//! # Example
//! ```
//! use medscope::session::ChatSession;
//! use medscope::storage::Role;
//!
//! let mut session = ChatSession::new();
//! session.append(Role::User, "What causes a persistent cough?");
//! assert_eq!(session.len(), 1);
//! assert_eq!(session.messages()[0].role, Role::User);
//! ```

use serde::Serialize;

use crate::storage::Role;

/// One displayed message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Ordered `(role, content)` history, append-only
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role,
            content: content.into(),
        });
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
}
