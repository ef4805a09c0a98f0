// src/session.rs
// Caller-owned conversation context. Append-only, unbounded for the
// session's lifetime, and only ever appended after a successful
// completion call, so a failed request leaves it exactly as it was.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::llm::{Message, MessageRole};

/// One completed (prompt, response) exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    pub prompt: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionContext {
    exchanges: Vec<Exchange>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, prompt: String, response: String) {
        self.exchanges.push(Exchange {
            prompt,
            response,
            timestamp: Utc::now(),
        });
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    pub fn exchanges(&self) -> &[Exchange] {
        &self.exchanges
    }

    /// Flatten the history into alternating user/assistant turns for
    /// the completion request.
    pub fn as_messages(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.exchanges.len() * 2);
        for exchange in &self.exchanges {
            messages.push(Message {
                role: MessageRole::User,
                content: exchange.prompt.clone(),
            });
            messages.push(Message {
                role: MessageRole::Assistant,
                content: exchange.response.clone(),
            });
        }
        messages
    }
}
