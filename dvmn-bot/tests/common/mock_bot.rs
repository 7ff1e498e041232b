//! Mock implementation of [`dbot_core::Bot`] for integration tests.
//!
//! Records every `send_message` call so tests can assert on what reached the chat
//! without hitting Telegram.

use async_trait::async_trait;
use dbot_core::{Bot, ChatTarget, DbotError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// One recorded call to `send_message(chat, text)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub chat: ChatTarget,
    pub text: String,
}

/// Mock Bot that records sent messages. The first `failures` sends fail with a transport error.
#[derive(Default)]
pub struct MockBot {
    sent: Mutex<Vec<SentMessage>>,
    failures: AtomicUsize,
}

impl MockBot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a MockBot whose first `failures` sends return `DbotError::Bot`.
    pub fn failing(failures: usize) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failures: AtomicUsize::new(failures),
        }
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|m| m.text).collect()
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, chat: &ChatTarget, text: &str) -> Result<()> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(DbotError::Bot("Telegram API unavailable".to_string()));
        }
        self.sent.lock().unwrap().push(SentMessage {
            chat: chat.clone(),
            text: text.to_string(),
        });
        Ok(())
    }
}
