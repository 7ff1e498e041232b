//! Core types: the chat that notifications are delivered to.

use std::fmt;
use std::str::FromStr;

use crate::error::DbotError;

/// Destination chat. Telegram accepts either a numeric chat id (private chats, groups)
/// or the `@username` of a public channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatTarget {
    Id(i64),
    /// Stored with the leading `@`.
    Username(String),
}

impl FromStr for ChatTarget {
    type Err = DbotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(id) = s.parse::<i64>() {
            return Ok(ChatTarget::Id(id));
        }
        match s.strip_prefix('@') {
            Some(name)
                if !name.is_empty()
                    && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') =>
            {
                Ok(ChatTarget::Username(s.to_string()))
            }
            _ => Err(DbotError::Config(format!(
                "Invalid chat id: {:?} (expected a number or @channel)",
                s
            ))),
        }
    }
}

impl fmt::Display for ChatTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatTarget::Id(id) => write!(f, "{}", id),
            ChatTarget::Username(name) => f.write_str(name),
        }
    }
}
