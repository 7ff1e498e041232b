//! Bot abstraction for sending messages.
//!
//! [`Bot`] trait is transport-agnostic; [`TelegramBot`] implements it via teloxide.

use crate::error::{DbotError, Result};
use crate::types::ChatTarget;
use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{ChatId, Recipient},
};

/// Abstraction for sending messages. Implementations map to a transport (e.g. Telegram).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat: &ChatTarget, text: &str) -> Result<()>;
}

/// Teloxide-based implementation of [`Bot`].
pub struct TelegramBot {
    bot: teloxide::Bot,
}

impl TelegramBot {
    /// Creates a bot using the given Telegram bot token.
    pub fn new(token: String) -> Self {
        Self {
            bot: teloxide::Bot::new(token),
        }
    }

    /// Creates a bot that talks to `api_url` instead of the public Bot API (local Bot API
    /// server, test doubles).
    pub fn with_api_url(token: String, api_url: &str) -> Result<Self> {
        let url = reqwest::Url::parse(api_url).map_err(|e| {
            DbotError::Config(format!("Invalid Telegram API URL {}: {}", api_url, e))
        })?;
        Ok(Self {
            bot: teloxide::Bot::new(token).set_api_url(url),
        })
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

/// Maps a [`ChatTarget`] to the teloxide recipient type.
pub fn to_recipient(chat: &ChatTarget) -> Recipient {
    match chat {
        ChatTarget::Id(id) => Recipient::Id(ChatId(*id)),
        ChatTarget::Username(name) => Recipient::ChannelUsername(name.clone()),
    }
}

#[async_trait]
impl Bot for TelegramBot {
    async fn send_message(&self, chat: &ChatTarget, text: &str) -> Result<()> {
        self.bot
            .send_message(to_recipient(chat), text.to_string())
            .await
            .map_err(|e| DbotError::Bot(e.to_string()))?;
        Ok(())
    }
}
