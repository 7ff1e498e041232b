//! Bot configuration loaded from environment variables. Load `.env` before calling
//! [`BotConfig::load`].

use std::env;
use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use dbot_core::ChatTarget;
use dvmn_client::{mask_token, DEFAULT_API_URL, DEFAULT_POLL_TIMEOUT};

pub struct BotConfig {
    /// DVMN_TOKEN
    pub dvmn_token: String,
    /// TG_BOT_TOKEN
    pub bot_token: String,
    /// TG_CHAT_ID: numeric id or @channel
    pub chat_id: ChatTarget,
    /// LOG_LEVEL, used when RUST_LOG is not set
    pub log_level: Option<String>,
    /// LOG_FILE; console only when unset
    pub log_file: Option<String>,
    /// DVMN_API_URL
    pub dvmn_api_url: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// POLL_TIMEOUT_SECS: client-side wait bound per poll request
    pub poll_timeout_secs: u64,
}

fn required(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => anyhow::bail!("{} not set", name),
    }
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl BotConfig {
    /// Loads from env. `token` overrides TG_BOT_TOKEN and `chat_id` overrides TG_CHAT_ID.
    pub fn load(token: Option<String>, chat_id: Option<String>) -> Result<Self> {
        let dvmn_token = required("DVMN_TOKEN")?;
        let bot_token = match token {
            Some(token) => token,
            None => required("TG_BOT_TOKEN")?,
        };
        let chat_id_raw = match chat_id {
            Some(chat_id) => chat_id,
            None => required("TG_CHAT_ID")?,
        };
        let chat_id = chat_id_raw
            .parse::<ChatTarget>()
            .context("TG_CHAT_ID must be a numeric chat id or @channel")?;
        let poll_timeout_secs = optional("POLL_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_POLL_TIMEOUT.as_secs());

        Ok(Self {
            dvmn_token,
            bot_token,
            chat_id,
            log_level: optional("LOG_LEVEL"),
            log_file: optional("LOG_FILE"),
            dvmn_api_url: optional("DVMN_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            telegram_api_url: optional("TELEGRAM_API_URL").or_else(|| optional("TELOXIDE_API_URL")),
            poll_timeout_secs,
        })
    }

    /// Rejects URLs that do not parse and a zero wait bound.
    pub fn validate(&self) -> Result<()> {
        if reqwest::Url::parse(&self.dvmn_api_url).is_err() {
            anyhow::bail!("DVMN_API_URL is not a valid URL: {}", self.dvmn_api_url);
        }
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        if self.poll_timeout_secs == 0 {
            anyhow::bail!("POLL_TIMEOUT_SECS must be greater than zero");
        }
        Ok(())
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("dvmn_token", &mask_token(&self.dvmn_token))
            .field("bot_token", &mask_token(&self.bot_token))
            .field("chat_id", &self.chat_id)
            .field("log_level", &self.log_level)
            .field("log_file", &self.log_file)
            .field("dvmn_api_url", &self.dvmn_api_url)
            .field("telegram_api_url", &self.telegram_api_url)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .finish()
    }
}
