//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::BotConfig;

#[derive(Parser)]
#[command(name = "dvmn-bot")]
#[command(about = "Telegram notifications for dvmn.org code reviews", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll the review API and notify the chat (config from env; flags override it).
    Run {
        /// Overrides TG_BOT_TOKEN.
        #[arg(short, long)]
        token: Option<String>,
        /// Overrides TG_CHAT_ID (numeric id or @channel).
        #[arg(short, long, allow_hyphen_values = true)]
        chat_id: Option<String>,
    },
}

/// Loads and validates [`BotConfig`] from the environment with CLI overrides applied.
pub fn load_config(token: Option<String>, chat_id: Option<String>) -> Result<BotConfig> {
    let config = BotConfig::load(token, chat_id)?;
    config.validate()?;
    Ok(config)
}
