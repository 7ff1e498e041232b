//! Wires config, tracing, the Telegram bot, the review client and the poll loop.

use std::sync::Arc;

use anyhow::{Context, Result};
use dbot_core::{error_reporting, init_tracing, Bot, ErrorNotifier, TelegramBot};
use dvmn_client::{DvmnClient, ReviewSource};
use tracing::info;

use crate::config::BotConfig;
use crate::poller::ReviewPoller;

/// Builds the Telegram transport, honouring a custom API URL.
pub fn build_bot(config: &BotConfig) -> Result<Arc<dyn Bot>> {
    let bot = match config.telegram_api_url {
        Some(ref url) => TelegramBot::with_api_url(config.bot_token.clone(), url)?,
        None => TelegramBot::new(config.bot_token.clone()),
    };
    Ok(Arc::new(bot))
}

/// Builds the review API client with the configured endpoint and wait bound.
pub fn build_review_source(config: &BotConfig) -> Result<Arc<dyn ReviewSource>> {
    let client = DvmnClient::with_options(
        config.dvmn_token.clone(),
        &config.dvmn_api_url,
        config.poll_timeout(),
    )
    .context("Failed to build review API client")?;
    Ok(Arc::new(client))
}

/// Builds the poller around `bot`, delivering queued error reports through `notifier`.
pub fn build_poller(
    config: &BotConfig,
    bot: Arc<dyn Bot>,
    notifier: ErrorNotifier,
) -> Result<ReviewPoller> {
    let source = build_review_source(config)?;
    Ok(ReviewPoller::new(source, bot, config.chat_id.clone()).with_error_notifier(notifier))
}

/// Runs the bot until Ctrl-C. Tracing is installed before the review client is built.
pub async fn run_bot(config: BotConfig) -> Result<()> {
    let bot = build_bot(&config)?;
    let (reports, notifier) = error_reporting(bot.clone(), config.chat_id.clone());
    init_tracing(
        config.log_level.as_deref(),
        config.log_file.as_deref(),
        reports,
    )?;
    info!(config = ?config, "Starting dvmn review notifier");

    let mut poller = build_poller(&config, bot, notifier)?;
    poller.run().await;
    Ok(())
}
