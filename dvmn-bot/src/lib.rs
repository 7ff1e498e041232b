//! # dvmn-bot
//!
//! Long-polls the dvmn.org review API and posts review results to a Telegram chat.
//! Errors logged while running are forwarded to the same chat.

pub mod cli;
pub mod config;
pub mod format;
pub mod poller;
pub mod runner;

pub use cli::{load_config, Cli, Commands};
pub use config::BotConfig;
pub use format::format_attempts;
pub use poller::{PollOutcome, PollSettings, ReviewPoller};
pub use runner::{build_bot, build_poller, build_review_source, run_bot};
