//! # dbot-core
//!
//! Core pieces shared by the notifier bot: the [`Bot`] transport trait and its teloxide
//! implementation, [`ChatTarget`], tracing initialization, and the [`ErrorNotifier`] that
//! relays ERROR log records to the chat.

pub mod bot;
pub mod error;
pub mod logger;
pub mod notifier;
pub mod types;

pub use bot::{Bot, TelegramBot};
pub use error::{DbotError, Result};
pub use logger::{build_env_filter, init_tracing, CONNECTIVITY_TARGET};
pub use notifier::{error_reporting, ErrorNotifier, ErrorReportLayer, ERROR_HEADER};
pub use types::ChatTarget;
