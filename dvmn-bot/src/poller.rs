//! Long-polling loop: asks the review API for new results and relays them to the chat.
//!
//! The loop keeps a single cursor. Every decoded response (timeout or found) replaces it;
//! transport failures leave it untouched so the next request resumes from the same point.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dbot_core::{Bot, ChatTarget, ErrorNotifier, CONNECTIVITY_TARGET};
use dvmn_client::{PollError, PollResponse, ReviewSource, Timestamp};
use tracing::{debug, error, info, warn};

use crate::format::format_attempts;

/// Pauses applied after failed polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// After the API could not be reached. Fixed, not exponential.
    pub connection_backoff: Duration,
    /// After any other failure, so a misbehaving server is not hammered.
    pub failure_backoff: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            connection_backoff: Duration::from_secs(5),
            failure_backoff: Duration::from_secs(1),
        }
    }
}

/// What a single iteration did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Local wait bound elapsed; cursor unchanged.
    WaitExpired,
    /// Server reported no new reviews; cursor advanced.
    NoUpdates,
    /// Reviews were sent to the chat as one message; cursor advanced.
    Delivered { attempts: usize },
    /// API unreachable; slept `connection_backoff`.
    Disconnected,
    /// Unexpected failure, logged as an error; slept `failure_backoff`.
    Failed,
}

pub struct ReviewPoller {
    source: Arc<dyn ReviewSource>,
    bot: Arc<dyn Bot>,
    chat: ChatTarget,
    notifier: Option<ErrorNotifier>,
    settings: PollSettings,
    cursor: Option<Timestamp>,
}

impl ReviewPoller {
    pub fn new(source: Arc<dyn ReviewSource>, bot: Arc<dyn Bot>, chat: ChatTarget) -> Self {
        Self {
            source,
            bot,
            chat,
            notifier: None,
            settings: PollSettings::default(),
            cursor: None,
        }
    }

    pub fn with_settings(mut self, settings: PollSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Error reports queued by the tracing layer are delivered after every iteration.
    pub fn with_error_notifier(mut self, notifier: ErrorNotifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Cursor the next request will carry.
    pub fn cursor(&self) -> Option<Timestamp> {
        self.cursor
    }

    /// Performs one poll request and reacts to its result, including any backoff sleep.
    pub async fn poll_once(&mut self) -> PollOutcome {
        match self.source.poll(self.cursor).await {
            Ok(response) => self.handle_response(response).await,
            Err(PollError::WaitExpired) => {
                debug!(cursor = ?self.cursor, "Long poll wait expired, polling again");
                PollOutcome::WaitExpired
            }
            Err(PollError::Connection(reason)) => {
                warn!(target: CONNECTIVITY_TARGET, reason = %reason, "No Internet connection");
                tokio::time::sleep(self.settings.connection_backoff).await;
                PollOutcome::Disconnected
            }
            Err(e) => {
                error!(error = %e, cursor = ?self.cursor, "Review polling failed");
                tokio::time::sleep(self.settings.failure_backoff).await;
                PollOutcome::Failed
            }
        }
    }

    async fn handle_response(&mut self, response: PollResponse) -> PollOutcome {
        self.cursor = Some(response.next_cursor());
        let attempts = match response {
            PollResponse::Timeout { .. } => {
                debug!(cursor = ?self.cursor, "No new reviews yet");
                return PollOutcome::NoUpdates;
            }
            PollResponse::Found { new_attempts, .. } if new_attempts.is_empty() => {
                debug!(cursor = ?self.cursor, "Found response without attempts");
                return PollOutcome::NoUpdates;
            }
            PollResponse::Found { new_attempts, .. } => new_attempts,
        };

        let text = format_attempts(&attempts);
        match self.bot.send_message(&self.chat, &text).await {
            Ok(()) => {
                info!(
                    attempts = attempts.len(),
                    chat = %self.chat,
                    "Review results delivered"
                );
                PollOutcome::Delivered {
                    attempts: attempts.len(),
                }
            }
            Err(e) => {
                error!(
                    error = %e,
                    attempts = attempts.len(),
                    chat = %self.chat,
                    "Failed to deliver review results"
                );
                tokio::time::sleep(self.settings.failure_backoff).await;
                PollOutcome::Failed
            }
        }
    }

    async fn flush_error_reports(&mut self) {
        if let Some(notifier) = self.notifier.as_mut() {
            notifier.flush().await;
        }
    }

    /// Polls until `shutdown` completes. Shutdown is checked while a request, a backoff
    /// sleep, or a delivery is in progress; the loop then returns without sending anything.
    pub async fn run_until<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!(chat = %self.chat, "Review polling started");
        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown requested, review polling stopped");
                    return;
                }
                _ = async {
                    self.poll_once().await;
                    self.flush_error_reports().await;
                } => {}
            }
        }
    }

    /// Polls until Ctrl-C.
    pub async fn run(&mut self) {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Cannot listen for Ctrl-C, running until killed");
                std::future::pending::<()>().await;
            }
        })
        .await
    }
}
