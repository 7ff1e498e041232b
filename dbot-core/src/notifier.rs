//! Error-to-chat reporting.
//!
//! [`ErrorReportLayer`] is registered with the tracing subscriber and queues every ERROR
//! event as rendered text. [`ErrorNotifier`] owns the other end of the queue and delivers
//! each report as two chat messages: [`ERROR_HEADER`], then the rendered record.
//!
//! Delivery failures are logged at WARN from this module and never re-enter the queue;
//! the layer also ignores ERROR events emitted here, so reporting cannot recurse.

use std::fmt::{self, Write as _};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::field::{Field, Visit};
use tracing::{warn, Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::bot::Bot;
use crate::types::ChatTarget;

/// First message of every error report.
pub const ERROR_HEADER: &str = "Бот упал с ошибкой:";

const NOTIFIER_TARGET: &str = module_path!();

/// Creates a connected layer/notifier pair. Register the layer with the subscriber (see
/// [`crate::init_tracing`]); keep the notifier where messages can be sent from.
pub fn error_reporting(bot: Arc<dyn Bot>, chat: ChatTarget) -> (ErrorReportLayer, ErrorNotifier) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        ErrorReportLayer { reports: tx },
        ErrorNotifier {
            bot,
            chat,
            reports: rx,
        },
    )
}

/// Tracing layer that queues rendered ERROR events for the [`ErrorNotifier`].
#[derive(Clone)]
pub struct ErrorReportLayer {
    reports: mpsc::UnboundedSender<String>,
}

impl<S: Subscriber> Layer<S> for ErrorReportLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if *meta.level() != Level::ERROR || meta.target().starts_with(NOTIFIER_TARGET) {
            return;
        }
        let mut visitor = RenderVisitor::default();
        event.record(&mut visitor);
        // Receiver gone means the notifier was dropped during shutdown; nothing to report to.
        let _ = self.reports.send(visitor.render(meta.target()));
    }
}

/// Collects `message` and the remaining fields of an event.
#[derive(Default)]
struct RenderVisitor {
    message: String,
    fields: String,
}

impl RenderVisitor {
    fn render(self, target: &str) -> String {
        format!("ERROR {}: {}{}", target, self.message, self.fields)
    }
}

impl Visit for RenderVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

/// Sends queued error reports to the configured chat.
pub struct ErrorNotifier {
    bot: Arc<dyn Bot>,
    chat: ChatTarget,
    reports: mpsc::UnboundedReceiver<String>,
}

impl ErrorNotifier {
    /// Sends the header and then `rendered` as two messages. Never fails: a transport error
    /// is logged at WARN and the rest of this report is dropped.
    pub async fn notify(&self, rendered: &str) {
        for text in [ERROR_HEADER, rendered] {
            if let Err(e) = self.bot.send_message(&self.chat, text).await {
                warn!(error = %e, chat = %self.chat, "Failed to deliver error report");
                return;
            }
        }
    }

    /// Delivers the reports queued so far, in order. Reports logged while delivering wait
    /// for the next flush. Returns how many were processed.
    pub async fn flush(&mut self) -> usize {
        let mut pending = Vec::new();
        while let Ok(rendered) = self.reports.try_recv() {
            pending.push(rendered);
        }
        for rendered in &pending {
            self.notify(rendered).await;
        }
        pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DbotError, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tracing::error;
    use tracing_subscriber::layer::SubscriberExt;

    #[derive(Default)]
    struct RecordingBot {
        sent: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl Bot for RecordingBot {
        async fn send_message(&self, _chat: &ChatTarget, text: &str) -> Result<()> {
            if self.fail {
                return Err(DbotError::Bot("telegram is down".to_string()));
            }
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn with_layer<F: FnOnce()>(layer: ErrorReportLayer, f: F) {
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, f);
    }

    #[tokio::test]
    async fn test_notify_sends_header_then_text() {
        let bot = Arc::new(RecordingBot::default());
        let (_layer, notifier) = error_reporting(bot.clone(), ChatTarget::Id(1));

        notifier.notify("ERROR dvmn_bot: boom").await;

        assert_eq!(
            *bot.sent.lock().unwrap(),
            vec![ERROR_HEADER.to_string(), "ERROR dvmn_bot: boom".to_string()]
        );
    }

    #[tokio::test]
    async fn test_notify_swallows_send_failure() {
        let bot = Arc::new(RecordingBot {
            fail: true,
            ..Default::default()
        });
        let (layer, mut notifier) = error_reporting(bot.clone(), ChatTarget::Id(1));
        let subscriber = tracing_subscriber::registry().with(layer);
        let _guard = tracing::subscriber::set_default(subscriber);

        notifier.notify("boom").await;

        assert!(bot.sent.lock().unwrap().is_empty());
        // The WARN about the failed delivery must not be queued as a new report.
        assert_eq!(notifier.flush().await, 0);
    }

    #[tokio::test]
    async fn test_layer_queues_error_events_only() {
        let bot = Arc::new(RecordingBot::default());
        let (layer, mut notifier) = error_reporting(bot.clone(), ChatTarget::Id(1));

        with_layer(layer, || {
            tracing::info!("poll finished");
            tracing::warn!("No Internet connection");
            error!(
                target: "dvmn_bot::poller",
                status = 502,
                reason = "bad gateway",
                "Review polling failed"
            );
        });

        assert_eq!(notifier.flush().await, 1);
        let sent = bot.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], ERROR_HEADER);
        assert!(sent[1].starts_with("ERROR dvmn_bot::poller: Review polling failed"));
        assert!(sent[1].contains("status=502"));
        assert!(sent[1].contains("reason=bad gateway"));
    }

    #[tokio::test]
    async fn test_layer_ignores_notifier_events() {
        let bot = Arc::new(RecordingBot::default());
        let (layer, mut notifier) = error_reporting(bot.clone(), ChatTarget::Id(1));

        with_layer(layer, || {
            error!(target: "dbot_core::notifier", "report delivery failed");
        });

        assert_eq!(notifier.flush().await, 0);
        assert!(bot.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_flush_keeps_order() {
        let bot = Arc::new(RecordingBot::default());
        let (layer, mut notifier) = error_reporting(bot.clone(), ChatTarget::Id(1));

        with_layer(layer, || {
            error!(target: "dvmn_bot::poller", "first");
            error!(target: "dvmn_bot::poller", "second");
        });

        assert_eq!(notifier.flush().await, 2);
        let sent = bot.sent.lock().unwrap();
        assert_eq!(sent.len(), 4);
        assert!(sent[1].ends_with("first"));
        assert!(sent[3].ends_with("second"));
    }
}
