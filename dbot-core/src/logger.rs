//! Logging initialization: human-readable format (timestamp, level, message, fields) to the
//! console and optionally a log file, plus the error-report sink.

use std::fs::OpenOptions;
use std::io;
use std::sync::Arc;

use tracing_subscriber::{
    fmt::format::{FmtSpan, Writer},
    fmt::time::FormatTime,
    fmt::writer::{BoxMakeWriter, MakeWriterExt},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

use crate::notifier::ErrorReportLayer;

/// Local time in `YYYY-MM-DD HH:MM:SS` for human-readable log lines.
struct ChronoLocal;

impl FormatTime for ChronoLocal {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let t = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        write!(w, "{} ", t)
    }
}

/// Target for connectivity diagnostics. Its WARN lines are printed whatever the configured
/// level is.
pub const CONNECTIVITY_TARGET: &str = "connectivity";

/// Builds the level filter: `RUST_LOG` wins, then `log_level` (e.g. `LOG_LEVEL=debug`),
/// then `info`. An unparsable `log_level` falls back to `info`. [`CONNECTIVITY_TARGET`]
/// is always enabled at WARN.
pub fn build_env_filter(log_level: Option<&str>) -> EnvFilter {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level.unwrap_or("info")))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    match format!("{}=warn", CONNECTIVITY_TARGET).parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Initializes the global tracing subscriber.
///
/// Output is human-readable: `YYYY-MM-DD HH:MM:SS LEVEL [target] message key=value ...`
/// on stdout, teed to `log_file_path` when given. No ANSI codes so the log file is plain
/// text. `reports` receives every ERROR event and queues it for the chat.
/// Load `.env` before calling, otherwise `RUST_LOG` is not picked up.
pub fn init_tracing(
    log_level: Option<&str>,
    log_file_path: Option<&str>,
    reports: ErrorReportLayer,
) -> anyhow::Result<()> {
    let writer = match log_file_path {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            BoxMakeWriter::new(io::stdout.and(Arc::new(file)))
        }
        None => BoxMakeWriter::new(io::stdout),
    };

    let event_format = tracing_subscriber::fmt::format()
        .with_timer(ChronoLocal)
        .with_level(true)
        .with_target(true)
        .with_thread_ids(false);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .event_format(event_format)
        .with_span_events(FmtSpan::NONE)
        .with_ansi(false);

    Registry::default()
        .with(build_env_filter(log_level))
        .with(fmt_layer)
        .with(reports)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    Ok(())
}
