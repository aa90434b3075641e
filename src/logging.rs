//! File-based logging module for clipdeck
//!
//! The terminal is owned by the carousel UI, so tracing output goes to a
//! rolling file instead of stdout.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const LOG_DIR: &str = ".logs";
const LOG_FILE_PREFIX: &str = "clipdeck";
const DEFAULT_FILTER: &str = "clipdeck=debug,rodio=info,reqwest=info,warn";

/// Initialize the logging system.
///
/// Logs are written to `.logs/clipdeck.YYYY-MM-DD.log` with daily rotation.
/// The log level can be controlled via the `RUST_LOG` environment variable.
///
/// Default log levels:
/// - `clipdeck` modules: DEBUG
/// - `rodio`, `reqwest`: INFO
/// - Other crates: WARN
pub fn init_logging() -> anyhow::Result<()> {
    let log_dir = Path::new(LOG_DIR);
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir)?;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, LOG_FILE_PREFIX);

    // Non-blocking writer so the async runtime never waits on disk
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard flushes on drop; it has to outlive every log call
    Box::leak(Box::new(guard));

    let fmt_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()?;

    tracing::info!("Logging initialized - logs written to {}/", LOG_DIR);

    Ok(())
}

/// `RUST_LOG` when it parses, the built-in defaults otherwise
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Log the outcome of a network request
#[macro_export]
macro_rules! log_fetch_result {
    ($operation:expr, $result:expr) => {
        match &$result {
            Ok(_) => tracing::info!(operation = $operation, "Request successful"),
            Err(e) => tracing::error!(operation = $operation, error = %e, "Request failed"),
        }
    };
}

/// Log the start of a network request with additional context
#[macro_export]
macro_rules! log_fetch_request {
    ($operation:expr, $($field:tt)*) => {
        tracing::debug!(operation = $operation, $($field)*, "Request started");
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        let filter = EnvFilter::try_new(DEFAULT_FILTER).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("clipdeck=debug"));
        assert!(rendered.contains("rodio=info"));
    }
}
