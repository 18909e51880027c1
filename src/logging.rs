//! Log sink setup.
//!
//! stdout carries protocol traffic, so logs go to stderr. When a log
//! directory is configured, every event also lands in `combined.log` and
//! error events additionally in `error.log`.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::ServerConfig;

/// File name used inside `FAKESTORE_LOG_DIR`.
pub const LOG_FILE_NAME: &str = "combined.log";

/// Error-only file next to [`LOG_FILE_NAME`].
pub const ERROR_LOG_FILE_NAME: &str = "error.log";

/// Install the global subscriber.
///
/// The returned guards flush the file sinks on drop and must be held for the
/// life of the process. Empty when no log directory is configured.
pub fn init(config: &ServerConfig) -> Result<Vec<WorkerGuard>, Box<dyn std::error::Error>> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level)?,
    };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false);

    let registry = tracing_subscriber::registry().with(env_filter).with(console_layer);

    match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;

            let (combined, combined_guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, LOG_FILE_NAME));
            let (errors, errors_guard) = tracing_appender::non_blocking(
                tracing_appender::rolling::never(dir, ERROR_LOG_FILE_NAME),
            );

            let combined_layer = fmt::layer().with_writer(combined).with_ansi(false);
            let error_layer = fmt::layer()
                .with_writer(errors)
                .with_ansi(false)
                .with_filter(LevelFilter::ERROR);

            registry.with(combined_layer).with(error_layer).try_init()?;
            Ok(vec![combined_guard, errors_guard])
        }
        None => {
            registry.try_init()?;
            Ok(Vec::new())
        }
    }
}
