use crate::error::ConfigError;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber: a console layer plus a daily rolling log
/// file under `log_dir`.
///
/// The level comes from `RUST_LOG` and defaults to `info`. Keep the returned
/// guard alive for the life of the process or buffered lines are lost.
pub fn init_tracing(log_dir: impl AsRef<Path>, file_name: &str) -> Result<WorkerGuard, ConfigError> {
    let file_appender = tracing_appender::rolling::daily(log_dir.as_ref(), file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .try_init()
        .map_err(|e| ConfigError::LoggingError(e.to_string()))?;

    Ok(guard)
}
