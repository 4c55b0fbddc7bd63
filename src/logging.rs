use color_eyre::{eyre::eyre, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

const LOG_FILE_PREFIX: &str = "portal.log";

/// Build the filter: RUST_LOG wins, then the configured level.
fn env_filter(level: &str) -> Result<EnvFilter> {
  match EnvFilter::try_from_default_env() {
    Ok(filter) => Ok(filter),
    Err(_) => EnvFilter::try_new(level)
      .map_err(|e| eyre!("Invalid log level/filter '{}': {}", level, e)),
  }
}

/// Log to a daily-rolling file; the terminal belongs to the UI.
///
/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init(config: &Config) -> Result<WorkerGuard> {
  let directory = config.log_directory()?;
  std::fs::create_dir_all(&directory)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", directory.display(), e))?;

  let appender = tracing_appender::rolling::daily(&directory, LOG_FILE_PREFIX);
  let (writer, guard) = tracing_appender::non_blocking(appender);

  tracing_subscriber::fmt()
    .with_env_filter(env_filter(&config.log.level)?)
    .with_writer(writer)
    .with_target(false)
    .with_ansi(false)
    .compact()
    .try_init()
    .map_err(|e| eyre!("Failed to install log subscriber: {}", e))?;

  tracing::debug!(directory = %directory.display(), "logging initialised");
  Ok(guard)
}
