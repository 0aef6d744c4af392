//! Log setup
//!
//! Everything goes to `.lanes/lanes.log`; the terminal belongs to the TUI.

use std::path::Path;

use anyhow::Context as _;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Env var that overrides the configured log filter
pub const LOG_ENV: &str = "LANES_LOG";

pub const LOG_FILE: &str = "lanes.log";

/// Build the filter: `LANES_LOG` first, then `default_level`, then "info"
pub fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber writing into `dir/lanes.log`.
///
/// Keep the returned guard alive for the life of the process or buffered
/// lines are lost.
pub fn init(dir: &Path, default_level: &str) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("could not create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter(default_level))
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("could not install log subscriber: {}", e))?;

    tracing::debug!(dir = %dir.display(), "logging initialised");
    Ok(guard)
}
