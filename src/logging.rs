//! Tracing setup. The TUI owns stdout, so logs go to a per-launch file in
//! the platform data directory; the file is truncated on each start.
//! Failure to set up logging is not fatal — the app runs without logs.

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::constants::constants;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initialize the global tracing subscriber, writing to `reel.log` in the
/// data directory. `RUST_LOG` overrides the default `info` filter.
pub fn init() -> Result<()> {
  if LOG_GUARD.get().is_some() {
    return Ok(());
  }

  let proj_dirs = ProjectDirs::from("", "", "reel").ok_or_else(|| anyhow!("no data directory available"))?;
  let log_dir = proj_dirs.data_dir().to_path_buf();
  std::fs::create_dir_all(&log_dir).with_context(|| format!("Failed to create {}", log_dir.display()))?;

  let file = std::fs::File::create(log_dir.join(&constants().log_file))
    .with_context(|| format!("Failed to create log file in {}", log_dir.display()))?;
  let (writer, guard) = tracing_appender::non_blocking(file);

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(writer)
    .with_ansi(false)
    .try_init()
    .map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))?;

  let _ = LOG_GUARD.set(guard);
  Ok(())
}
