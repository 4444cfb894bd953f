//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!` so it's always available —
//! no runtime file I/O. Parsed once on first access via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  /// Catalog document fetched when neither the CLI nor prefs name one.
  pub default_data_source: String,

  // Event loop
  pub poll_interval_ms: u64,
  pub error_dismiss_secs: u64,

  // Duration buckets (minutes)
  pub short_max_minutes: f64,
  pub medium_max_minutes: f64,

  // Nested catalog traversal
  pub max_tree_depth: usize,

  // Persistence
  pub favorites_file: String,
  pub prefs_file: String,
  pub log_file: String,
}

static CONSTANTS: LazyLock<Constants> =
  LazyLock::new(|| ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON"));

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}
