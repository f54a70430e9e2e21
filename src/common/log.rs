//! Logging setup emitting JSON lines (or human readable text during development).
//!
//! Startup events carry `ev`, `code` and `dur_ms` fields so they line up with
//! the error codes in [`crate::common::error::ErrorCode`].

use tracing_subscriber::EnvFilter;

use super::config::{AppCfg, LogFormat};

/// Install the global subscriber. `RUST_LOG` overrides the configured filter.
///
/// Calling this twice is harmless; the second call leaves the first subscriber in place.
pub fn init(cfg: &AppCfg) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let _ = match cfg.log_format {
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
}
