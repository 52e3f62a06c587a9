//! Structured logging for hosts that embed the engine.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! host's call.

use std::sync::Once;

use mmos_core::config::defaults::{DEFAULT_LOG_LEVEL, LOG_ENV_VAR};
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a JSON subscriber filtered by `MMOS_LOG`, defaulting to `info`.
/// Later calls do nothing.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .try_init();
    });
}

/// Install a JSON subscriber with an explicit filter, e.g. `mmos=debug`.
/// Does nothing if a global subscriber already exists.
pub fn init_tracing_with_filter(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(true)
        .json()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_initialization_is_harmless() {
        init_tracing_with_filter("debug");
        init_tracing();
        init_tracing();
        tracing::info!("still logging");
    }
}
