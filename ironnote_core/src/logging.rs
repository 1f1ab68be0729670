//! Tracing setup for the `ironnote` binary.
//!
//! Store mutations log at `info`, table reads and writes at `debug`. Both stay
//! quiet unless asked for, since stdout carries the command's own output.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber, showing warnings and errors by default
///
/// `RUST_LOG=ironnote_core=debug` shows every table load and save.
pub fn init() {
    init_with_level("warn")
}

/// Install the global subscriber with `default_level` when `RUST_LOG` is unset
///
/// Events go to stderr in the compact format.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Route store logs into the test harness output; safe to call repeatedly
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
