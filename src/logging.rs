//! Diagnostics on stderr.
//!
//! Plan output owns stdout, so every event goes to stderr. The filter is
//! read from `PGPOW_LOG` using the usual `EnvFilter` directive syntax and
//! defaults to `warn`.

use std::io::{self, IsTerminal};

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "PGPOW_LOG";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}
