//! # pgpow
//!
//! PostgreSQL tools that go POW!
//!
//! # Quick Start
//!
//! ```bash
//! # Highlight the expensive parts of a plan
//! psql -XqAt -c "$(pgpow explain query 'SELECT * FROM orders')" | pgpow explain format
//!
//! # Same, from a saved plan
//! pgpow explain format plan.txt --color always | less -R
//!
//! # Administration queries
//! pgpow query activity long-running --compact | psql
//! pgpow query maintenance dead-tuples --limit=
//! pgpow query list
//! ```
//!
//! # Configuration
//!
//! `explain format` reads its configuration from (in order of precedence):
//!
//! 1. Command-line arguments
//! 2. Environment variables (`PGPOW_CRITICAL_SHARE`, `PGPOW_ELEVATED_SHARE`,
//!    `PGPOW_COLOR`)
//! 3. `.pgpow.toml` in current directory
//! 4. `~/.config/pgpow/config.toml`
//!
//! Other commands never read it, so a broken config file cannot stop them.
//!
//! Diagnostics are written to stderr; set `PGPOW_LOG=debug` to see them.
//!
//! # Exit Codes
//!
//! - `0` - Success
//! - `1` - Unreadable input, unwritable output, bad configuration or usage
//! - `2` - Invalid command-line arguments

use std::process;

use clap::Parser;
use pgpow::{app, cli::Cli, config::Config, error::AppResult, logging};

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run() -> AppResult<i32> {
    let cli = Cli::parse();
    logging::init();
    app::execute(cli.command, Config::load)
}
