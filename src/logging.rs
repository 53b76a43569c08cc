//! Diagnostic logging setup
//!
//! Logs go to stderr so table and JSON output on stdout stay clean. `RUST_LOG`
//! is honored, with the crate's own level taken from flags or configuration.

use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{LogConfig, LogFormat};

/// Picks the crate log level: CLI flags take precedence over config
pub fn effective_level(configured: &str, verbose: bool, quiet: bool) -> String {
    if quiet {
        "error".to_string()
    } else if verbose {
        "debug".to_string()
    } else {
        configured.to_string()
    }
}

fn crate_directive(level: &str) -> Directive {
    format!("fipequote={}", level)
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into())
}

/// Installs the global subscriber
///
/// Does nothing if a subscriber is already installed.
pub fn init(config: &LogConfig, verbose: bool, quiet: bool) {
    let level = effective_level(&config.level, verbose, quiet);
    let filter = EnvFilter::from_default_env().add_directive(crate_directive(&level));

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };

    if result.is_ok() {
        tracing::debug!(level = %level, format = ?config.format, "Logging initialized");
    }
}
