// src/logging.rs

//! Diagnostic output via `tracing`.
//!
//! Diagnostics are for whoever debugs the runner itself and always go to
//! stderr. The operator-facing record of a run is the transcript; failures
//! reported there are logged at `debug` here so they are not printed twice.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::fmt;

use crate::cli::{CliArgs, LogLevel};

/// Environment variable consulted when `--log-level` is absent.
pub const LOG_ENV: &str = "BACKUP_RUNNER_LOG";

/// Install the global subscriber. Call once, before the run starts.
pub fn init_logging(args: &CliArgs) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();
    let level = resolve_level(args, env.as_deref());

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Pick the diagnostic level.
///
/// An explicit `--log-level` wins, then a recognised `BACKUP_RUNNER_LOG`
/// value. Otherwise the run flags decide: `-d` debug, `-v` info, `-q` error
/// only, and warn by default.
pub fn resolve_level(args: &CliArgs, env: Option<&str>) -> Level {
    if let Some(level) = args.log_level {
        return match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        };
    }

    if let Some(level) = env.and_then(|value| value.trim().parse::<Level>().ok()) {
        return level;
    }

    if args.debug {
        Level::DEBUG
    } else if args.verbose {
        Level::INFO
    } else if args.quiet {
        Level::ERROR
    } else {
        Level::WARN
    }
}
