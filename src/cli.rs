// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `backup-runner`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "backup-runner",
    about = "Run scheduled backup, copy, prune and check operations for one configuration.",
    long_about = None,
    disable_version_flag = true
)]
pub struct CliArgs {
    /// Configuration to run: a name under the storage directory or a path
    /// to a TOML file. Required unless testing notifications.
    #[arg(short = 'f', long = "config", value_name = "NAME")]
    pub config: Option<String>,

    /// Global configuration name (default: `backup-runner`).
    #[arg(short = 'g', long = "global-config", value_name = "NAME")]
    pub global_config: Option<String>,

    /// Directory holding configuration, lock and log files
    /// (default: `$HOME/.backup-runner`).
    #[arg(long = "sd", value_name = "DIR")]
    pub storage_dir: Option<String>,

    /// Perform all operations (backup, copy, prune, check).
    #[arg(short = 'a', long = "all")]
    pub all: bool,

    /// Perform the backup operation.
    #[arg(long)]
    pub backup: bool,

    /// Perform the copy operation.
    #[arg(long)]
    pub copy: bool,

    /// Perform the prune operation.
    #[arg(long)]
    pub prune: bool,

    /// Perform the check operation.
    #[arg(long)]
    pub check: bool,

    /// Send a test message through the configured notifiers and exit.
    #[arg(long = "tn", alias = "test-notifications")]
    pub test_notifications: bool,

    /// Enable debug output (implies verbose).
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Only produce output on error. Refused without a failure notifier.
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Enable verbose output (overrides quiet).
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Display version information and exit.
    #[arg(long)]
    pub version: bool,

    /// Diagnostic logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `BACKUP_RUNNER_LOG` or a level derived from -d/-v is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Stray positional arguments; any are rejected.
    #[arg(hide = true, value_name = "ARGS")]
    pub extra: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
