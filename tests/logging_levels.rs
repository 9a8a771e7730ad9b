// tests/logging_levels.rs

mod common;
use crate::common::builders::CliArgsBuilder;

use tracing::Level;

use backup_runner::cli::LogLevel;
use backup_runner::logging::resolve_level;

#[test]
fn default_is_warn() {
    assert_eq!(resolve_level(&CliArgsBuilder::new().build(), None), Level::WARN);
}

#[test]
fn quiet_only_shows_errors() {
    let args = CliArgsBuilder::new().quiet().build();
    assert_eq!(resolve_level(&args, None), Level::ERROR);
}

#[test]
fn verbose_beats_quiet() {
    let args = CliArgsBuilder::new().quiet().verbose().build();
    assert_eq!(resolve_level(&args, None), Level::INFO);
}

#[test]
fn env_overrides_flags_and_ignores_garbage() {
    let args = CliArgsBuilder::new().quiet().build();
    assert_eq!(resolve_level(&args, Some("debug")), Level::DEBUG);
    assert_eq!(resolve_level(&args, Some("not-a-level")), Level::ERROR);
}

#[test]
fn explicit_flag_wins_over_env() {
    let mut args = CliArgsBuilder::new().build();
    args.log_level = Some(LogLevel::Trace);
    assert_eq!(resolve_level(&args, Some("error")), Level::TRACE);
}
