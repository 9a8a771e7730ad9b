// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod exit;
pub mod lock;
pub mod logging;
pub mod notify;
pub mod orchestrator;
pub mod transcript;
pub mod types;

use crate::cli::CliArgs;
use crate::orchestrator::Orchestrator;

/// High-level entry point used by `main.rs`.
///
/// Runs one invocation against the real engine, notifiers and console and
/// returns the process exit code.
pub async fn run(args: CliArgs) -> i32 {
    let report = Orchestrator::new(args).run().await;
    exit::exit_code(&report.result)
}
