// src/exit.rs

//! Process exit codes.
//!
//! This is the only place a run result becomes a number.

use crate::errors::RunnerError;
use crate::orchestrator::RunResult;
use crate::types::RunOutcome;

pub const SUCCESS: i32 = 0;
/// Validation or configuration error without a more specific code.
pub const GENERAL_ERROR: i32 = 1;
/// Command-line error, or the storage directory / global configuration
/// could not be used.
pub const USAGE_ERROR: i32 = 2;
/// A skip or failure notification could not be delivered.
pub const NOTIFICATION_FAILED: i32 = 5;
/// Another run of the same configuration holds the lock.
pub const SKIPPED: i32 = 75;
pub const LOCK_IO_ERROR: i32 = 201;
pub const EXECUTION_FAILED: i32 = 500;

pub fn exit_code(result: &RunResult) -> i32 {
    match result {
        RunResult::Version => SUCCESS,
        RunResult::NotificationTest(Ok(())) => SUCCESS,
        RunResult::NotificationTest(Err(_)) => GENERAL_ERROR,
        RunResult::Completed {
            outcome,
            notification,
        } => match (outcome, notification) {
            (RunOutcome::Success, _) => SUCCESS,
            (_, Err(_)) => NOTIFICATION_FAILED,
            (RunOutcome::Skipped(_), Ok(())) => SKIPPED,
            (RunOutcome::Failed(_), Ok(())) => EXECUTION_FAILED,
        },
        RunResult::Aborted(err) => error_code(err),
    }
}

fn error_code(err: &RunnerError) -> i32 {
    match err {
        RunnerError::Usage(_) | RunnerError::GlobalConfig(_) => USAGE_ERROR,
        RunnerError::LockIo { .. } => LOCK_IO_ERROR,
        RunnerError::Execution { .. } => EXECUTION_FAILED,
        RunnerError::Notification(_) => NOTIFICATION_FAILED,
        RunnerError::ConfigError(_)
        | RunnerError::ConfigReported(_)
        | RunnerError::Validation(_)
        | RunnerError::IoError(_)
        | RunnerError::TomlError(_)
        | RunnerError::Other(_) => GENERAL_ERROR,
    }
}
