// src/orchestrator/flags.rs

//! Run flag normalisation.
//!
//! Rules, applied in this order:
//! - `all` requests every operation;
//! - `debug` implies `verbose`;
//! - `verbose` clears `quiet`;
//! - `quiet` is refused when no failure notifier is configured.
//!
//! Each rule that changes `quiet` produces a notice for the operator.

use crate::cli::CliArgs;
use crate::types::OperationSet;

pub const NOTICE_VERBOSE_OVERRIDES_QUIET: &str =
    "Notice: Quiet mode ignored; verbose output was requested";
pub const NOTICE_QUIET_REFUSED: &str =
    "Notice: Quiet mode refused; a failure notifier should be configured";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunFlags {
    pub operations: OperationSet,
    pub all: bool,
    pub debug: bool,
    pub verbose: bool,
    pub quiet: bool,
    pub test_notifications: bool,
    pub version: bool,
}

impl RunFlags {
    /// Flags exactly as given on the command line.
    pub fn from_args(args: &CliArgs) -> Self {
        Self {
            operations: OperationSet {
                backup: args.backup,
                copy: args.copy,
                prune: args.prune,
                check: args.check,
            },
            all: args.all,
            debug: args.debug,
            verbose: args.verbose,
            quiet: args.quiet,
            test_notifications: args.test_notifications,
            version: args.version,
        }
    }

    /// Apply every normalisation rule. Returns the notices to show.
    pub fn normalize(&mut self, has_failure_notifier: bool) -> Vec<&'static str> {
        if self.all {
            self.operations = OperationSet::all();
        }
        if self.debug {
            self.verbose = true;
        }

        let mut notices = Vec::new();
        if self.verbose && self.quiet {
            self.quiet = false;
            notices.push(NOTICE_VERBOSE_OVERRIDES_QUIET);
        }
        notices.extend(self.refuse_quiet_without_notifier(has_failure_notifier));
        notices
    }

    /// Clear `quiet` if nothing would report a failure.
    pub fn refuse_quiet_without_notifier(
        &mut self,
        has_failure_notifier: bool,
    ) -> Option<&'static str> {
        if self.quiet && !has_failure_notifier {
            self.quiet = false;
            return Some(NOTICE_QUIET_REFUSED);
        }
        None
    }
}
