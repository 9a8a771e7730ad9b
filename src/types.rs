use std::fmt;

use serde::Serialize;

/// One of the engine operations a run can perform.
///
/// The declaration order is the execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    Backup,
    Copy,
    Prune,
    Check,
}

impl Operation {
    /// All operations in the order the executor runs them.
    pub const ORDERED: [Operation; 4] = [
        Operation::Backup,
        Operation::Copy,
        Operation::Prune,
        Operation::Check,
    ];

    /// Engine sub-command for this operation.
    pub fn command(self) -> &'static str {
        match self {
            Operation::Backup => "backup",
            Operation::Copy => "copy",
            Operation::Prune => "prune",
            Operation::Check => "check",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

/// The set of operations requested for a run.
///
/// Built once from the command line and never mutated afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationSet {
    pub backup: bool,
    pub copy: bool,
    pub prune: bool,
    pub check: bool,
}

impl OperationSet {
    pub fn all() -> Self {
        Self {
            backup: true,
            copy: true,
            prune: true,
            check: true,
        }
    }

    pub fn contains(&self, op: Operation) -> bool {
        match op {
            Operation::Backup => self.backup,
            Operation::Copy => self.copy,
            Operation::Prune => self.prune,
            Operation::Check => self.check,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.backup || self.copy || self.prune || self.check)
    }

    /// Requested operations in execution order.
    pub fn iter(&self) -> impl Iterator<Item = Operation> + '_ {
        Operation::ORDERED
            .into_iter()
            .filter(move |op| self.contains(*op))
    }
}

impl FromIterator<Operation> for OperationSet {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        let mut set = OperationSet::default();
        for op in iter {
            match op {
                Operation::Backup => set.backup = true,
                Operation::Copy => set.copy = true,
                Operation::Prune => set.prune = true,
                Operation::Check => set.check = true,
            }
        }
        set
    }
}

/// Result of a run that got as far as attempting the lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Success,
    /// Another run of the same configuration holds the lock.
    Skipped(String),
    /// One of the requested operations failed.
    Failed(String),
}

/// Which kind of message a notifier is asked to deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Skip,
    Failure,
    Test,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Skip => "skip",
            NotificationKind::Failure => "failure",
            NotificationKind::Test => "test",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
