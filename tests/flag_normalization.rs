// tests/flag_normalization.rs

mod common;
use crate::common::builders::CliArgsBuilder;

use proptest::prelude::*;

use backup_runner::orchestrator::RunFlags;
use backup_runner::orchestrator::flags::{NOTICE_QUIET_REFUSED, NOTICE_VERBOSE_OVERRIDES_QUIET};
use backup_runner::types::OperationSet;

#[test]
fn all_selects_every_operation() {
    let mut flags = RunFlags::from_args(&CliArgsBuilder::new().all().build());
    flags.normalize(true);
    assert_eq!(flags.operations, OperationSet::all());
}

#[test]
fn verbose_overrides_quiet_with_notice() {
    let mut flags = RunFlags::from_args(&CliArgsBuilder::new().quiet().verbose().build());
    let notices = flags.normalize(true);
    assert!(!flags.quiet);
    assert_eq!(notices, vec![NOTICE_VERBOSE_OVERRIDES_QUIET]);
}

#[test]
fn quiet_without_failure_notifier_is_refused() {
    let mut flags = RunFlags::from_args(&CliArgsBuilder::new().quiet().build());
    let notices = flags.normalize(false);
    assert!(!flags.quiet);
    assert_eq!(notices, vec![NOTICE_QUIET_REFUSED]);
}

#[test]
fn quiet_with_failure_notifier_is_kept() {
    let mut flags = RunFlags::from_args(&CliArgsBuilder::new().quiet().backup().build());
    let notices = flags.normalize(true);
    assert!(flags.quiet);
    assert!(notices.is_empty());
}

fn raw_flags() -> impl Strategy<Value = RunFlags> {
    (
        any::<[bool; 4]>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(ops, all, debug, verbose, quiet)| RunFlags {
            operations: OperationSet {
                backup: ops[0],
                copy: ops[1],
                prune: ops[2],
                check: ops[3],
            },
            all,
            debug,
            verbose,
            quiet,
            ..RunFlags::default()
        })
}

proptest! {
    #[test]
    fn normalized_flags_hold_invariants(mut flags in raw_flags(), has_notifier in any::<bool>()) {
        let before = flags;
        let notices = flags.normalize(has_notifier);

        if before.all {
            prop_assert_eq!(flags.operations, OperationSet::all());
        } else {
            prop_assert_eq!(flags.operations, before.operations);
        }
        if before.debug {
            prop_assert!(flags.verbose);
        }
        prop_assert!(!(flags.verbose && flags.quiet));
        if flags.quiet {
            prop_assert!(has_notifier);
        }
        // A notice is shown exactly when quiet was asked for and dropped.
        prop_assert_eq!(!notices.is_empty(), before.quiet && !flags.quiet);
        prop_assert!(notices.len() <= 1);
    }

    #[test]
    fn normalize_is_idempotent(mut flags in raw_flags(), has_notifier in any::<bool>()) {
        flags.normalize(has_notifier);
        let once = flags;
        let notices = flags.normalize(has_notifier);
        prop_assert_eq!(flags, once);
        prop_assert!(notices.is_empty());
    }
}
