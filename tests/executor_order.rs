// tests/executor_order.rs

mod common;
use crate::common::builders::{RunConfigBuilder, full_run_config};
use crate::common::{FakeEngine, init_tracing, messages, with_timeout};

use backup_runner::errors::RunnerError;
use backup_runner::exec::{EngineOptions, OperationExecutor, plan};
use backup_runner::transcript::Transcript;
use backup_runner::types::{Operation, OperationSet};

fn silent_transcript() -> Transcript {
    Transcript::with_console(false, Box::new(std::io::sink()), Box::new(std::io::sink()))
}

#[tokio::test]
async fn all_operations_run_in_fixed_order() {
    init_tracing();
    let config = full_run_config("photos");
    let engine = FakeEngine::new();
    let mut transcript = silent_transcript();

    let mut executor = OperationExecutor::new(engine.clone(), EngineOptions::default());
    with_timeout(executor.run(&config, OperationSet::all(), &mut transcript))
        .await
        .unwrap();

    assert_eq!(
        engine.operations(),
        vec![
            Operation::Backup,
            Operation::Backup,
            Operation::Copy,
            Operation::Prune,
            Operation::Check,
        ]
    );
}

#[tokio::test]
async fn only_requested_operations_run() {
    let config = full_run_config("photos");
    let engine = FakeEngine::new();
    let mut transcript = silent_transcript();

    // Requested out of order on purpose; execution order is still fixed.
    let ops: OperationSet = [Operation::Check, Operation::Backup].into_iter().collect();
    let mut executor = OperationExecutor::new(engine.clone(), EngineOptions::default());
    with_timeout(executor.run(&config, ops, &mut transcript))
        .await
        .unwrap();

    assert_eq!(
        engine.operations(),
        vec![Operation::Backup, Operation::Backup, Operation::Check]
    );
}

#[tokio::test]
async fn failure_stops_later_operations() {
    init_tracing();
    let config = full_run_config("photos");
    let engine = FakeEngine::new().failing_on(Operation::Copy);
    let mut transcript = silent_transcript();

    let mut executor = OperationExecutor::new(engine.clone(), EngineOptions::default());
    let err = with_timeout(executor.run(&config, OperationSet::all(), &mut transcript))
        .await
        .unwrap_err();

    match err {
        RunnerError::Execution { operation, reason } => {
            assert_eq!(operation, "copy");
            assert!(reason.contains("copy from 'default' to 'offsite'"), "{reason}");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    assert_eq!(
        engine.operations(),
        vec![Operation::Backup, Operation::Backup, Operation::Copy],
        "prune and check must not run after a failed copy"
    );

    let msgs = messages(transcript.lines());
    assert_eq!(
        msgs.last().copied(),
        Some("Error: copy from 'default' to 'offsite' exited with status 1")
    );
}

#[tokio::test]
async fn transcript_records_progress_and_engine_output() {
    let config = RunConfigBuilder::new("/srv/data")
        .storage("default")
        .build("docs");
    let engine = FakeEngine::new();
    let mut transcript = silent_transcript();

    let options = EngineOptions {
        verbose: true,
        debug: false,
    };
    let mut executor = OperationExecutor::new(engine, options);
    with_timeout(executor.run(&config, OperationSet::all(), &mut transcript))
        .await
        .unwrap();

    assert_eq!(
        messages(transcript.lines()),
        vec![
            "Beginning backup to storage 'default'",
            "Executing: -log -verbose backup -storage default -threads 1 -stats",
            "engine output for backup to storage 'default'",
            "Completed backup to storage 'default'",
        ]
    );
}

#[test]
fn plan_builds_engine_arguments() {
    let config = full_run_config("photos");

    let copy = plan(&config, Operation::Copy, EngineOptions::default());
    assert_eq!(copy.len(), 1);
    assert_eq!(
        copy[0].args,
        vec![
            "-log", "copy", "-from", "default", "-to", "offsite", "-threads", "1"
        ]
    );

    let prune = plan(
        &config,
        Operation::Prune,
        EngineOptions {
            verbose: true,
            debug: true,
        },
    );
    assert_eq!(
        prune[0].to_string(),
        "-log -debug prune -storage default -keep 0:365 -keep 7:30"
    );

    let check = plan(&config, Operation::Check, EngineOptions::default());
    assert_eq!(check[0].label, "check of storage 'default'");
}

#[test]
fn plan_is_empty_for_unconfigured_operation() {
    let config = RunConfigBuilder::new("/srv/data")
        .storage("default")
        .build("docs");

    assert!(plan(&config, Operation::Copy, EngineOptions::default()).is_empty());
    assert!(plan(&config, Operation::Prune, EngineOptions::default()).is_empty());
    assert_eq!(plan(&config, Operation::Backup, EngineOptions::default()).len(), 1);
}
