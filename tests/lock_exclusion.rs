// tests/lock_exclusion.rs

mod common;
use crate::common::builders::{StorageDir, full_run_config};
use crate::common::{FakeEngine, init_tracing, with_timeout};

use backup_runner::exec::{EngineOptions, OperationExecutor};
use backup_runner::lock::{LockAttempt, LockManager};
use backup_runner::transcript::Transcript;
use backup_runner::types::{Operation, OperationSet};

#[test]
fn second_acquire_reports_already_running() {
    init_tracing();
    let dir = StorageDir::new();
    let locks = LockManager::new(dir.path());

    let first = locks.acquire("photos").unwrap();
    assert!(matches!(first, LockAttempt::Acquired(_)));

    let second = locks.acquire("photos").unwrap();
    assert!(
        matches!(second, LockAttempt::AlreadyRunning),
        "a held lock must not be granted twice"
    );
    drop(first);
}

#[test]
fn lock_file_exists_only_while_held() {
    init_tracing();
    let dir = StorageDir::new();
    let locks = LockManager::new(dir.path());
    let path = dir.lock_path("photos");

    let LockAttempt::Acquired(lock) = locks.acquire("photos").unwrap() else {
        panic!("expected to acquire a free lock");
    };
    assert_eq!(lock.path(), path);
    assert_eq!(lock.name(), "photos");
    assert!(path.exists(), "lock file should exist while the lock is held");

    lock.release();
    assert!(!path.exists(), "lock file should be removed on release");

    let again = locks.acquire("photos").unwrap();
    assert!(matches!(again, LockAttempt::Acquired(_)));
}

#[test]
fn different_configurations_do_not_contend() {
    let dir = StorageDir::new();
    let locks = LockManager::new(dir.path());

    let photos = locks.acquire("photos").unwrap();
    let documents = locks.acquire("documents").unwrap();

    assert!(matches!(photos, LockAttempt::Acquired(_)));
    assert!(matches!(documents, LockAttempt::Acquired(_)));
}

#[test]
fn missing_lock_directory_is_created() {
    let dir = StorageDir::new();
    let nested = dir.path().join("locks").join("nested");
    let locks = LockManager::new(&nested);

    let attempt = locks.acquire("photos").unwrap();
    assert!(matches!(attempt, LockAttempt::Acquired(_)));
    assert!(nested.join("photos.lock").exists());
}

#[test]
fn unusable_lock_directory_is_an_io_error() {
    let dir = StorageDir::new();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "file in the way").unwrap();

    let locks = LockManager::new(&blocker);
    let err = locks.acquire("photos").unwrap_err();
    assert!(
        matches!(err, backup_runner::errors::RunnerError::LockIo { .. }),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn lock_is_released_when_execution_fails() {
    init_tracing();
    let dir = StorageDir::new();
    let locks = LockManager::new(dir.path());
    let config = full_run_config("photos");
    let engine = FakeEngine::new().failing_on(Operation::Backup);

    let result = {
        let LockAttempt::Acquired(_lock) = locks.acquire("photos").unwrap() else {
            panic!("expected to acquire a free lock");
        };
        let mut transcript = Transcript::with_console(
            false,
            Box::new(std::io::sink()),
            Box::new(std::io::sink()),
        );
        let mut executor = OperationExecutor::new(engine.clone(), EngineOptions::default());
        with_timeout(executor.run(&config, OperationSet::all(), &mut transcript)).await
    };

    assert!(result.is_err());
    assert!(!dir.lock_path("photos").exists());
    assert!(matches!(
        locks.acquire("photos").unwrap(),
        LockAttempt::Acquired(_)
    ));
}
