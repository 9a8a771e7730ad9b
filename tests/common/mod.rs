#![allow(dead_code)]

use std::future::Future;

use tokio::time::{Duration, timeout};

pub use backup_runner_test_utils::builders;
pub use backup_runner_test_utils::fake_engine::FakeEngine;
pub use backup_runner_test_utils::recording_notifier::RecordingNotifier;
pub use backup_runner_test_utils::{SharedBuffer, init_tracing};

/// Fail the test instead of hanging if `fut` does not finish in time.
pub async fn with_timeout<F: Future>(fut: F) -> F::Output {
    timeout(Duration::from_secs(10), fut)
        .await
        .expect("test future timed out")
}

/// Strip the `HH:MM:SS ` prefix from a transcript line.
pub fn message(line: &str) -> &str {
    line.split_once(' ').map(|(_, msg)| msg).unwrap_or(line)
}

pub fn messages(lines: &[String]) -> Vec<&str> {
    lines.iter().map(|l| message(l)).collect()
}
