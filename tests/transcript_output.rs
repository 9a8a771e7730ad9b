// tests/transcript_output.rs

mod common;
use crate::common::builders::StorageDir;
use crate::common::{SharedBuffer, messages};

use std::fs;

use backup_runner::transcript::{Destination, RunLog, Transcript};

fn console_transcript(quiet: bool) -> (Transcript, SharedBuffer, SharedBuffer) {
    let stdout = SharedBuffer::new();
    let stderr = SharedBuffer::new();
    let transcript = Transcript::with_console(quiet, stdout.boxed(), stderr.boxed());
    (transcript, stdout, stderr)
}

#[test]
fn normal_messages_are_timestamped_on_stdout() {
    let (mut transcript, stdout, stderr) = console_transcript(false);

    transcript.info("Beginning backup");

    let out = stdout.contents();
    let line = out.lines().next().unwrap();
    let (stamp, msg) = line.split_once(' ').unwrap();
    assert_eq!(stamp.len(), "HH:MM:SS".len());
    assert_eq!(stamp.matches(':').count(), 2);
    assert_eq!(msg, "Beginning backup");
    assert!(stderr.contents().is_empty());
}

#[test]
fn quiet_suppresses_stdout_but_still_records() {
    let (mut transcript, stdout, _stderr) = console_transcript(true);

    transcript.info("Beginning backup");
    transcript.emit(Destination::Normal, "Completed backup");

    assert!(stdout.contents().is_empty());
    assert_eq!(
        messages(transcript.lines()),
        vec!["Beginning backup", "Completed backup"]
    );
}

#[test]
fn errors_reach_stderr_without_timestamp_even_when_quiet() {
    let (mut transcript, stdout, stderr) = console_transcript(true);

    transcript.error("Error: something broke");

    assert_eq!(stderr.contents(), "Error: something broke\n");
    assert!(stdout.contents().is_empty());
    assert_eq!(messages(transcript.lines()), vec!["Error: something broke"]);
}

#[test]
fn body_joins_lines_in_order() {
    let (mut transcript, _stdout, _stderr) = console_transcript(false);
    assert!(transcript.is_empty());

    transcript.info("one");
    transcript.error("two");
    transcript.info("three");

    let body = transcript.body();
    let lines: Vec<&str> = body.split('\n').collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with(" one"));
    assert!(lines[1].ends_with(" two"));
    assert!(lines[2].ends_with(" three"));
}

#[test]
fn echo_is_not_recorded() {
    let (mut transcript, stdout, _stderr) = console_transcript(false);

    transcript.echo("Version: 1.0.0");

    assert_eq!(stdout.contents(), "Version: 1.0.0\n");
    assert!(transcript.is_empty());
}

#[test]
fn attached_run_log_mirrors_messages() {
    let dir = StorageDir::new();
    let (mut transcript, _stdout, _stderr) = console_transcript(true);

    transcript.info("before the log");
    let log = RunLog::open(&dir.path().join("logs"), "photos", 3).unwrap();
    let log_path = dir.path().join("logs").join("photos.log");
    transcript.attach_log(log);
    transcript.info("Beginning backup");
    transcript.error("Error: backup failed");

    let contents = fs::read_to_string(log_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2, "only messages after attach are logged");
    assert!(lines[0].ends_with(" Beginning backup"));
    assert!(lines[1].ends_with(" Error: backup failed"));
    // Date and time prefix.
    assert_eq!(lines[0].split(' ').next().unwrap().matches('/').count(), 2);
}

#[test]
fn detached_run_log_stops_receiving_messages() {
    let dir = StorageDir::new();
    let (mut transcript, _stdout, _stderr) = console_transcript(true);

    let log = RunLog::open(&dir.path().join("logs"), "photos", 3).unwrap();
    transcript.attach_log(log);
    transcript.info("inside the lock");
    assert!(transcript.detach_log().is_some());
    transcript.error("Error: after the lock");

    let contents = fs::read_to_string(dir.path().join("logs").join("photos.log")).unwrap();
    assert_eq!(contents.lines().count(), 1);
    assert!(contents.contains("inside the lock"));
    assert_eq!(transcript.lines().len(), 2, "the transcript keeps every line");
    assert!(transcript.detach_log().is_none());
}

#[test]
fn run_log_rotates_and_keeps_bounded_history() {
    let dir = StorageDir::new();
    let logs = dir.path().join("logs");

    for run in 0..5 {
        let mut log = RunLog::open(&logs, "photos", 3).unwrap();
        log.append(&format!("run {run}"));
    }

    let read = |name: &str| fs::read_to_string(logs.join(name)).unwrap();
    assert!(read("photos.log").ends_with("run 4\n"));
    assert!(read("photos.log.1").ends_with("run 3\n"));
    assert!(read("photos.log.2").ends_with("run 2\n"));
    assert!(!logs.join("photos.log.3").exists());
}

#[test]
fn run_log_with_single_generation_keeps_no_history() {
    let dir = StorageDir::new();
    let logs = dir.path().join("logs");

    for run in 0..2 {
        let mut log = RunLog::open(&logs, "photos", 1).unwrap();
        log.append(&format!("run {run}"));
    }

    assert!(fs::read_to_string(logs.join("photos.log")).unwrap().ends_with("run 1\n"));
    assert!(!logs.join("photos.log.1").exists());
}
