// src/exec/backend.rs

//! Pluggable engine backend abstraction.
//!
//! The executor talks to an `EngineBackend` instead of spawning processes
//! itself, so tests can swap in a fake engine.
//!
//! - `CommandEngine` is the production implementation. It runs the engine
//!   binary inside the repository directory and streams every output line
//!   into the transcript as soon as it is read.
//! - Tests provide their own backend that records invocations and decides
//!   which of them fail.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::{Result, RunnerError};
use crate::exec::invocation::Invocation;
use crate::transcript::Transcript;

/// Trait abstracting how one engine invocation is carried out.
pub trait EngineBackend: Send {
    /// Run `invocation` to completion, appending its output to `transcript`
    /// as it is produced. Any non-success is an `Err`.
    fn run<'a>(
        &'a mut self,
        invocation: &'a Invocation,
        transcript: &'a mut Transcript,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

/// Engine backend that spawns the engine binary.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    binary: String,
    working_dir: PathBuf,
}

impl CommandEngine {
    pub fn new(binary: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            working_dir: working_dir.into(),
        }
    }
}

impl EngineBackend for CommandEngine {
    fn run<'a>(
        &'a mut self,
        invocation: &'a Invocation,
        transcript: &'a mut Transcript,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            run_process(&self.binary, &self.working_dir, invocation, transcript).await
        })
    }
}

async fn run_process(
    binary: &str,
    working_dir: &Path,
    invocation: &Invocation,
    transcript: &mut Transcript,
) -> Result<()> {
    info!(
        operation = %invocation.operation,
        binary,
        args = %invocation,
        "starting engine process"
    );

    let mut child = Command::new(binary)
        .args(&invocation.args)
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("spawning '{binary}' for {}", invocation.label))?;

    let stdout = child.stdout.take().context("engine stdout was not captured")?;
    let stderr = child.stderr.take().context("engine stderr was not captured")?;
    let mut out_lines = BufReader::new(stdout).lines();
    let mut err_lines = BufReader::new(stderr).lines();
    let (mut out_open, mut err_open) = (true, true);

    // Both pipes are drained concurrently so neither can fill up and stall
    // the engine.
    while out_open || err_open {
        tokio::select! {
            line = out_lines.next_line(), if out_open => match line {
                Ok(Some(line)) => transcript.info(line),
                Ok(None) => out_open = false,
                Err(err) => {
                    debug!(error = %err, "engine stdout read failed");
                    out_open = false;
                }
            },
            line = err_lines.next_line(), if err_open => match line {
                Ok(Some(line)) => transcript.info(line),
                Ok(None) => err_open = false,
                Err(err) => {
                    debug!(error = %err, "engine stderr read failed");
                    err_open = false;
                }
            },
        }
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for '{binary}' ({})", invocation.label))?;

    info!(
        operation = %invocation.operation,
        exit_code = status.code().unwrap_or(-1),
        success = status.success(),
        "engine process exited"
    );

    if status.success() {
        Ok(())
    } else {
        Err(RunnerError::Execution {
            operation: invocation.operation.to_string(),
            reason: match status.code() {
                Some(code) => format!("{} exited with status {code}", invocation.label),
                None => format!("{} was terminated by a signal", invocation.label),
            },
        })
    }
}

impl<B: EngineBackend + ?Sized> EngineBackend for Box<B> {
    fn run<'a>(
        &'a mut self,
        invocation: &'a Invocation,
        transcript: &'a mut Transcript,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        (**self).run(invocation, transcript)
    }
}
