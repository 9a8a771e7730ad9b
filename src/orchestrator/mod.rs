// src/orchestrator/mod.rs

//! Top-level run state machine.
//!
//! `Start → ArgsValidated → ConfigLoaded → LockAcquired → Executed →
//! Notified → Done`. Anything that fails before the lock is taken ends the
//! run without a notification. Once the lock has been attempted the run
//! produces a [`RunOutcome`], and exactly one of {nothing, skip
//! notification, failure notification} is dispatched for it.
//!
//! All state for one invocation lives in [`RunContext`]; exit codes are
//! derived from the returned [`RunResult`] in [`crate::exit`].

pub mod flags;

use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{self, GlobalConfig, RunConfiguration};
use crate::errors::{Result, RunnerError};
use crate::exec::{CommandEngine, EngineBackend, EngineOptions, OperationExecutor};
use crate::lock::{LockAttempt, LockManager};
use crate::notify::Dispatcher;
use crate::transcript::{RunLog, Transcript};
use crate::types::RunOutcome;

pub use flags::RunFlags;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_HASH: &str = match option_env!("BACKUP_RUNNER_GIT_HASH") {
    Some(hash) => hash,
    None => "<unknown>",
};

pub const SKIP_REASON: &str = "backup already running and will be skipped";
pub const FAILURE_REASON: &str = "backup failed, check the logs for details";

/// How an invocation ended.
#[derive(Debug)]
pub enum RunResult {
    /// `--version` was printed.
    Version,
    /// `--tn` was handled.
    NotificationTest(Result<()>),
    /// The lock was attempted; `notification` is the delivery result for
    /// the skip/failure path (`Ok` when none was needed).
    Completed {
        outcome: RunOutcome,
        notification: Result<()>,
    },
    /// Stopped before the lock was attempted, or the lock itself failed.
    Aborted(RunnerError),
}

/// Result plus the transcript, for callers that want to inspect the run.
#[derive(Debug)]
pub struct RunReport {
    pub result: RunResult,
    pub transcript: Vec<String>,
}

/// Everything one invocation knows, built at start and filled in as the
/// state machine advances.
#[derive(Debug)]
pub struct RunContext {
    pub flags: RunFlags,
    pub storage_dir: Option<PathBuf>,
    pub global: Option<GlobalConfig>,
    pub config: Option<RunConfiguration>,
    pub transcript: Transcript,
}

pub struct Orchestrator {
    args: CliArgs,
    console: Option<(Box<dyn Write + Send>, Box<dyn Write + Send>)>,
    engine: Option<Box<dyn EngineBackend>>,
    dispatcher: Option<Dispatcher>,
}

impl Orchestrator {
    pub fn new(args: CliArgs) -> Self {
        Self {
            args,
            console: None,
            engine: None,
            dispatcher: None,
        }
    }

    /// Echo to these writers instead of the process stdout/stderr.
    pub fn with_console(
        mut self,
        stdout: Box<dyn Write + Send>,
        stderr: Box<dyn Write + Send>,
    ) -> Self {
        self.console = Some((stdout, stderr));
        self
    }

    /// Use this backend instead of spawning the configured engine binary.
    pub fn with_engine(mut self, engine: Box<dyn EngineBackend>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Use this dispatcher instead of one built from the notifier settings.
    pub fn with_dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub async fn run(mut self) -> RunReport {
        let flags = RunFlags::from_args(&self.args);
        let transcript = match self.console.take() {
            Some((stdout, stderr)) => Transcript::with_console(flags.quiet, stdout, stderr),
            None => Transcript::new(flags.quiet),
        };
        let mut ctx = RunContext {
            flags,
            storage_dir: None,
            global: None,
            config: None,
            transcript,
        };

        let result = self.drive(&mut ctx).await;
        debug!(?result, "run finished");

        RunReport {
            result,
            transcript: ctx.transcript.lines().to_vec(),
        }
    }

    async fn drive(&mut self, ctx: &mut RunContext) -> RunResult {
        // Start → ArgsValidated
        if !self.args.extra.is_empty() {
            return abort(
                ctx,
                RunnerError::Usage(format!(
                    "Unrecognized arguments specified on command line: {:?}",
                    self.args.extra
                )),
            );
        }

        if ctx.flags.version {
            ctx.transcript
                .echo(&format!("Version: {VERSION}, Git Hash: {GIT_HASH}"));
            return RunResult::Version;
        }

        let storage_dir = match config::resolve_storage_dir(self.args.storage_dir.as_deref()) {
            Ok(dir) => dir,
            Err(err) => return abort(ctx, global_error(err)),
        };
        let global = match config::load_global(&storage_dir, self.args.global_config.as_deref()) {
            Ok(global) => global,
            Err(err) => {
                ctx.transcript.set_quiet(false);
                return abort(ctx, global_error(err));
            }
        };
        ctx.storage_dir = Some(storage_dir.clone());

        let has_failure_notifier = match &self.dispatcher {
            Some(dispatcher) => dispatcher.has_failure_notifier(),
            None => global.notifications.has_failure_notifier(),
        };
        for notice in ctx.flags.normalize(has_failure_notifier) {
            ctx.transcript.error(notice);
        }
        ctx.transcript.set_quiet(ctx.flags.quiet);

        if ctx.flags.test_notifications {
            let result = self.test_notifications(&global).await;
            if let Err(err) = &result {
                ctx.transcript.error(format!("Error: {err}"));
            }
            ctx.global = Some(global);
            return RunResult::NotificationTest(result);
        }

        // ArgsValidated → ConfigLoaded
        let Some(selector) = self.args.config.clone().filter(|s| !s.trim().is_empty()) else {
            return abort(
                ctx,
                RunnerError::Usage(
                    "Mandatory parameter -f is not specified (must be specified)".to_string(),
                ),
            );
        };

        let run_config = match config::load_run_config(&storage_dir, &selector) {
            Ok(cfg) => cfg,
            Err(err) => {
                ctx.transcript.error(format!("Error: {err}"));
                return abort(ctx, RunnerError::ConfigReported(selector));
            }
        };

        if self.dispatcher.is_none() {
            let has_failure_notifier = run_config
                .effective_notifications(&global)
                .has_failure_notifier();
            if let Some(notice) = ctx.flags.refuse_quiet_without_notifier(has_failure_notifier) {
                ctx.transcript.error(notice);
                ctx.transcript.set_quiet(false);
            }
        }

        if ctx.flags.operations.is_empty() {
            return abort(
                ctx,
                RunnerError::Validation(
                    "No operations to perform (specify --backup, --copy, --prune, --check, or -a (all))"
                        .to_string(),
                ),
            );
        }

        let dispatcher = match self.dispatcher.take() {
            Some(dispatcher) => dispatcher,
            None => match Dispatcher::from_config(run_config.effective_notifications(&global)) {
                Ok(dispatcher) => dispatcher,
                Err(err) => return abort(ctx, err),
            },
        }
        .for_config(run_config.name.clone());

        ctx.global = Some(global);
        ctx.config = Some(run_config);

        // ConfigLoaded → LockAcquired → Executed
        let outcome = match self.execute_locked(ctx).await {
            Ok(outcome) => outcome,
            Err(err) => return abort(ctx, err),
        };

        // Executed → Notified
        let notification = match &outcome {
            RunOutcome::Success => Ok(()),
            RunOutcome::Skipped(reason) => {
                ctx.transcript.error(format!("Warning: {reason}"));
                dispatcher.notify_skip(&ctx.transcript).await
            }
            // The reason was reported while the lock was still held.
            RunOutcome::Failed(_) => dispatcher.notify_failure(&ctx.transcript).await,
        };
        if let Err(err) = &notification {
            debug!(error = %err, "notification could not be delivered");
            ctx.transcript.error(format!("Error: {err}"));
        }

        RunResult::Completed {
            outcome,
            notification,
        }
    }

    async fn test_notifications(&mut self, global: &GlobalConfig) -> Result<()> {
        let dispatcher = match self.dispatcher.take() {
            Some(dispatcher) => dispatcher,
            None => Dispatcher::from_config(&global.notifications)?,
        };
        info!("sending test notifications");
        dispatcher.notify_test().await
    }

    /// Hold the run lock for exactly the duration of the executor.
    ///
    /// The run log is attached only while the lock is held, so a later run
    /// rotating it never races with this one. A failure reason is written
    /// before the log is detached.
    async fn execute_locked(&mut self, ctx: &mut RunContext) -> Result<RunOutcome> {
        let RunContext {
            flags,
            global,
            config,
            transcript,
            ..
        } = ctx;
        let (Some(global), Some(config)) = (global.as_ref(), config.as_ref()) else {
            return Err(RunnerError::Other(anyhow::anyhow!(
                "run context is missing its configuration"
            )));
        };

        let locks = LockManager::new(&global.lock_dir);
        let _lock = match locks.acquire(&config.name)? {
            LockAttempt::Acquired(lock) => lock,
            LockAttempt::AlreadyRunning => {
                info!(config = %config.name, "another run holds the lock; skipping");
                return Ok(RunOutcome::Skipped(SKIP_REASON.to_string()));
            }
        };

        match RunLog::open(&global.log_dir, &config.name, global.log_file_count) {
            Ok(log) => transcript.attach_log(log),
            Err(err) => {
                transcript.error(format!("Error: cannot open run log: {err}"));
                transcript.error(format!("Error: {FAILURE_REASON}"));
                return Ok(RunOutcome::Failed(FAILURE_REASON.to_string()));
            }
        }

        transcript.info(format!(
            "backup-runner starting, version: {VERSION}, Git Hash: {GIT_HASH}"
        ));

        let engine: Box<dyn EngineBackend> = match self.engine.take() {
            Some(engine) => engine,
            None => Box::new(CommandEngine::new(
                config.effective_engine(global).binary.clone(),
                config.repository.clone(),
            )),
        };
        let options = EngineOptions {
            verbose: flags.verbose,
            debug: flags.debug,
        };
        let mut executor = OperationExecutor::new(engine, options);

        let outcome = match executor.run(config, flags.operations, transcript).await {
            Ok(()) => {
                transcript.info("All operations completed successfully");
                RunOutcome::Success
            }
            Err(err) => {
                debug!(config = %config.name, error = %err, "executor failed");
                transcript.error(format!("Error: {FAILURE_REASON}"));
                RunOutcome::Failed(FAILURE_REASON.to_string())
            }
        };

        transcript.detach_log();
        Ok(outcome)
    }
}

fn global_error(err: RunnerError) -> RunnerError {
    match err {
        RunnerError::ConfigError(msg) => RunnerError::GlobalConfig(msg),
        other => RunnerError::GlobalConfig(other.to_string()),
    }
}

/// Report a fatal error once, then end the run.
fn abort(ctx: &mut RunContext, err: RunnerError) -> RunResult {
    if !err.already_reported() {
        ctx.transcript.error(format!("Error: {err}"));
    }
    RunResult::Aborted(err)
}
