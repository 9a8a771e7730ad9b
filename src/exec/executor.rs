// src/exec/executor.rs

//! Runs the requested operations in their fixed order.

use tracing::{debug, info};

use crate::config::RunConfiguration;
use crate::errors::{Result, RunnerError};
use crate::exec::backend::EngineBackend;
use crate::exec::invocation::{plan, EngineOptions};
use crate::transcript::Transcript;
use crate::types::OperationSet;

/// Drives one configuration's operations through an [`EngineBackend`].
///
/// Order is always Backup, Copy, Prune, Check. Operations that were not
/// requested, or have no configured entries, are skipped without comment. The first failing invocation
/// stops the run; work already done by the engine stays as it is.
pub struct OperationExecutor<B: EngineBackend> {
    backend: B,
    options: EngineOptions,
}

impl<B: EngineBackend> OperationExecutor<B> {
    pub fn new(backend: B, options: EngineOptions) -> Self {
        Self { backend, options }
    }

    pub async fn run(
        &mut self,
        config: &RunConfiguration,
        operations: OperationSet,
        transcript: &mut Transcript,
    ) -> Result<()> {
        for op in operations.iter() {
            let invocations = plan(config, op, self.options);
            if invocations.is_empty() {
                debug!(config = %config.name, operation = %op, "nothing configured; skipping");
                continue;
            }
            info!(config = %config.name, operation = %op, count = invocations.len(), "starting operation");

            for invocation in invocations.iter() {
                transcript.info(format!("Beginning {}", invocation.label));
                if self.options.verbose {
                    transcript.info(format!("Executing: {invocation}"));
                }

                if let Err(err) = self.backend.run(invocation, transcript).await {
                    debug!(config = %config.name, operation = %op, error = %err, "operation failed");
                    let reason = match err {
                        RunnerError::Execution { reason, .. } => reason,
                        other => format!("{}: {other}", invocation.label),
                    };
                    transcript.error(format!("Error: {reason}"));
                    return Err(RunnerError::Execution {
                        operation: op.to_string(),
                        reason,
                    });
                }

                transcript.info(format!("Completed {}", invocation.label));
            }

            info!(config = %config.name, operation = %op, "operation completed");
        }
        Ok(())
    }
}
