use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use backup_runner::errors::{Result, RunnerError};
use backup_runner::exec::{EngineBackend, Invocation};
use backup_runner::transcript::Transcript;
use backup_runner::types::Operation;

type Hook = Arc<dyn Fn(&Invocation) + Send + Sync>;

/// A fake engine that:
/// - records every invocation it is asked to run
/// - writes one line of "engine output" per invocation into the transcript
/// - fails the first invocation of a chosen operation, if any
#[derive(Clone, Default)]
pub struct FakeEngine {
    calls: Arc<Mutex<Vec<Invocation>>>,
    fail_on: Option<Operation>,
    before_run: Option<Hook>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, op: Operation) -> Self {
        self.fail_on = Some(op);
        self
    }

    /// Call `hook` at the start of every invocation.
    pub fn before_each(mut self, hook: impl Fn(&Invocation) + Send + Sync + 'static) -> Self {
        self.before_run = Some(Arc::new(hook));
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn operations(&self) -> Vec<Operation> {
        self.invocations().iter().map(|i| i.operation).collect()
    }

    pub fn boxed(&self) -> Box<dyn EngineBackend> {
        Box::new(self.clone())
    }
}

impl EngineBackend for FakeEngine {
    fn run<'a>(
        &'a mut self,
        invocation: &'a Invocation,
        transcript: &'a mut Transcript,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            if let Some(hook) = &self.before_run {
                hook(invocation);
            }
            self.calls.lock().unwrap().push(invocation.clone());
            transcript.info(format!("engine output for {}", invocation.label));

            if self.fail_on == Some(invocation.operation) {
                return Err(RunnerError::Execution {
                    operation: invocation.operation.to_string(),
                    reason: format!("{} exited with status 1", invocation.label),
                });
            }
            Ok(())
        })
    }
}
