// src/notify/command.rs

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::Context;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::errors::{Result, RunnerError};
use crate::notify::{Notification, Notifier};

/// Runs a shell command with the body on stdin.
///
/// The subject and kind are exported as `BACKUP_RUNNER_SUBJECT` and
/// `BACKUP_RUNNER_KIND`, e.g. `mail -s "$BACKUP_RUNNER_SUBJECT" ops@example.com`.
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    command: String,
}

impl CommandNotifier {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Notifier for CommandNotifier {
    fn describe(&self) -> String {
        format!("command `{}`", self.command)
    }

    fn send<'a>(
        &'a self,
        notification: &'a Notification,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let mut cmd = if cfg!(windows) {
                let mut c = Command::new("cmd");
                c.arg("/C").arg(&self.command);
                c
            } else {
                let mut c = Command::new("sh");
                c.arg("-c").arg(&self.command);
                c
            };

            let mut child = cmd
                .env("BACKUP_RUNNER_SUBJECT", &notification.subject)
                .env("BACKUP_RUNNER_KIND", notification.kind.as_str())
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::inherit())
                .spawn()
                .with_context(|| format!("spawning notifier `{}`", self.command))?;

            if let Some(mut stdin) = child.stdin.take() {
                match stdin.write_all(notification.body.as_bytes()).await {
                    // The command may exit without reading its input.
                    Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => {}
                    other => other.with_context(|| {
                        format!("writing body to notifier `{}`", self.command)
                    })?,
                }
                // Closing stdin lets the command see end of input.
                drop(stdin);
            }

            let status = child
                .wait()
                .await
                .with_context(|| format!("waiting for notifier `{}`", self.command))?;

            if status.success() {
                Ok(())
            } else {
                Err(RunnerError::Notification(format!(
                    "`{}` exited with status {}",
                    self.command,
                    status.code().unwrap_or(-1)
                )))
            }
        })
    }
}
