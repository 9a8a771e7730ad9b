// src/notify/mod.rs

//! Skip/failure notification dispatch.
//!
//! A [`Dispatcher`] holds the notifiers configured for the skip path and the
//! failure path. Each path is a list of [`Notifier`] sinks; an empty list is
//! a silent no-op. The transcript is forwarded as the body unchanged; the
//! subject line is what tells a skip from a failure.
//!
//! - [`webhook`] posts a JSON document over HTTP.
//! - [`command`] pipes the body into a shell command.

pub mod command;
pub mod webhook;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{NotificationsConfig, NotifierTarget};
use crate::errors::{Result, RunnerError};
use crate::transcript::Transcript;
use crate::types::NotificationKind;

pub use command::CommandNotifier;
pub use webhook::WebhookNotifier;

const APP: &str = "backup-runner";

/// What a notifier is asked to deliver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub subject: String,
    pub body: String,
}

/// A single delivery sink.
pub trait Notifier: Send + Sync {
    /// Short description used in logs and error messages.
    fn describe(&self) -> String;

    fn send<'a>(
        &'a self,
        notification: &'a Notification,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

/// Build the sink for one configured target.
pub fn notifier_for(target: &NotifierTarget) -> Result<Arc<dyn Notifier>> {
    Ok(match target {
        NotifierTarget::Webhook { url, headers } => {
            Arc::new(WebhookNotifier::new(url.clone(), headers.clone())?)
        }
        NotifierTarget::Command { command } => Arc::new(CommandNotifier::new(command.clone())),
    })
}

#[derive(Clone, Default)]
pub struct Dispatcher {
    config_name: Option<String>,
    on_skip: Vec<Arc<dyn Notifier>>,
    on_failure: Vec<Arc<dyn Notifier>>,
}

impl Dispatcher {
    pub fn new(on_skip: Vec<Arc<dyn Notifier>>, on_failure: Vec<Arc<dyn Notifier>>) -> Self {
        Self {
            config_name: None,
            on_skip,
            on_failure,
        }
    }

    pub fn from_config(cfg: &NotificationsConfig) -> Result<Self> {
        let build = |targets: &[NotifierTarget]| -> Result<Vec<Arc<dyn Notifier>>> {
            targets.iter().map(notifier_for).collect()
        };
        Ok(Self::new(build(&cfg.on_skip)?, build(&cfg.on_failure)?))
    }

    /// Name the configuration in subject lines.
    pub fn for_config(mut self, name: impl Into<String>) -> Self {
        self.config_name = Some(name.into());
        self
    }

    pub fn has_failure_notifier(&self) -> bool {
        !self.on_failure.is_empty()
    }

    pub async fn notify_skip(&self, transcript: &Transcript) -> Result<()> {
        let notification = self.run_notification(NotificationKind::Skip, transcript);
        deliver(&self.on_skip, &notification).await
    }

    pub async fn notify_failure(&self, transcript: &Transcript) -> Result<()> {
        let notification = self.run_notification(NotificationKind::Failure, transcript);
        deliver(&self.on_failure, &notification).await
    }

    /// Send one test message through every configured sink.
    pub async fn notify_test(&self) -> Result<()> {
        let mut seen = Vec::new();
        let mut targets: Vec<Arc<dyn Notifier>> = Vec::new();
        for notifier in self.on_skip.iter().chain(self.on_failure.iter()) {
            let key = notifier.describe();
            if !seen.contains(&key) {
                seen.push(key);
                targets.push(Arc::clone(notifier));
            }
        }

        if targets.is_empty() {
            return Err(RunnerError::Notification(
                "no notifiers are configured".to_string(),
            ));
        }

        let notification = Notification {
            kind: NotificationKind::Test,
            subject: format!("{APP}: Test notification"),
            body: format!(
                "This is a test notification from {APP}; if you received it, the notifier is configured correctly."
            ),
        };
        deliver(&targets, &notification).await
    }

    fn run_notification(&self, kind: NotificationKind, transcript: &Transcript) -> Notification {
        let name = self.config_name.as_deref().unwrap_or("<unknown>");
        let status = match kind {
            NotificationKind::Skip => "skipped",
            NotificationKind::Failure => "FAILURE",
            NotificationKind::Test => "test",
        };
        Notification {
            kind,
            subject: format!("{APP}: Backup results for configuration {name} ({status})"),
            body: transcript.body(),
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = |list: &[Arc<dyn Notifier>]| {
            list.iter().map(|n| n.describe()).collect::<Vec<_>>()
        };
        f.debug_struct("Dispatcher")
            .field("config_name", &self.config_name)
            .field("on_skip", &names(&self.on_skip))
            .field("on_failure", &names(&self.on_failure))
            .finish()
    }
}

/// Try every sink; report the first failure after all were attempted.
async fn deliver(targets: &[Arc<dyn Notifier>], notification: &Notification) -> Result<()> {
    if targets.is_empty() {
        debug!(kind = %notification.kind, "no notifier configured for this outcome");
        return Ok(());
    }

    let mut first_error = None;
    for notifier in targets {
        match notifier.send(notification).await {
            Ok(()) => info!(kind = %notification.kind, notifier = %notifier.describe(), "notification sent"),
            Err(err) => {
                debug!(kind = %notification.kind, notifier = %notifier.describe(), error = %err, "notification failed");
                if first_error.is_none() {
                    let reason = match err {
                        RunnerError::Notification(reason) => reason,
                        other => other.to_string(),
                    };
                    first_error = Some(RunnerError::Notification(format!(
                        "{}: {reason}",
                        notifier.describe()
                    )));
                }
            }
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
