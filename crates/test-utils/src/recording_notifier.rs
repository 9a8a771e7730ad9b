use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use backup_runner::errors::{Result, RunnerError};
use backup_runner::notify::{Notification, Notifier};

/// Notifier that keeps every notification it was asked to send and can be
/// told to fail delivery.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    name: String,
    sent: Arc<Mutex<Vec<Notification>>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    pub fn arc(&self) -> Arc<dyn Notifier> {
        Arc::new(self.clone())
    }
}

impl Notifier for RecordingNotifier {
    fn describe(&self) -> String {
        format!("recording {}", self.name)
    }

    fn send<'a>(
        &'a self,
        notification: &'a Notification,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            self.sent.lock().unwrap().push(notification.clone());
            if self.fail {
                return Err(RunnerError::Notification(format!(
                    "{} is configured to fail",
                    self.name
                )));
            }
            Ok(())
        })
    }
}
