// src/notify/webhook.rs

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::errors::{Result, RunnerError};
use crate::notify::{Notification, Notifier};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// POSTs the notification as JSON: `{ "kind", "subject", "body" }`.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: String, headers: BTreeMap<String, String>) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        for (name, value) in headers.iter() {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                RunnerError::ConfigError(format!("invalid webhook header name '{name}': {e}"))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                RunnerError::ConfigError(format!("invalid value for webhook header '{name}': {e}"))
            })?;
            default_headers.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RunnerError::ConfigError(format!("building webhook client: {e}")))?;

        Ok(Self { client, url })
    }
}

impl Notifier for WebhookNotifier {
    fn describe(&self) -> String {
        format!("webhook {}", self.url)
    }

    fn send<'a>(
        &'a self,
        notification: &'a Notification,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            self.client
                .post(&self.url)
                .json(notification)
                .send()
                .await
                .and_then(|response| response.error_for_status())
                .map_err(|e| RunnerError::Notification(format!("POST {}: {e}", self.url)))?;
            Ok(())
        })
    }
}
