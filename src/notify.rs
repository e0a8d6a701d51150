// src/notify.rs
//! Best-effort notification channel. Delivery failures are logged and
//! never surface to the pipeline, so persistence and dedupe always
//! complete regardless of the channel's health.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

const NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, subject: &str, body: &str, recipients: &[String]);
}

/// Posts notification payloads to a configured webhook. With no webhook
/// configured or an empty recipient list, sending is a no-op.
pub struct WebhookNotifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl WebhookNotifier {
    pub fn new(webhook_url: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(NOTIFY_TIMEOUT)
            .build()
            .context("Failed to create notifier HTTP client")?;
        Ok(Self {
            client,
            webhook_url,
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, subject: &str, body: &str, recipients: &[String]) {
        if recipients.is_empty() {
            return;
        }
        let url = match &self.webhook_url {
            Some(url) => url,
            None => {
                debug!("No webhook configured, dropping notification: {}", subject);
                return;
            }
        };

        let payload = json!({
            "subject": subject,
            "body": body,
            "recipients": recipients,
        });

        match self.client.post(url).json(&payload).send().await {
            Ok(resp) if resp.status().is_success() => {
                debug!("Notification delivered: {}", subject);
            }
            Ok(resp) => {
                warn!(
                    "Notification endpoint returned {} for '{}'",
                    resp.status(),
                    subject
                );
            }
            Err(e) => {
                warn!("Notification failed for '{}': {}", subject, e);
            }
        }
    }
}
