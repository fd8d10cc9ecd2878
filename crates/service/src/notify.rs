//! Outbound email notifications.
//!
//! Delivery is best-effort: a failing mailer is logged and counted in
//! `email_notifications_total{outcome="failed"}` and never fails the caller.

use std::time::Duration;

use async_trait::async_trait;
use configs::{MailConfig, MailMode};
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::ServiceError;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), ServiceError>;
}

/// Writes messages to the log instead of sending them.
#[derive(Clone, Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), ServiceError> {
        info!(to = %message.to, subject = %message.subject, body = %message.body, "email (log mailer)");
        Ok(())
    }
}

/// POSTs messages as JSON to a transactional-email HTTP API.
#[derive(Clone, Debug)]
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    from: String,
}

#[derive(Serialize)]
struct OutboundEmail<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl HttpMailer {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, from: impl Into<String>) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ServiceError::Notification(e.to_string()))?;
        Ok(Self { client, endpoint: endpoint.into(), api_key, from: from.into() })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), ServiceError> {
        let payload = OutboundEmail {
            from: &self.from,
            to: &message.to,
            subject: &message.subject,
            text: &message.body,
        };
        let mut req = self.client.post(&self.endpoint).json(&payload);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req.send().await.map_err(|e| ServiceError::Notification(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ServiceError::Notification(format!("mail api responded {}", resp.status())));
        }
        Ok(())
    }
}

/// Build the mailer selected by configuration.
pub fn mailer_from_config(cfg: &MailConfig) -> Result<std::sync::Arc<dyn Mailer>, ServiceError> {
    match cfg.mode {
        MailMode::Log => Ok(std::sync::Arc::new(LogMailer)),
        MailMode::Http => {
            let endpoint = cfg
                .endpoint
                .clone()
                .ok_or_else(|| ServiceError::Notification("mail.endpoint is required for http mode".into()))?;
            Ok(std::sync::Arc::new(HttpMailer::new(endpoint, cfg.api_key.clone(), cfg.from.clone())?))
        }
    }
}

/// Send `message`, logging and counting the outcome instead of propagating it.
pub async fn send_best_effort<M: Mailer + ?Sized>(mailer: &M, message: EmailMessage) {
    match mailer.send(&message).await {
        Ok(()) => {
            common::metrics::record_email("sent");
            info!(to = %message.to, subject = %message.subject, "notification sent");
        }
        Err(e) => {
            common::metrics::record_email("failed");
            warn!(to = %message.to, subject = %message.subject, error = %e, "notification failed");
        }
    }
}

/// Recording and failing mailers for tests.
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct RecordingMailer {
        sent: Mutex<Vec<EmailMessage>>,
    }

    impl RecordingMailer {
        pub fn sent(&self) -> Vec<EmailMessage> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, message: &EmailMessage) -> Result<(), ServiceError> {
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _message: &EmailMessage) -> Result<(), ServiceError> {
            Err(ServiceError::Notification("smtp unreachable".into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::{FailingMailer, RecordingMailer};
    use super::*;

    fn msg() -> EmailMessage {
        EmailMessage { to: "a@b.io".into(), subject: "Hi".into(), body: "Hello".into() }
    }

    #[tokio::test]
    async fn best_effort_records_sent_message() {
        let mailer = RecordingMailer::default();
        send_best_effort(&mailer, msg()).await;
        assert_eq!(mailer.sent(), vec![msg()]);
    }

    #[tokio::test]
    async fn best_effort_swallows_failures() {
        send_best_effort(&FailingMailer, msg()).await;
    }

    #[test]
    fn http_mode_requires_endpoint() {
        let cfg = MailConfig { mode: MailMode::Http, endpoint: None, api_key: None, from: "noreply@example.com".into() };
        assert!(mailer_from_config(&cfg).is_err());
        let cfg = MailConfig { mode: MailMode::Log, ..cfg };
        assert!(mailer_from_config(&cfg).is_ok());
    }
}
