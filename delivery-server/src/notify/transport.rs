//! Mail transports

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Mutex;
use thiserror::Error;

/// A formatted transactional mail, ready for delivery
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Mail API error: {0}")]
    Api(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Delivery channel for transactional mail
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, mail: &OutgoingMail) -> Result<(), NotifyError>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

// =============================================================================
// HTTP mail API transport
// =============================================================================

#[derive(Debug, Serialize)]
struct MailApiPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Posts mail to an HTTP mail API (`MAIL_API_URL`) with a bearer key
pub struct HttpMailTransport {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    from: String,
}

impl HttpMailTransport {
    pub fn new(api_url: &str, api_key: Option<&str>, from: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.to_string(),
            api_key: api_key.map(str::to_string),
            from: from.to_string(),
        }
    }
}

#[async_trait]
impl MailTransport for HttpMailTransport {
    async fn deliver(&self, mail: &OutgoingMail) -> Result<(), NotifyError> {
        let payload = MailApiPayload {
            from: &self.from,
            to: &mail.to,
            subject: &mail.subject,
            text: &mail.body,
        };

        let mut request = self.client.post(&self.api_url).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifyError::Api(format!(
                "Mail API returned {}",
                response.status()
            )));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

// =============================================================================
// Log-only transport (default in development)
// =============================================================================

/// Logs the mail instead of sending it
pub struct LogTransport;

#[async_trait]
impl MailTransport for LogTransport {
    async fn deliver(&self, mail: &OutgoingMail) -> Result<(), NotifyError> {
        tracing::info!(
            target: "mail",
            to = %mail.to,
            subject = %mail.subject,
            "Mail (log-only transport)"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

// =============================================================================
// In-memory transport (tests)
// =============================================================================

/// Records delivered mail for assertions
#[derive(Default)]
pub struct MemoryTransport {
    sent: Mutex<Vec<OutgoingMail>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything delivered so far
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().expect("mail mutex poisoned").clone()
    }
}

#[async_trait]
impl MailTransport for MemoryTransport {
    async fn deliver(&self, mail: &OutgoingMail) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .expect("mail mutex poisoned")
            .push(mail.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
