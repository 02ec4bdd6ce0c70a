//! Notification Service
//!
//! 事务性邮件：OTP、下单确认、状态变更、支付回执。
//! 所有发送都是 best-effort：失败只记日志，绝不影响调用方的业务写入。

pub mod templates;
pub mod transport;

use std::sync::Arc;

use shared::models::{Order, OrderStatus};

pub use transport::{HttpMailTransport, LogTransport, MailTransport, MemoryTransport, NotifyError, OutgoingMail};

/// Formats and dispatches transactional mail through a pluggable transport
#[derive(Clone)]
pub struct NotificationService {
    transport: Arc<dyn MailTransport>,
}

impl NotificationService {
    pub fn new(transport: Arc<dyn MailTransport>) -> Self {
        Self { transport }
    }

    /// Pick the transport from configuration: HTTP mail API when a URL is
    /// configured, log-only otherwise.
    pub fn from_config(
        mail_api_url: Option<&str>,
        mail_api_key: Option<&str>,
        mail_from: &str,
    ) -> Self {
        match mail_api_url {
            Some(url) => Self::new(Arc::new(HttpMailTransport::new(
                url,
                mail_api_key,
                mail_from,
            ))),
            None => {
                tracing::info!("MAIL_API_URL not set, notifications are log-only");
                Self::new(Arc::new(LogTransport))
            }
        }
    }

    pub async fn send_otp(&self, to: &str, name: &str, code: &str) {
        let (subject, body) = templates::otp(name, code);
        self.dispatch(to, subject, body).await;
    }

    pub async fn order_confirmation(&self, to: &str, name: &str, order: &Order) {
        let (subject, body) = templates::order_confirmation(name, order);
        self.dispatch(to, subject, body).await;
    }

    pub async fn status_update(
        &self,
        to: &str,
        name: &str,
        order_number: &str,
        status: OrderStatus,
    ) {
        let (subject, body) = templates::status_update(name, order_number, status);
        self.dispatch(to, subject, body).await;
    }

    pub async fn payment_receipt(&self, to: &str, name: &str, order: &Order) {
        let (subject, body) = templates::payment_receipt(name, order);
        self.dispatch(to, subject, body).await;
    }

    /// Fire-and-forget: log and swallow transport errors
    async fn dispatch(&self, to: &str, subject: String, body: String) {
        let mail = OutgoingMail {
            to: to.to_string(),
            subject,
            body,
        };
        if let Err(e) = self.transport.deliver(&mail).await {
            tracing::warn!(
                transport = self.transport.name(),
                to = %mail.to,
                subject = %mail.subject,
                error = %e,
                "Notification delivery failed (ignored)"
            );
        }
    }
}
