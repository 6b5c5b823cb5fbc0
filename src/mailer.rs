// Email collaborator. Delivery is a best-effort side effect: callers that
// create records first never roll them back when a send fails.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::SmtpConfig;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("mail transport error: {0}")]
    Transport(String),

    #[error("mail rejected for {recipient}: {reason}")]
    Rejected { recipient: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct OutboundMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutboundMail) -> Result<(), MailError>;
}

/// Stand-in transport for environments without a reachable SMTP relay: logs
/// the mail against the configured relay settings and reports success. Keeps
/// the auth flows exercisable in development.
pub struct LogMailer {
    smtp: SmtpConfig,
}

impl LogMailer {
    pub fn new(smtp: SmtpConfig) -> Self {
        Self { smtp }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: OutboundMail) -> Result<(), MailError> {
        tracing::info!(
            relay = %format!("{}:{}", self.smtp.host, self.smtp.port),
            from = %self.smtp.from_address,
            to = %mail.to,
            subject = %mail.subject,
            "outbound mail (log transport)"
        );
        Ok(())
    }
}
