use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;

#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("email transport not configured")]
    NotConfigured,

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Message(String),

    #[error("smtp error: {0}")]
    Transport(String),
}

/// Delivery seam: production uses SMTP, tests record messages in memory.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, email: &OutgoingEmail) -> Result<(), EmailError>;
}

pub struct SmtpMailer {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn from_config(config: &SmtpConfig) -> Result<Self, EmailError> {
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| EmailError::Transport(e.to_string()))?
            .credentials(Credentials::new(config.user.clone(), config.pass.clone()))
            .port(config.port)
            .build();

        Ok(Self { mailer })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn deliver(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        let from = email
            .from
            .parse::<Mailbox>()
            .map_err(|e| EmailError::InvalidAddress(e.to_string()))?;
        let to = email
            .to
            .parse::<Mailbox>()
            .map_err(|e| EmailError::InvalidAddress(e.to_string()))?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                email.text.clone(),
                email.html.clone(),
            ))
            .map_err(|e| EmailError::Message(e.to_string()))?;

        self.mailer
            .send(message)
            .await
            .map_err(|e| EmailError::Transport(e.to_string()))?;

        Ok(())
    }
}

/// Stand-in when SMTP configuration is incomplete: every send fails and the
/// caller logs it, instead of the server refusing to start.
pub struct DisabledTransport;

#[async_trait]
impl MailTransport for DisabledTransport {
    async fn deliver(&self, _email: &OutgoingEmail) -> Result<(), EmailError> {
        Err(EmailError::NotConfigured)
    }
}
