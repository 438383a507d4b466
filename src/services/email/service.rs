use std::sync::Arc;

use super::templates;
use super::transport::{EmailError, MailTransport, OutgoingEmail};

/// Sends the application's transactional emails through whatever transport it
/// was constructed with. Callers decide whether a failed send is fatal.
#[derive(Clone)]
pub struct EmailService {
    transport: Arc<dyn MailTransport>,
    from: String,
}

impl EmailService {
    pub fn new(transport: Arc<dyn MailTransport>, from: impl Into<String>) -> Self {
        Self {
            transport,
            from: from.into(),
        }
    }

    pub async fn send_mfa_code(
        &self,
        to: &str,
        code: &str,
        name: Option<&str>,
    ) -> Result<(), EmailError> {
        self.send(to, "Your verification code", templates::mfa_code(code, name))
            .await
    }

    pub async fn send_password_reset_code(
        &self,
        to: &str,
        code: &str,
        name: Option<&str>,
    ) -> Result<(), EmailError> {
        self.send(
            to,
            "Your password reset code",
            templates::password_reset(code, name),
        )
        .await
    }

    pub async fn send_welcome(&self, to: &str, name: Option<&str>) -> Result<(), EmailError> {
        self.send(to, "Welcome!", templates::welcome(name)).await
    }

    async fn send(&self, to: &str, subject: &str, html: String) -> Result<(), EmailError> {
        let text = templates::strip_html(&html);

        self.transport
            .deliver(&OutgoingEmail {
                from: self.from.clone(),
                to: to.to_string(),
                subject: subject.to_string(),
                html,
                text,
            })
            .await
    }
}
