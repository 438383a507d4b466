pub mod service;
pub mod templates;
pub mod transport;

pub use service::EmailService;
pub use transport::{DisabledTransport, EmailError, MailTransport, OutgoingEmail, SmtpMailer};
