//! Outbound email.
//!
//! Handlers build an [`OutboundEmail`] from a template and hand it to a
//! [`Mailer`]. Production uses the SMTP relay; without relay credentials
//! messages are only logged.

mod templates;

pub use templates::*;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::MailConfig;
use crate::errors::AppError;

/// A file attached to an email.
#[derive(Debug, Clone)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

/// A rendered message ready for delivery. The sender comes from the mailer.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
    pub attachment: Option<EmailAttachment>,
}

/// Delivers outbound email.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutboundEmail) -> Result<(), AppError>;
}

/// Mailer backed by an authenticated SMTP relay over implicit TLS.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self, AppError> {
        let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_pass) else {
            return Err(AppError::Mail(
                "SMTP credentials are not configured".to_string(),
            ));
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| AppError::Mail(format!("Invalid SMTP relay {}: {}", config.smtp_host, e)))?
            .port(config.smtp_port)
            .credentials(Credentials::new(user.clone(), pass.clone()))
            .build();

        let address = config
            .from_address
            .parse()
            .map_err(|e| AppError::Mail(format!("Invalid sender address: {}", e)))?;

        Ok(Self {
            transport,
            from: Mailbox::new(Some(config.from_name.clone()), address),
        })
    }

    fn build_message(&self, email: OutboundEmail) -> Result<Message, AppError> {
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| AppError::Mail(format!("Invalid recipient {}: {}", email.to, e)))?;

        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject);

        if let Some(reply_to) = &email.reply_to {
            let reply_to: Mailbox = reply_to
                .parse()
                .map_err(|e| AppError::Mail(format!("Invalid reply-to address: {}", e)))?;
            builder = builder.reply_to(reply_to);
        }

        let body = SinglePart::html(email.html);
        let message = match email.attachment {
            Some(attachment) => {
                let content_type = ContentType::parse(&attachment.content_type)
                    .map_err(|e| AppError::Mail(format!("Invalid attachment type: {}", e)))?;
                let part = Attachment::new(attachment.filename).body(attachment.content, content_type);
                builder.multipart(MultiPart::mixed().singlepart(body).singlepart(part))
            }
            None => builder.singlepart(body),
        };

        message.map_err(|e| AppError::Mail(format!("Failed to build message: {}", e)))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), AppError> {
        let to = email.to.clone();
        let subject = email.subject.clone();
        let message = self.build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::Mail(format!("SMTP delivery failed: {}", e)))?;

        tracing::info!(%to, %subject, "Email sent");
        Ok(())
    }
}

/// Mailer that only logs messages. Used when no relay credentials are set.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), AppError> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            attachment = email.attachment.as_ref().map(|a| a.filename.as_str()),
            "Email not sent (no SMTP credentials)"
        );
        Ok(())
    }
}

/// Pick the SMTP mailer when credentials exist, the logging mailer otherwise.
pub fn mailer_from_config(config: &MailConfig) -> Result<std::sync::Arc<dyn Mailer>, AppError> {
    if config.has_credentials() {
        Ok(std::sync::Arc::new(SmtpMailer::new(config)?))
    } else {
        Ok(std::sync::Arc::new(LogMailer))
    }
}

/// Mailer that keeps every message in memory, optionally failing on demand.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingMailer {
    sent: std::sync::Mutex<Vec<OutboundEmail>>,
    fail: std::sync::atomic::AtomicBool,
}

#[cfg(test)]
impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), AppError> {
        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(AppError::Mail("Relay unavailable".to_string()));
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail_config(user: Option<&str>) -> MailConfig {
        MailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 465,
            smtp_user: user.map(String::from),
            smtp_pass: user.map(|_| "secret".to_string()),
            from_address: "support@example.com".to_string(),
            from_name: "Example Store".to_string(),
            admin_alert_address: "admin@example.com".to_string(),
        }
    }

    #[test]
    fn test_smtp_mailer_requires_credentials() {
        assert!(SmtpMailer::new(&mail_config(None)).is_err());
    }

    #[tokio::test]
    async fn test_build_message_with_attachment() {
        let mailer = SmtpMailer::new(&mail_config(Some("user"))).unwrap();
        let message = mailer
            .build_message(OutboundEmail {
                to: "buyer@example.com".to_string(),
                reply_to: Some("support@example.com".to_string()),
                subject: "Invoice".to_string(),
                html: "<p>Attached</p>".to_string(),
                attachment: Some(EmailAttachment {
                    filename: "Invoice-ABC.pdf".to_string(),
                    content_type: "application/pdf".to_string(),
                    content: b"%PDF-1.3".to_vec(),
                }),
            })
            .unwrap();

        let raw = String::from_utf8_lossy(&message.formatted()).to_string();
        assert!(raw.contains("Subject: Invoice"));
        assert!(raw.contains("Invoice-ABC.pdf"));
        assert!(raw.contains("application/pdf"));
    }

    #[tokio::test]
    async fn test_build_message_rejects_bad_recipient() {
        let mailer = SmtpMailer::new(&mail_config(Some("user"))).unwrap();
        let result = mailer.build_message(OutboundEmail {
            to: "not an address".to_string(),
            reply_to: None,
            subject: "Hi".to_string(),
            html: String::new(),
            attachment: None,
        });
        assert!(matches!(result, Err(AppError::Mail(_))));
    }

    #[tokio::test]
    async fn test_recording_mailer_failure_mode() {
        let mailer = RecordingMailer::default();
        mailer.set_failing(true);
        let result = mailer
            .send(OutboundEmail {
                to: "a@b.c".to_string(),
                reply_to: None,
                subject: "x".to_string(),
                html: String::new(),
                attachment: None,
            })
            .await;
        assert!(result.is_err());
        assert!(mailer.sent().is_empty());
    }
}
