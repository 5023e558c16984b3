//! Authenticated STARTTLS SMTP delivery.

use super::Mailer;
use crate::utils::config::{MAIL_BODY, MAIL_SUBJECT, SMTP_PASSWORD_ENV, SMTP_TIMEOUT};
use crate::utils::error::MailError;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use log::{debug, info};
use std::path::PathBuf;

/// SMTP connection settings
///
/// **Public** - built by main.rs from CLI flags and the environment
#[derive(Clone)]
pub struct SmtpSettings {
    /// Relay host (STARTTLS)
    pub host: String,

    pub port: u16,

    /// Sender address, also used as the login name
    pub sender: String,

    /// Login password, read from the environment
    pub password: Option<String>,
}

// Keep the password out of logs
impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("sender", &self.sender)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Mailer backed by a `lettre` SMTP transport
#[derive(Debug)]
pub struct SmtpMailer {
    settings: SmtpSettings,
}

impl SmtpMailer {
    /// Create a mailer, checking that a password is available
    ///
    /// # Errors
    /// * `MailError::MissingPassword` - no password configured
    pub fn new(settings: SmtpSettings) -> Result<Self, MailError> {
        if settings.password.as_deref().map_or(true, str::is_empty) {
            return Err(MailError::MissingPassword(SMTP_PASSWORD_ENV));
        }
        Ok(Self { settings })
    }

    fn transport(&self) -> Result<SmtpTransport, MailError> {
        let password = self
            .settings
            .password
            .clone()
            .ok_or(MailError::MissingPassword(SMTP_PASSWORD_ENV))?;

        let transport = SmtpTransport::starttls_relay(&self.settings.host)?
            .port(self.settings.port)
            .credentials(Credentials::new(self.settings.sender.clone(), password))
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        Ok(transport)
    }
}

impl Mailer for SmtpMailer {
    fn send_reports(&self, recipients: &[String], attachments: &[PathBuf]) -> Result<(), MailError> {
        let message = build_message(&self.settings.sender, recipients, attachments)?;

        info!(
            "Sending {} reports to {} via {}:{}",
            attachments.len(),
            recipients.join(", "),
            self.settings.host,
            self.settings.port
        );

        let response = self.transport()?.send(&message)?;
        debug!("SMTP response code: {}", response.code());

        Ok(())
    }
}

/// Build the report message
///
/// **Public** - separated from sending so it can be tested offline
///
/// # Errors
/// * `MailError::NoRecipients` - empty recipient list
/// * `MailError::InvalidAddress` - unparseable sender or recipient
/// * `MailError::AttachmentFailed` - attachment cannot be read
pub fn build_message(
    sender: &str,
    recipients: &[String],
    attachments: &[PathBuf],
) -> Result<Message, MailError> {
    if recipients.is_empty() {
        return Err(MailError::NoRecipients);
    }

    let mut builder = Message::builder()
        .from(parse_mailbox(sender)?)
        .subject(MAIL_SUBJECT);

    for recipient in recipients {
        builder = builder.to(parse_mailbox(recipient)?);
    }

    let mut body = MultiPart::mixed().singlepart(SinglePart::plain(MAIL_BODY.to_string()));

    for path in attachments {
        let content = std::fs::read(path).map_err(|source| MailError::AttachmentFailed {
            path: path.clone(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        debug!("Attaching {} ({} bytes)", name, content.len());
        body = body.singlepart(Attachment::new(name).body(content, ContentType::TEXT_PLAIN));
    }

    Ok(builder.multipart(body)?)
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|source| MailError::InvalidAddress {
            address: address.to_string(),
            source,
        })
}
