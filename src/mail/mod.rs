//! Delivery of generated reports by mail.
//!
//! All reports of a run go out as attachments of a single message.
//! The `Mailer` trait is the seam between the scan command and the SMTP
//! transport so commands can be exercised without a mail server.

pub mod smtp;

pub use smtp::{build_message, SmtpMailer, SmtpSettings};

use crate::utils::error::MailError;
use std::path::PathBuf;

/// Something that can deliver report files
pub trait Mailer {
    /// Send every file in `attachments` to `recipients` in one message
    fn send_reports(&self, recipients: &[String], attachments: &[PathBuf]) -> Result<(), MailError>;
}
