//! Outbound email

pub mod mailer;
pub mod templates;

pub use mailer::{EmailMessage, HttpMailer, LogMailer, Mailer, MailerConfig, MailerError};
