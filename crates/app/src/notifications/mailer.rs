//! Transactional email delivery.

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// A rendered email ready to be handed to a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum MailerError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider returned a non-2xx response.
    #[error("unexpected response from email provider: {0}")]
    UnexpectedResponse(String),
}

#[automock]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a single message.
    async fn send_email(&self, message: EmailMessage) -> Result<(), MailerError>;
}

/// Connection details for an HTTP transactional email API.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// Full URL of the send endpoint.
    pub api_url: String,

    /// Provider API key, sent in the `api-key` header.
    pub api_key: String,

    pub sender_name: String,
    pub sender_email: String,

    /// Upper bound on a single send request.
    pub timeout: Duration,
}

/// Mailer backed by an HTTP email API.
#[derive(Debug, Clone)]
pub struct HttpMailer {
    config: MailerConfig,
    http: Client,
}

impl HttpMailer {
    /// Create a mailer from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: MailerConfig) -> Result<Self, MailerError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { config, http })
    }
}

#[derive(Debug, Serialize)]
struct Contact<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    email: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailRequest<'a> {
    sender: Contact<'a>,
    to: [Contact<'a>; 1],
    subject: &'a str,
    html_content: &'a str,
}

#[async_trait]
impl Mailer for HttpMailer {
    #[tracing::instrument(name = "mailer.http.send_email", skip(self, message), err)]
    async fn send_email(&self, message: EmailMessage) -> Result<(), MailerError> {
        let body = SendEmailRequest {
            sender: Contact {
                name: Some(&self.config.sender_name),
                email: &self.config.sender_email,
            },
            to: [Contact {
                name: None,
                email: &message.to,
            }],
            subject: &message.subject,
            html_content: &message.html_body,
        };

        let response = self
            .http
            .post(&self.config.api_url)
            .header("api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(MailerError::UnexpectedResponse(format!(
                "send request failed with status {status}: {text}"
            )));
        }

        Ok(())
    }
}

/// Mailer that only logs. Used when no provider is configured.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_email(&self, message: EmailMessage) -> Result<(), MailerError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            bytes = message.html_body.len(),
            "email delivery disabled, message logged only"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn request_body_uses_provider_field_names() -> TestResult {
        let body = SendEmailRequest {
            sender: Contact {
                name: Some("FreshMart"),
                email: "hello@freshmart.test",
            },
            to: [Contact {
                name: None,
                email: "asha@example.com",
            }],
            subject: "Hi",
            html_content: "<p>Hi</p>",
        };

        let json = serde_json::to_value(&body)?;

        assert_eq!(
            json,
            serde_json::json!({
                "sender": { "name": "FreshMart", "email": "hello@freshmart.test" },
                "to": [{ "email": "asha@example.com" }],
                "subject": "Hi",
                "htmlContent": "<p>Hi</p>",
            })
        );

        Ok(())
    }

    #[tokio::test]
    async fn log_mailer_always_succeeds() {
        let result = LogMailer
            .send_email(EmailMessage {
                to: "asha@example.com".to_string(),
                subject: "Hi".to_string(),
                html_body: "<p>Hi</p>".to_string(),
            })
            .await;

        assert!(result.is_ok(), "expected Ok, got {result:?}");
    }
}
