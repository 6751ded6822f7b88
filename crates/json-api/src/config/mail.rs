//! Mail Config

use std::time::Duration;

use clap::Args;

use freshmart_app::notifications::MailerConfig;

use super::ServerConfigError;

/// Transactional email settings.
#[derive(Debug, Args)]
pub struct MailConfig {
    /// Send endpoint of the email provider's HTTP API
    #[arg(
        long,
        env = "MAIL_API_URL",
        default_value = "https://api.brevo.com/v3/smtp/email"
    )]
    pub mail_api_url: String,

    /// Provider API key; email is only logged when unset
    #[arg(long, env = "MAIL_API_KEY", hide_env_values = true)]
    pub mail_api_key: Option<String>,

    /// Display name on outgoing email
    #[arg(long, env = "MAIL_SENDER_NAME", default_value = "FreshMart")]
    pub mail_sender_name: String,

    /// Sender address on outgoing email
    #[arg(long, env = "MAIL_SENDER_EMAIL")]
    pub mail_sender_email: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "MAIL_TIMEOUT_SECONDS", default_value_t = 10_u64)]
    pub mail_timeout_seconds: u64,
}

impl MailConfig {
    pub(super) fn mailer_config(&self) -> Result<Option<MailerConfig>, ServerConfigError> {
        let Some(api_key) = self
            .mail_api_key
            .as_ref()
            .filter(|key| !key.trim().is_empty())
        else {
            return Ok(None);
        };

        let sender_email = self
            .mail_sender_email
            .clone()
            .filter(|email| !email.trim().is_empty())
            .ok_or(ServerConfigError::MissingSender)?;

        Ok(Some(MailerConfig {
            api_url: self.mail_api_url.clone(),
            api_key: api_key.clone(),
            sender_name: self.mail_sender_name.clone(),
            sender_email,
            timeout: Duration::from_secs(self.mail_timeout_seconds),
        }))
    }
}
