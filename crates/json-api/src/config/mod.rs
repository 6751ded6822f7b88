//! Server configuration module

use clap::Parser;
use thiserror::Error;

use freshmart_app::config::{AppConfig, ConfigError};

use crate::config::{
    db::DatabaseConfig,
    mail::MailConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    promotions::PromotionsConfig,
    server::ServerRuntimeConfig,
    store::StoreConfig,
};

pub(crate) mod db;
pub(crate) mod mail;
pub(crate) mod observability;
pub(crate) mod promotions;
pub(crate) mod server;
pub(crate) mod store;

/// Errors turning command line settings into application configuration.
#[derive(Debug, Error)]
pub enum ServerConfigError {
    /// A store or promotions setting is invalid.
    #[error(transparent)]
    App(#[from] ConfigError),

    /// Mail delivery is enabled without a sender address.
    #[error("MAIL_SENDER_EMAIL is required when MAIL_API_KEY is set")]
    MissingSender,
}

/// FreshMart JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "freshmart-json", about = "FreshMart JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Observability (traces/metrics) settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Transactional email settings.
    #[command(flatten)]
    pub mail: MailConfig,

    /// Pricing and working hours.
    #[command(flatten)]
    pub store: StoreConfig,

    /// Promotion campaign settings.
    #[command(flatten)]
    pub promotions: PromotionsConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Build and validate the configuration handed to the services.
    ///
    /// # Errors
    ///
    /// Returns an error when a store, mail or promotions setting is invalid.
    pub fn app_config(&self) -> Result<AppConfig, ServerConfigError> {
        let config = AppConfig {
            database_url: self.database.database_url.clone(),
            pool: self.database.pool_config(),
            mailer: self.mail.mailer_config()?,
            totals: self.store.totals_policy(),
            working_hours: self.store.working_hours()?,
            promotions: self.promotions.policy(),
        };

        config.validate()?;

        Ok(config)
    }
}
