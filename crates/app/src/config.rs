//! Application Configuration
//!
//! Everything the services need from the environment, gathered once at
//! startup and passed in explicitly.

use jiff::{civil::Weekday, tz::TimeZone};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    database::PoolConfig,
    domain::{
        orders::{status::WorkingHours, totals::TotalsPolicy},
        promotions::PromotionsPolicy,
    },
    notifications::MailerConfig,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("tax rate must be between 0 and 1, got {0}")]
    TaxRate(Decimal),

    #[error("working hours must satisfy 0 <= opens_at < closes_at <= 24, got {opens_at}..{closes_at}")]
    WorkingHours { opens_at: i8, closes_at: i8 },

    #[error("at least one working day is required")]
    NoWorkingDays,

    #[error("unknown weekday: {0}")]
    UnknownWeekday(String),

    #[error("unknown time zone {name}")]
    TimeZone {
        name: String,
        #[source]
        source: jiff::Error,
    },

    #[error("welcome promo event name cannot be empty")]
    WelcomeEventName,

    #[error("database pool needs at least one connection")]
    PoolSize,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub pool: PoolConfig,

    /// Email provider settings; messages are only logged when absent.
    pub mailer: Option<MailerConfig>,

    pub totals: TotalsPolicy,
    pub working_hours: WorkingHours,
    pub promotions: PromotionsPolicy,
}

impl AppConfig {
    /// Check the store policies for values the services cannot work with.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.totals.tax_rate < Decimal::ZERO || self.totals.tax_rate > Decimal::ONE {
            return Err(ConfigError::TaxRate(self.totals.tax_rate));
        }

        let WorkingHours {
            opens_at,
            closes_at,
            ..
        } = self.working_hours;

        if opens_at < 0 || opens_at >= closes_at || closes_at > 24 {
            return Err(ConfigError::WorkingHours {
                opens_at,
                closes_at,
            });
        }

        if self.working_hours.days.is_empty() {
            return Err(ConfigError::NoWorkingDays);
        }

        if self.pool.max_connections == 0 {
            return Err(ConfigError::PoolSize);
        }

        if self.promotions.welcome_event_name.trim().is_empty() {
            return Err(ConfigError::WelcomeEventName);
        }

        Ok(())
    }
}

/// Parse an English weekday name or its three letter abbreviation.
///
/// # Errors
///
/// Returns an error for anything else.
pub fn parse_weekday(value: &str) -> Result<Weekday, ConfigError> {
    let weekday = match value.trim().to_ascii_lowercase().as_str() {
        "mon" | "monday" => Weekday::Monday,
        "tue" | "tuesday" => Weekday::Tuesday,
        "wed" | "wednesday" => Weekday::Wednesday,
        "thu" | "thursday" => Weekday::Thursday,
        "fri" | "friday" => Weekday::Friday,
        "sat" | "saturday" => Weekday::Saturday,
        "sun" | "sunday" => Weekday::Sunday,
        _ => return Err(ConfigError::UnknownWeekday(value.to_string())),
    };

    Ok(weekday)
}

/// Resolve an IANA time zone name such as `Asia/Kolkata`.
///
/// # Errors
///
/// Returns an error when the name is not in the time zone database.
pub fn parse_time_zone(name: &str) -> Result<TimeZone, ConfigError> {
    TimeZone::get(name.trim()).map_err(|source| ConfigError::TimeZone {
        name: name.to_string(),
        source,
    })
}
