//! Store Policy Config

use clap::Args;
use rust_decimal::Decimal;

use freshmart_app::{
    config::{self as app_config, ConfigError},
    domain::orders::{
        status::WorkingHours,
        totals::{DEFAULT_EXPRESS_FEE, TotalsPolicy},
    },
};

/// Pricing and working hours settings.
#[derive(Debug, Args)]
pub struct StoreConfig {
    /// Express delivery fee in minor units
    #[arg(long, env = "EXPRESS_FEE", default_value_t = DEFAULT_EXPRESS_FEE)]
    pub express_fee: u64,

    /// Tax rate as a fraction of the subtotal
    #[arg(long, env = "TAX_RATE", default_value = "0.10")]
    pub tax_rate: Decimal,

    /// Hour the store opens (inclusive)
    #[arg(long, env = "STORE_OPENS_AT", default_value_t = 8)]
    pub store_opens_at: i8,

    /// Hour the store closes (exclusive)
    #[arg(long, env = "STORE_CLOSES_AT", default_value_t = 18)]
    pub store_closes_at: i8,

    /// Days deliveries can be completed
    #[arg(
        long,
        env = "WORKING_DAYS",
        value_delimiter = ',',
        default_value = "mon,tue,wed,thu,fri,sat"
    )]
    pub working_days: Vec<String>,

    /// IANA time zone the working hours are expressed in
    #[arg(long, env = "STORE_TIME_ZONE", default_value = "UTC")]
    pub store_time_zone: String,
}

impl StoreConfig {
    pub(super) fn totals_policy(&self) -> TotalsPolicy {
        TotalsPolicy {
            express_fee: self.express_fee,
            tax_rate: self.tax_rate,
        }
    }

    pub(super) fn working_hours(&self) -> Result<WorkingHours, ConfigError> {
        let days = self
            .working_days
            .iter()
            .map(|day| app_config::parse_weekday(day))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(WorkingHours {
            opens_at: self.store_opens_at,
            closes_at: self.store_closes_at,
            days,
            time_zone: app_config::parse_time_zone(&self.store_time_zone)?,
        })
    }
}
