//! Prices
//!
//! Amounts are minor currency units. All arithmetic is checked so a hostile
//! quantity or price cannot wrap a subtotal around.

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use thiserror::Error;

/// Errors that can occur while pricing line items.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// An intermediate amount did not fit in the money representation.
    #[error("amount overflowed")]
    Overflow,

    /// A rate could not be applied to an amount.
    #[error("rate conversion failed")]
    RateConversion,
}

/// Price of `quantity` units at `price` each.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] when the product does not fit in a `u64`.
pub fn line_total(quantity: u32, price: u64) -> Result<u64, PricingError> {
    price
        .checked_mul(u64::from(quantity))
        .ok_or(PricingError::Overflow)
}

/// Sum of `quantity × price` over `(quantity, price)` pairs.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] when any line or the running sum overflows.
pub fn subtotal<I>(lines: I) -> Result<u64, PricingError>
where
    I: IntoIterator<Item = (u32, u64)>,
{
    lines.into_iter().try_fold(0_u64, |acc, (quantity, price)| {
        acc.checked_add(line_total(quantity, price)?)
            .ok_or(PricingError::Overflow)
    })
}

/// Apply `rate` (e.g. `0.10`) to a minor unit amount, rounding half away from zero.
///
/// # Errors
///
/// Returns [`PricingError::RateConversion`] if the result cannot be represented.
pub fn apply_rate(rate: Decimal, minor: u64) -> Result<u64, PricingError> {
    let Some(minor) = Decimal::from_u64(minor) else {
        return Err(PricingError::RateConversion);
    };

    let Some(applied) = rate.checked_mul(minor) else {
        return Err(PricingError::RateConversion);
    };

    applied
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or(PricingError::RateConversion)
}

/// Render minor units as a major unit amount, e.g. `12_900` as `129.00`.
pub fn format_minor(minor: u64) -> String {
    format!("{}.{:02}", minor / 100, minor % 100)
}
