//! Promotion Discounts

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::pricing::{self, PricingError};

/// Discount carried by a promo event and every code issued from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PromoDiscount {
    /// Whole percent off the order amount, `1..=100`.
    Percentage { percent: u16 },

    /// Fixed amount off, in minor units.
    Fixed { amount: u64 },
}

impl PromoDiscount {
    #[must_use]
    pub const fn to_str(&self) -> &'static str {
        match self {
            Self::Percentage { .. } => "percentage",
            Self::Fixed { .. } => "fixed",
        }
    }

    /// The stored magnitude: percent for percentages, minor units otherwise.
    #[must_use]
    pub fn amount(&self) -> u64 {
        match self {
            Self::Percentage { percent } => u64::from(*percent),
            Self::Fixed { amount } => *amount,
        }
    }

    /// Rebuild a discount from its stored kind and magnitude.
    #[must_use]
    pub fn from_parts(kind: &str, amount: u64) -> Option<Self> {
        match kind {
            "percentage" => u16::try_from(amount)
                .ok()
                .map(|percent| Self::Percentage { percent }),
            "fixed" => Some(Self::Fixed { amount }),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Percentage { percent } => (1..=100).contains(percent),
            Self::Fixed { amount } => *amount > 0,
        }
    }

    /// Amount taken off `order_amount`. Never exceeds the order amount.
    ///
    /// # Errors
    ///
    /// Returns an error if the percentage cannot be applied.
    pub fn discount_for(&self, order_amount: u64) -> Result<u64, PricingError> {
        let discount = match self {
            Self::Percentage { percent } => {
                pricing::apply_rate(Decimal::new(i64::from(*percent), 2), order_amount)?
            }
            Self::Fixed { amount } => *amount,
        };

        Ok(discount.min(order_amount))
    }
}

impl fmt::Display for PromoDiscount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percentage { percent } => write!(f, "{percent}% off"),
            Self::Fixed { amount } => write!(f, "{} off", pricing::format_minor(*amount)),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn percentage_discount_rounds_half_away_from_zero() -> TestResult {
        let discount = PromoDiscount::Percentage { percent: 10 };

        assert_eq!(discount.discount_for(14_300)?, 1_430);
        assert_eq!(discount.discount_for(5)?, 1);

        Ok(())
    }

    #[test]
    fn fixed_discount_is_capped_at_order_amount() -> TestResult {
        let discount = PromoDiscount::Fixed { amount: 5_000 };

        assert_eq!(discount.discount_for(12_000)?, 5_000);
        assert_eq!(discount.discount_for(3_000)?, 3_000);

        Ok(())
    }

    #[test]
    fn from_parts_rejects_unknown_kind() {
        assert_eq!(
            PromoDiscount::from_parts("percentage", 15),
            Some(PromoDiscount::Percentage { percent: 15 })
        );
        assert_eq!(
            PromoDiscount::from_parts("fixed", 500),
            Some(PromoDiscount::Fixed { amount: 500 })
        );
        assert_eq!(PromoDiscount::from_parts("bogo", 1), None);
    }

    #[test]
    fn validity_bounds() {
        assert!(PromoDiscount::Percentage { percent: 100 }.is_valid());
        assert!(!PromoDiscount::Percentage { percent: 0 }.is_valid());
        assert!(!PromoDiscount::Percentage { percent: 101 }.is_valid());
        assert!(!PromoDiscount::Fixed { amount: 0 }.is_valid());
    }

    #[test]
    fn displays_human_readable_discount() {
        assert_eq!(
            PromoDiscount::Percentage { percent: 10 }.to_string(),
            "10% off"
        );
        assert_eq!(
            PromoDiscount::Fixed { amount: 5_050 }.to_string(),
            "50.50 off"
        );
    }
}
