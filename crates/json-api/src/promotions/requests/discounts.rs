//! Promo Discount Requests

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use freshmart_app::domain::promotions::data::discounts::PromoDiscount;

/// Discount carried by an event and the codes issued from it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum DiscountBody {
    /// Whole percent off, `1..=100`
    Percentage { percent: u16 },

    /// Amount off in minor units
    Fixed { amount: u64 },
}

impl From<DiscountBody> for PromoDiscount {
    fn from(body: DiscountBody) -> Self {
        match body {
            DiscountBody::Percentage { percent } => PromoDiscount::Percentage { percent },
            DiscountBody::Fixed { amount } => PromoDiscount::Fixed { amount },
        }
    }
}

impl From<PromoDiscount> for DiscountBody {
    fn from(discount: PromoDiscount) -> Self {
        match discount {
            PromoDiscount::Percentage { percent } => DiscountBody::Percentage { percent },
            PromoDiscount::Fixed { amount } => DiscountBody::Fixed { amount },
        }
    }
}
