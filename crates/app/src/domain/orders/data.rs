//! Order Data

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::domain::{
    orders::{records::OrderUuid, totals::ClientTotals},
    products::records::ProductUuid,
    users::UserUuid,
};

/// Contact and address details captured at checkout.
///
/// Every field is always present; anything the customer left out is an
/// empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub notes: String,
}

/// Delivery speed chosen at checkout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DeliveryOption {
    #[default]
    Standard,
    Express,
}

impl DeliveryOption {
    #[must_use]
    pub const fn to_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Express => "express",
        }
    }
}

impl fmt::Display for DeliveryOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown delivery option: {0}")]
pub struct UnknownDeliveryOption(pub String);

impl FromStr for DeliveryOption {
    type Err = UnknownDeliveryOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "express" => Ok(Self::Express),
            other => Err(UnknownDeliveryOption(other.to_string())),
        }
    }
}

/// Line item supplied by the client at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_uuid: ProductUuid,
    pub quantity: u32,

    /// Price shown to the customer. Falls back to the live catalog price.
    pub price: Option<u64>,
}

/// New Order Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,

    /// When empty the user's stored cart is used instead.
    pub items: Vec<NewOrderItem>,
    pub delivery_info: DeliveryInfo,
    pub delivery_option: DeliveryOption,
    pub delivery_date: String,
    pub delivery_time: String,
    pub payment_method: String,

    /// Totals the client displayed, compared against the server's.
    pub client_totals: Option<ClientTotals>,
}

/// Order Update Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderUpdate {
    pub delivery_info: DeliveryInfo,
    pub delivery_option: DeliveryOption,
    pub delivery_date: String,
    pub delivery_time: String,
    pub payment_method: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_option_parses_known_values() {
        assert_eq!("express".parse(), Ok(DeliveryOption::Express));
        assert_eq!("standard".parse(), Ok(DeliveryOption::Standard));
        assert_eq!(
            "drone".parse::<DeliveryOption>(),
            Err(UnknownDeliveryOption("drone".to_string()))
        );
    }
}
