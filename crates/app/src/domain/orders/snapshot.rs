//! Cart Snapshot
//!
//! Resolves the lines an order is placed for, either from the items the
//! client sent or from the user's stored cart.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::domain::{
    carts::records::CartItemRecord,
    orders::data::NewOrderItem,
    pricing::{self, PricingError},
    products::records::ProductUuid,
};

/// Where the snapshot lines came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    Client,
    Cart,
}

/// A priced order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotLine {
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub price: u64,
}

/// Priced lines ready to be written as an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSnapshot {
    pub source: SnapshotSource,
    pub lines: Vec<SnapshotLine>,
    pub subtotal: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("nothing to order")]
    Empty,

    #[error("line quantity must be greater than zero")]
    ZeroQuantity,

    #[error("unknown product {0}")]
    UnknownProduct(ProductUuid),

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

impl CartSnapshot {
    fn new(source: SnapshotSource, lines: Vec<SnapshotLine>) -> Result<Self, SnapshotError> {
        if lines.is_empty() {
            return Err(SnapshotError::Empty);
        }

        if lines.iter().any(|line| line.quantity == 0) {
            return Err(SnapshotError::ZeroQuantity);
        }

        let subtotal = pricing::subtotal(lines.iter().map(|line| (line.quantity, line.price)))?;

        Ok(Self {
            source,
            lines,
            subtotal,
        })
    }

    /// Snapshot client-supplied items. Lines without a price take the live
    /// price from `live_prices`.
    ///
    /// # Errors
    ///
    /// Returns an error for empty input, zero quantities, unpriced unknown
    /// products or an overflowing subtotal.
    pub fn from_client_items(
        items: &[NewOrderItem],
        live_prices: &FxHashMap<ProductUuid, u64>,
    ) -> Result<Self, SnapshotError> {
        let lines = items
            .iter()
            .map(|item| {
                let price = item
                    .price
                    .or_else(|| live_prices.get(&item.product_uuid).copied())
                    .ok_or(SnapshotError::UnknownProduct(item.product_uuid))?;

                Ok(SnapshotLine {
                    product_uuid: item.product_uuid,
                    quantity: item.quantity,
                    price,
                })
            })
            .collect::<Result<Vec<_>, SnapshotError>>()?;

        Self::new(SnapshotSource::Client, lines)
    }

    /// Snapshot the stored cart at its live prices.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Empty`] for an empty cart, or a pricing error.
    pub fn from_cart_items(items: &[CartItemRecord]) -> Result<Self, SnapshotError> {
        let lines = items
            .iter()
            .map(|item| SnapshotLine {
                product_uuid: item.product_uuid,
                quantity: item.quantity,
                price: item.price,
            })
            .collect();

        Self::new(SnapshotSource::Cart, lines)
    }
}
