//! Cart Records

use jiff::Timestamp;

use crate::domain::{products::records::ProductUuid, users::UserUuid};

/// Cart Record
///
/// One cart exists per user. Prices are read live from the catalog and are
/// not stored with the cart.
#[derive(Debug, Clone)]
pub struct CartRecord {
    pub user_uuid: UserUuid,
    pub subtotal: u64,
    pub items: Vec<CartItemRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Cart Item Record
#[derive(Debug, Clone)]
pub struct CartItemRecord {
    pub product_uuid: ProductUuid,
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub price: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
