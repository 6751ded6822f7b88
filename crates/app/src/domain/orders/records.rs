//! Order Records

use jiff::Timestamp;

use crate::{
    domain::{
        orders::{
            data::{DeliveryInfo, DeliveryOption},
            status::OrderStatus,
            totals::Totals,
        },
        products::records::ProductUuid,
        users::UserUuid,
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub items: Vec<OrderItemRecord>,
    pub delivery_info: DeliveryInfo,
    pub delivery_option: DeliveryOption,
    pub delivery_date: String,
    pub delivery_time: String,
    pub payment_method: String,
    pub totals: Totals,
    pub status: OrderStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order Item Record
///
/// `price` is the unit price at the time the order was placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemRecord {
    pub position: u32,
    pub product_uuid: ProductUuid,
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub price: u64,
}
