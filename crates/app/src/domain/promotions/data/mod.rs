//! Promotions Data

use jiff::Timestamp;

use crate::domain::promotions::{
    data::{criteria::PromoCriteria, discounts::PromoDiscount},
    records::{PromoCodeUuid, PromoEventUuid},
};

pub mod criteria;
pub mod discounts;

/// New Promo Event Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPromoEvent {
    pub uuid: PromoEventUuid,
    pub name: String,
    pub description: String,
    pub trigger: String,
    pub discount: PromoDiscount,
    pub duration_days: u32,
    pub min_order_amount: u64,
    pub is_active: bool,
    pub criteria: Option<PromoCriteria>,
}

/// Promo Event Update Data
///
/// Replaces every editable field of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoEventUpdate {
    pub name: String,
    pub description: String,
    pub trigger: String,
    pub discount: PromoDiscount,
    pub duration_days: u32,
    pub min_order_amount: u64,
    pub is_active: bool,
    pub criteria: Option<PromoCriteria>,
}

/// New Promo Code Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NewPromoCode {
    pub uuid: PromoCodeUuid,
    pub code: String,
    pub promo_event_uuid: Option<PromoEventUuid>,
    pub event_name: String,
    pub recipient_email: String,
    pub discount: PromoDiscount,
    pub min_order_amount: u64,
    pub max_uses: Option<u32>,
    pub valid_from: Timestamp,
    pub valid_until: Timestamp,
}
