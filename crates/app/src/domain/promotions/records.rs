//! Promotions Records

use jiff::Timestamp;

use crate::{
    domain::promotions::{
        data::{criteria::PromoCriteria, discounts::PromoDiscount},
        errors::CodeRejection,
    },
    uuids::TypedUuid,
};

/// Promo Event UUID
pub type PromoEventUuid = TypedUuid<PromoEventRecord>;

/// Promo Event Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoEventRecord {
    pub uuid: PromoEventUuid,
    pub name: String,
    pub description: String,
    pub trigger: String,
    pub discount: PromoDiscount,
    pub duration_days: u32,
    pub min_order_amount: u64,
    pub is_active: bool,
    pub criteria: Option<PromoCriteria>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Promo Code UUID
pub type PromoCodeUuid = TypedUuid<PromoCodeRecord>;

/// Promo Code Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoCodeRecord {
    pub uuid: PromoCodeUuid,
    pub code: String,
    pub promo_event_uuid: Option<PromoEventUuid>,
    pub event_name: String,
    pub recipient_email: String,
    pub discount: PromoDiscount,
    pub min_order_amount: u64,
    pub max_uses: Option<u32>,
    pub used_count: u32,
    pub valid_from: Timestamp,
    pub valid_until: Timestamp,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PromoCodeRecord {
    /// Check whether the code can be applied to `order_amount` at `now`.
    ///
    /// # Errors
    ///
    /// Returns the first reason the code cannot be used.
    pub fn check(&self, order_amount: u64, now: Timestamp) -> Result<(), CodeRejection> {
        if !self.is_active {
            return Err(CodeRejection::Inactive);
        }

        if now < self.valid_from {
            return Err(CodeRejection::NotYetValid);
        }

        if now > self.valid_until {
            return Err(CodeRejection::Expired);
        }

        if order_amount < self.min_order_amount {
            return Err(CodeRejection::BelowMinimum {
                minimum: self.min_order_amount,
            });
        }

        if self.max_uses.is_some_and(|max| self.used_count >= max) {
            return Err(CodeRejection::Exhausted);
        }

        Ok(())
    }
}

/// Outcome of a successful code check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeValidation {
    pub code: String,
    pub discount: PromoDiscount,
    pub order_amount: u64,
    pub discount_amount: u64,
    pub valid_until: Timestamp,
}

/// Promo Subscriber Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoSubscriberRecord {
    pub email: String,
    pub subscribed_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Result of a subscription request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionOutcome {
    pub subscriber: PromoSubscriberRecord,
    pub newly_subscribed: bool,
}
