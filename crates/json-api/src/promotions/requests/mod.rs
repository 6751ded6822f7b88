//! Promo Event Requests

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use freshmart_app::domain::promotions::{
    data::{NewPromoEvent, PromoEventUpdate},
    records::PromoEventUuid,
};

use crate::promotions::requests::{criteria::CriteriaBody, discounts::DiscountBody};

pub(crate) mod criteria;
pub(crate) mod discounts;

/// Editable promo event fields.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub(crate) struct PromoEventRequest {
    /// Unique event name, e.g. `WELCOME`
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Free-form note on what grants the event
    #[serde(default)]
    pub trigger: String,

    pub discount: DiscountBody,

    /// Validity of issued codes, in days
    #[serde(default = "default_duration_days")]
    pub duration_days: u32,

    /// Minimum order amount for issued codes, in minor units
    #[serde(default)]
    pub min_order_amount: u64,

    #[serde(default = "default_is_active")]
    pub is_active: bool,

    /// Orders matching these criteria earn a code from this event
    #[serde(default)]
    pub criteria: Option<CriteriaBody>,
}

const fn default_duration_days() -> u32 {
    30
}

const fn default_is_active() -> bool {
    true
}

/// Create Promo Event Request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub(crate) struct CreatePromoEventRequest {
    /// Client-chosen identifier; generated when omitted
    #[serde(default)]
    pub uuid: Option<Uuid>,

    #[serde(flatten)]
    pub event: PromoEventRequest,
}

impl From<CreatePromoEventRequest> for NewPromoEvent {
    fn from(request: CreatePromoEventRequest) -> Self {
        let event = request.event;

        NewPromoEvent {
            uuid: request.uuid.map_or_else(PromoEventUuid::new, Into::into),
            name: event.name,
            description: event.description,
            trigger: event.trigger,
            discount: event.discount.into(),
            duration_days: event.duration_days,
            min_order_amount: event.min_order_amount,
            is_active: event.is_active,
            criteria: event.criteria.map(Into::into),
        }
    }
}

impl From<PromoEventRequest> for PromoEventUpdate {
    fn from(event: PromoEventRequest) -> Self {
        PromoEventUpdate {
            name: event.name,
            description: event.description,
            trigger: event.trigger,
            discount: event.discount.into(),
            duration_days: event.duration_days,
            min_order_amount: event.min_order_amount,
            is_active: event.is_active,
            criteria: event.criteria.map(Into::into),
        }
    }
}
