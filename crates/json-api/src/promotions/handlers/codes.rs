//! Promo Event Codes Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use freshmart_app::domain::promotions::records::PromoCodeRecord;

use crate::{
    extensions::*,
    promotions::{errors::into_status_error, requests::discounts::DiscountBody},
    state::State,
};

/// Promo Code Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PromoCodeResponse {
    pub uuid: Uuid,
    pub code: String,
    pub event_name: String,
    pub recipient_email: String,
    pub discount: DiscountBody,
    pub min_order_amount: u64,

    /// Unlimited when absent
    pub max_uses: Option<u32>,
    pub used_count: u32,
    pub valid_from: String,
    pub valid_until: String,
    pub is_active: bool,
}

impl From<PromoCodeRecord> for PromoCodeResponse {
    fn from(code: PromoCodeRecord) -> Self {
        Self {
            uuid: code.uuid.into(),
            code: code.code,
            event_name: code.event_name,
            recipient_email: code.recipient_email,
            discount: code.discount.into(),
            min_order_amount: code.min_order_amount,
            max_uses: code.max_uses,
            used_count: code.used_count,
            valid_from: code.valid_from.to_string(),
            valid_until: code.valid_until.to_string(),
            is_active: code.is_active,
        }
    }
}

/// Promo Codes Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PromoCodesResponse {
    pub codes: Vec<PromoCodeResponse>,
}

/// Promo Event Codes Handler
#[endpoint(tags("promo-events"), summary = "List Codes Issued from a Promo Event")]
pub(crate) async fn handler(
    event: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<PromoCodesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let codes = state
        .app
        .promotions
        .list_event_codes(event.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(PromoCodesResponse {
        codes: codes.into_iter().map(PromoCodeResponse::from).collect(),
    }))
}
