//! Get Promo Event Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use freshmart_app::domain::promotions::records::PromoEventRecord;

use crate::{
    extensions::*,
    promotions::{
        errors::into_status_error,
        requests::{criteria::CriteriaBody, discounts::DiscountBody},
    },
    state::State,
};

/// Promo Event Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PromoEventResponse {
    pub uuid: Uuid,
    pub name: String,
    pub description: String,
    pub trigger: String,
    pub discount: DiscountBody,
    pub duration_days: u32,
    pub min_order_amount: u64,
    pub is_active: bool,
    pub criteria: Option<CriteriaBody>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PromoEventRecord> for PromoEventResponse {
    fn from(event: PromoEventRecord) -> Self {
        Self {
            uuid: event.uuid.into(),
            name: event.name,
            description: event.description,
            trigger: event.trigger,
            discount: event.discount.into(),
            duration_days: event.duration_days,
            min_order_amount: event.min_order_amount,
            is_active: event.is_active,
            criteria: event.criteria.map(Into::into),
            created_at: event.created_at.to_string(),
            updated_at: event.updated_at.to_string(),
        }
    }
}

/// Get Promo Event Handler
#[endpoint(
    tags("promo-events"),
    summary = "Get Promo Event",
    responses(
        (status_code = StatusCode::OK, description = "Promo event found"),
        (status_code = StatusCode::NOT_FOUND, description = "Promo event not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    event: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<PromoEventResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let event = state
        .app
        .promotions
        .get_event(event.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(event.into()))
}
