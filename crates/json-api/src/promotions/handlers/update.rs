//! Update Promo Event Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    extensions::*,
    promotions::{errors::into_status_error, get::PromoEventResponse, requests::PromoEventRequest},
    state::State,
};

/// Update Promo Event Handler
///
/// Replaces every editable field. Codes already issued keep their terms.
#[endpoint(
    tags("promo-events"),
    summary = "Update Promo Event",
    responses(
        (status_code = StatusCode::OK, description = "Promo event updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Promo event not found"),
        (status_code = StatusCode::CONFLICT, description = "Name already in use"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    event: PathParam<Uuid>,
    json: JsonBody<PromoEventRequest>,
    depot: &mut Depot,
) -> Result<Json<PromoEventResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let event = state
        .app
        .promotions
        .update_event(event.into_inner().into(), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(event.into()))
}
