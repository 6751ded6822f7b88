//! Delete Promo Event Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, promotions::errors::into_status_error, state::State};

/// Delete Promo Event Handler
///
/// Codes already issued from the event remain usable.
#[endpoint(
    tags("promo-events"),
    summary = "Delete Promo Event",
    responses(
        (status_code = StatusCode::OK, description = "Promo event deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Promo event not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    event: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .promotions
        .delete_event(event.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::OK)
}
