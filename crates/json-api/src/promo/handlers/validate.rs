//! Validate Code Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use freshmart_app::domain::promotions::records::CodeValidation;

use crate::{
    extensions::*,
    promotions::{errors::into_status_error, requests::discounts::DiscountBody},
    state::State,
};

/// Code Check Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CodeCheckRequest {
    /// Matched case-insensitively
    pub code: String,

    /// Amount the code would apply to, in minor units
    pub order_amount: u64,
}

/// Code Validation Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CodeValidationResponse {
    pub code: String,
    pub discount: DiscountBody,
    pub order_amount: u64,

    /// Amount taken off, never more than the order amount
    pub discount_amount: u64,
    pub valid_until: String,
}

impl From<CodeValidation> for CodeValidationResponse {
    fn from(validation: CodeValidation) -> Self {
        Self {
            code: validation.code,
            discount: validation.discount.into(),
            order_amount: validation.order_amount,
            discount_amount: validation.discount_amount,
            valid_until: validation.valid_until.to_string(),
        }
    }
}

/// Validate Code Handler
///
/// Checks a code without using it.
#[endpoint(
    tags("promo"),
    summary = "Validate Promo Code",
    responses(
        (status_code = StatusCode::OK, description = "Code applies"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown code"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Code cannot be applied"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CodeCheckRequest>,
    depot: &mut Depot,
) -> Result<Json<CodeValidationResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let validation = state
        .app
        .promotions
        .validate_code(request.code, request.order_amount, Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(Json(validation.into()))
}
