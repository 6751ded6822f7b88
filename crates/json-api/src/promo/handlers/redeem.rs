//! Redeem Code Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    extensions::*,
    promo::validate::{CodeCheckRequest, CodeValidationResponse},
    promotions::errors::into_status_error,
    state::State,
};

/// Redeem Code Handler
///
/// Checks the code and records one use.
#[endpoint(
    tags("promo"),
    summary = "Redeem Promo Code",
    responses(
        (status_code = StatusCode::OK, description = "Code redeemed"),
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
        .redeem_code(request.code, request.order_amount, Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(Json(validation.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use serde_json::json;
    use testresult::TestResult;

    use freshmart_app::domain::promotions::{
        CodeRejection, MockPromotionsService, PromotionsServiceError,
        data::discounts::PromoDiscount, records::CodeValidation,
    };

    use crate::test_helpers::promotions_service;

    use super::*;

    fn make_service(repo: MockPromotionsService) -> Service {
        promotions_service(repo, Router::with_path("promo/redeem").post(handler))
    }

    #[tokio::test]
    async fn test_redeem_success() -> TestResult {
        let mut repo = MockPromotionsService::new();

        repo.expect_redeem_code()
            .once()
            .withf(|code, amount, _| code == "AB12CD34" && *amount == 3_000)
            .return_once(|_, _, _| {
                Ok(CodeValidation {
                    code: "AB12CD34".to_string(),
                    discount: PromoDiscount::Fixed { amount: 5_000 },
                    order_amount: 3_000,
                    discount_amount: 3_000,
                    valid_until: Timestamp::UNIX_EPOCH,
                })
            });

        let res = TestClient::post("http://example.com/promo/redeem")
            .json(&json!({ "code": "AB12CD34", "order_amount": 3_000 }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_used_code_returns_422() -> TestResult {
        let mut repo = MockPromotionsService::new();

        repo.expect_redeem_code()
            .once()
            .return_once(|_, _, _| Err(PromotionsServiceError::Rejected(CodeRejection::Exhausted)));

        let res = TestClient::post("http://example.com/promo/redeem")
            .json(&json!({ "code": "AB12CD34", "order_amount": 3_000 }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }
}
