//! Create Promo Event Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use crate::{
    extensions::*,
    promotions::{
        errors::into_status_error, get::PromoEventResponse, requests::CreatePromoEventRequest,
    },
    state::State,
};

/// Create Promo Event Handler
#[endpoint(
    tags("promo-events"),
    summary = "Create Promo Event",
    responses(
        (status_code = StatusCode::CREATED, description = "Promo event created"),
        (status_code = StatusCode::CONFLICT, description = "Promo event already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreatePromoEventRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<PromoEventResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let event = state
        .app
        .promotions
        .create_event(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/api/admin/promo-events/{}", event.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(event.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use serde_json::json;
    use testresult::TestResult;

    use freshmart_app::domain::promotions::{
        MockPromotionsService, PromotionsServiceError,
        data::{criteria::PromoCriteria, discounts::PromoDiscount},
        records::PromoEventUuid,
    };

    use crate::test_helpers::{make_event, promotions_service};

    use super::*;

    fn make_service(repo: MockPromotionsService) -> Service {
        promotions_service(repo, Router::with_path("admin/promo-events").post(handler))
    }

    #[tokio::test]
    async fn test_create_event_success() -> TestResult {
        let uuid = PromoEventUuid::new();

        let mut repo = MockPromotionsService::new();

        repo.expect_create_event()
            .once()
            .withf(move |event| {
                event.uuid == uuid
                    && event.discount == PromoDiscount::Percentage { percent: 15 }
                    && event.criteria
                        == Some(PromoCriteria::CategorySet {
                            categories: vec!["fruits".to_string(), "seafood".to_string()],
                        })
            })
            .return_once(move |_| Ok(make_event(uuid)));

        let res = TestClient::post("http://example.com/admin/promo-events")
            .json(&json!({
                "uuid": uuid.into_uuid(),
                "name": "FRUITS_AND_SEAFOOD",
                "discount": { "type": "percentage", "percent": 15 },
                "criteria": { "kind": "category_set", "categories": ["fruits", "seafood"] },
            }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(
            location,
            Some(format!("/api/admin/promo-events/{uuid}").as_str())
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_create_duplicate_event_returns_409() -> TestResult {
        let mut repo = MockPromotionsService::new();

        repo.expect_create_event()
            .once()
            .return_once(|_| Err(PromotionsServiceError::AlreadyExists));

        let res = TestClient::post("http://example.com/admin/promo-events")
            .json(&json!({
                "name": "WELCOME",
                "discount": { "type": "fixed", "amount": 500 },
            }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
