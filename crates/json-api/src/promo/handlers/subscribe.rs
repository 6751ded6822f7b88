//! Subscribe Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, promotions::errors::into_status_error, state::State};

/// Subscribe Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SubscribeRequest {
    pub email: String,
}

/// Subscribe Response
///
/// Whether a code was mailed is never disclosed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SubscribeResponse {
    /// Normalized address
    pub email: String,

    /// False when the address was already subscribed
    pub newly_subscribed: bool,
    pub subscribed_at: String,
}

/// Subscribe Handler
#[endpoint(
    tags("promo"),
    summary = "Subscribe to Promotions",
    responses(
        (status_code = StatusCode::OK, description = "Subscribed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid email address"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<SubscribeRequest>,
    depot: &mut Depot,
) -> Result<Json<SubscribeResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let outcome = state
        .app
        .promotions
        .subscribe(json.into_inner().email, Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(Json(SubscribeResponse {
        email: outcome.subscriber.email,
        newly_subscribed: outcome.newly_subscribed,
        subscribed_at: outcome.subscriber.subscribed_at.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use freshmart_app::domain::promotions::{
        MockPromotionsService, PromotionsServiceError,
        records::{PromoSubscriberRecord, SubscriptionOutcome},
    };

    use crate::test_helpers::promotions_service;

    use super::*;

    fn make_service(repo: MockPromotionsService) -> Service {
        promotions_service(repo, Router::with_path("promo/subscribe").post(handler))
    }

    #[tokio::test]
    async fn test_subscribe_success() -> TestResult {
        let mut repo = MockPromotionsService::new();

        repo.expect_subscribe()
            .once()
            .withf(|email, _| email == "Asha@Example.com")
            .return_once(|_, _| {
                Ok(SubscriptionOutcome {
                    subscriber: PromoSubscriberRecord {
                        email: "asha@example.com".to_string(),
                        subscribed_at: Timestamp::UNIX_EPOCH,
                        updated_at: Timestamp::UNIX_EPOCH,
                    },
                    newly_subscribed: true,
                })
            });

        let mut res = TestClient::post("http://example.com/promo/subscribe")
            .json(&json!({ "email": "Asha@Example.com" }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: SubscribeResponse = res.take_json().await?;

        assert_eq!(body.email, "asha@example.com");
        assert!(body.newly_subscribed);

        Ok(())
    }

    #[tokio::test]
    async fn test_subscribe_invalid_email_returns_400() -> TestResult {
        let mut repo = MockPromotionsService::new();

        repo.expect_subscribe()
            .once()
            .return_once(|_, _| Err(PromotionsServiceError::InvalidEmail));

        let res = TestClient::post("http://example.com/promo/subscribe")
            .json(&json!({ "email": "not-an-email" }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
