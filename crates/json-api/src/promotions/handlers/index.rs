//! Promo Events Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*,
    promotions::{errors::into_status_error, get::PromoEventResponse},
    state::State,
};

/// Promo Events Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PromoEventsResponse {
    pub events: Vec<PromoEventResponse>,
}

/// Promo Events Index Handler
#[endpoint(tags("promo-events"), summary = "List Promo Events")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<PromoEventsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let events = state
        .app
        .promotions
        .list_events()
        .await
        .map_err(into_status_error)?;

    Ok(Json(PromoEventsResponse {
        events: events.into_iter().map(PromoEventResponse::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use freshmart_app::domain::promotions::{MockPromotionsService, records::PromoEventUuid};

    use crate::test_helpers::{make_event, promotions_service};

    use super::*;

    #[tokio::test]
    async fn test_index_lists_events() -> TestResult {
        let events = vec![
            make_event(PromoEventUuid::new()),
            make_event(PromoEventUuid::new()),
        ];

        let mut repo = MockPromotionsService::new();

        repo.expect_list_events()
            .once()
            .return_once(move || Ok(events));

        let mut res = TestClient::get("http://example.com/admin/promo-events")
            .send(&promotions_service(
                repo,
                Router::with_path("admin/promo-events").get(handler),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: PromoEventsResponse = res.take_json().await?;

        assert_eq!(body.events.len(), 2);

        Ok(())
    }
}
