//! Merge Cart Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use freshmart_app::domain::carts::data::NewCartItem;

use crate::{
    carts::{errors::into_status_error, get::CartResponse},
    extensions::*,
    state::State,
};

/// Cart line kept by a guest before signing in.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct GuestCartItem {
    pub product_uuid: Uuid,
    pub quantity: u32,
}

impl From<GuestCartItem> for NewCartItem {
    fn from(item: GuestCartItem) -> Self {
        NewCartItem {
            product_uuid: item.product_uuid.into(),
            quantity: item.quantity,
        }
    }
}

/// Merge Cart Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MergeCartRequest {
    pub items: Vec<GuestCartItem>,
}

/// Merge Cart Handler
///
/// Adds each guest line's quantity to the user's stored cart.
#[endpoint(
    tags("carts"),
    summary = "Merge Guest Cart",
    responses(
        (status_code = StatusCode::OK, description = "Cart merged"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    json: JsonBody<MergeCartRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let items = json.into_inner().items.into_iter().map(Into::into).collect();

    let cart = state
        .app
        .carts
        .merge_items(user.into_inner().into(), items)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use serde_json::json;
    use testresult::TestResult;

    use freshmart_app::domain::{
        carts::{CartsServiceError, MockCartsService},
        products::records::ProductUuid,
        users::UserUuid,
    };

    use crate::test_helpers::{carts_service, make_cart};

    use super::*;

    fn make_service(repo: MockCartsService) -> Service {
        carts_service(repo, Router::with_path("carts/{user}/merge").post(handler))
    }

    #[tokio::test]
    async fn test_merge_forwards_guest_items() -> TestResult {
        let user = UserUuid::new();
        let product = ProductUuid::new();
        let cart = make_cart(user);

        let mut repo = MockCartsService::new();

        repo.expect_merge_items()
            .once()
            .withf(move |u, items| {
                *u == user
                    && *items
                        == vec![NewCartItem {
                            product_uuid: product,
                            quantity: 3,
                        }]
            })
            .return_once(move |_, _| Ok(cart));

        let res = TestClient::post(format!("http://example.com/carts/{user}/merge"))
            .json(&json!({ "items": [{ "product_uuid": product.into_uuid(), "quantity": 3 }] }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_merge_unknown_product_returns_400() -> TestResult {
        let user = UserUuid::new();

        let mut repo = MockCartsService::new();

        repo.expect_merge_items()
            .once()
            .return_once(|_, _| Err(CartsServiceError::InvalidReference));

        let res = TestClient::post(format!("http://example.com/carts/{user}/merge"))
            .json(&json!({ "items": [{ "product_uuid": ProductUuid::new().into_uuid(), "quantity": 1 }] }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
