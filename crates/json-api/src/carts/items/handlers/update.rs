//! Update Cart Item Handler

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

use crate::{
    carts::{errors::into_status_error, get::CartResponse},
    extensions::*,
    state::State,
};

/// Update Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCartItemRequest {
    /// New quantity; zero removes the line
    pub quantity: u32,
}

/// Update Cart Item Handler
#[endpoint(
    tags("carts"),
    summary = "Set Cart Item Quantity",
    responses(
        (status_code = StatusCode::OK, description = "Quantity updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Item is not in the cart"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    product: PathParam<Uuid>,
    json: JsonBody<UpdateCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cart = state
        .app
        .carts
        .set_item_quantity(
            user.into_inner().into(),
            product.into_inner().into(),
            json.into_inner().quantity,
        )
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
        carts_service(
            repo,
            Router::with_path("carts/{user}/items/{product}").put(handler),
        )
    }

    #[tokio::test]
    async fn test_set_quantity_success() -> TestResult {
        let user = UserUuid::new();
        let product = ProductUuid::new();
        let cart = make_cart(user);

        let mut repo = MockCartsService::new();

        repo.expect_set_item_quantity()
            .once()
            .withf(move |u, p, quantity| *u == user && *p == product && *quantity == 4)
            .return_once(move |_, _, _| Ok(cart));

        let res = TestClient::put(format!(
            "http://example.com/carts/{user}/items/{product}"
        ))
        .json(&json!({ "quantity": 4 }))
        .send(&make_service(repo))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_set_quantity_missing_line_returns_404() -> TestResult {
        let user = UserUuid::new();
        let product = ProductUuid::new();

        let mut repo = MockCartsService::new();

        repo.expect_set_item_quantity()
            .once()
            .return_once(|_, _, _| Err(CartsServiceError::NotFound));

        let res = TestClient::put(format!(
            "http://example.com/carts/{user}/items/{product}"
        ))
        .json(&json!({ "quantity": 2 }))
        .send(&make_service(repo))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
