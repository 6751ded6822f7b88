//! Orders Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*,
    orders::{errors::into_status_error, get::OrderResponse},
    state::State,
};

/// Orders Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    /// Newest first
    pub orders: Vec<OrderResponse>,
}

/// Orders Index Handler
#[endpoint(tags("orders"), summary = "List Orders")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let orders = state
        .app
        .orders
        .list_orders()
        .await
        .map_err(into_status_error)?;

    Ok(Json(OrdersResponse {
        orders: orders.into_iter().map(OrderResponse::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use freshmart_app::domain::{
        orders::{MockOrdersService, records::OrderUuid},
        users::UserUuid,
    };

    use crate::test_helpers::{make_order, orders_service};

    use super::*;

    #[tokio::test]
    async fn test_index_lists_all_orders() -> TestResult {
        let user = UserUuid::new();
        let orders = vec![
            make_order(OrderUuid::new(), user),
            make_order(OrderUuid::new(), UserUuid::new()),
        ];

        let mut repo = MockOrdersService::new();

        repo.expect_list_orders()
            .once()
            .return_once(move || Ok(orders));

        let mut res = TestClient::get("http://example.com/orders")
            .send(&orders_service(repo, Router::with_path("orders").get(handler)))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: OrdersResponse = res.take_json().await?;

        assert_eq!(body.orders.len(), 2);

        Ok(())
    }
}
