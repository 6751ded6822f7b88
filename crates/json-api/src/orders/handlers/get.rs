//! Get Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use freshmart_app::domain::orders::{
    data::DeliveryInfo,
    records::{OrderItemRecord, OrderRecord},
};

use crate::{extensions::*, orders::errors::into_status_error, state::State};

/// Delivery details. Omitted fields are empty strings.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct DeliveryInfoBody {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub notes: String,
}

impl From<DeliveryInfo> for DeliveryInfoBody {
    fn from(info: DeliveryInfo) -> Self {
        Self {
            name: info.name,
            email: info.email,
            phone: info.phone,
            address: info.address,
            city: info.city,
            state: info.state,
            zip: info.zip,
            notes: info.notes,
        }
    }
}

impl From<DeliveryInfoBody> for DeliveryInfo {
    fn from(body: DeliveryInfoBody) -> Self {
        Self {
            name: body.name,
            email: body.email,
            phone: body.phone,
            address: body.address,
            city: body.city,
            state: body.state,
            zip: body.zip,
            notes: body.notes,
        }
    }
}

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,
    pub user_uuid: Uuid,
    pub items: Vec<OrderItemResponse>,
    pub delivery_info: DeliveryInfoBody,

    /// `standard` or `express`
    pub delivery_option: String,
    pub delivery_date: String,
    pub delivery_time: String,
    pub payment_method: String,

    /// Amounts in minor units
    pub subtotal: u64,
    pub shipping: u64,
    pub tax: u64,
    pub total: u64,

    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        Self {
            uuid: order.uuid.into(),
            user_uuid: order.user_uuid.into(),
            items: order.items.into_iter().map(OrderItemResponse::from).collect(),
            delivery_info: order.delivery_info.into(),
            delivery_option: order.delivery_option.to_string(),
            delivery_date: order.delivery_date,
            delivery_time: order.delivery_time,
            payment_method: order.payment_method,
            subtotal: order.totals.subtotal,
            shipping: order.totals.shipping,
            tax: order.totals.tax,
            total: order.totals.total,
            status: order.status.to_string(),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// Order Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub product_uuid: Uuid,
    pub name: String,
    pub category: String,
    pub quantity: u32,

    /// Unit price when the order was placed
    pub price: u64,
}

impl From<OrderItemRecord> for OrderItemResponse {
    fn from(item: OrderItemRecord) -> Self {
        Self {
            product_uuid: item.product_uuid.into(),
            name: item.name,
            category: item.category,
            quantity: item.quantity,
            price: item.price,
        }
    }
}

/// Get Order Handler
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    responses(
        (status_code = StatusCode::OK, description = "Order found"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let order = state
        .app
        .orders
        .get_order(order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use freshmart_app::domain::{
        orders::{MockOrdersService, OrdersServiceError, records::OrderUuid},
        users::UserUuid,
    };

    use crate::test_helpers::{make_order, orders_service};

    use super::*;

    fn make_service(repo: MockOrdersService) -> Service {
        orders_service(repo, Router::with_path("orders/{order}").get(handler))
    }

    #[tokio::test]
    async fn test_get_order_success() -> TestResult {
        let uuid = OrderUuid::new();
        let order = make_order(uuid, UserUuid::new());

        let mut repo = MockOrdersService::new();

        repo.expect_get_order()
            .once()
            .withf(move |o| *o == uuid)
            .return_once(move |_| Ok(order));

        let mut res = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.status, "pending");
        assert_eq!(body.delivery_option, "standard");
        assert_eq!(
            (body.subtotal, body.shipping, body.tax, body.total),
            (10_000, 0, 1_000, 11_000)
        );
        assert_eq!(body.delivery_info.email, "asha@example.com");
        assert_eq!(body.delivery_info.city, "");

        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing_order_returns_404() -> TestResult {
        let mut repo = MockOrdersService::new();

        repo.expect_get_order()
            .once()
            .return_once(|_| Err(OrdersServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/orders/{}", OrderUuid::new()))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
