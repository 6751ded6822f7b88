//! Update Order Handler

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

use freshmart_app::domain::orders::data::{DeliveryOption, OrderUpdate};

use crate::{
    extensions::*,
    orders::{
        create::parse_delivery_option,
        errors::into_status_error,
        get::{DeliveryInfoBody, OrderResponse},
    },
    state::State,
};

/// Update Order Request
///
/// Replaces the delivery details. Items and prices are fixed once placed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateOrderRequest {
    #[serde(default)]
    pub delivery_info: DeliveryInfoBody,

    #[serde(default = "standard")]
    pub delivery_option: String,

    #[serde(default)]
    pub delivery_date: String,

    #[serde(default)]
    pub delivery_time: String,

    #[serde(default)]
    pub payment_method: String,
}

fn standard() -> String {
    DeliveryOption::Standard.to_string()
}

impl UpdateOrderRequest {
    fn into_update(self) -> Result<OrderUpdate, StatusError> {
        Ok(OrderUpdate {
            delivery_option: parse_delivery_option(&self.delivery_option)?,
            delivery_info: self.delivery_info.into(),
            delivery_date: self.delivery_date,
            delivery_time: self.delivery_time,
            payment_method: self.payment_method,
        })
    }
}

/// Update Order Handler
#[endpoint(
    tags("orders"),
    summary = "Update Order",
    responses(
        (status_code = StatusCode::OK, description = "Order updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.update",
    skip(order, json, depot),
    fields(order_uuid = tracing::field::Empty, delivery_option = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<UpdateOrderRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let order = order.into_inner();
    let update = json.into_inner().into_update()?;

    let span = tracing::Span::current();

    span.record("order_uuid", tracing::field::display(order));
    span.record("delivery_option", update.delivery_option.to_str());

    let order = state
        .app
        .orders
        .update_order(order.into(), update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
