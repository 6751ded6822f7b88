//! Create Order Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use freshmart_app::domain::orders::{
    data::{DeliveryOption, NewOrder, NewOrderItem},
    records::OrderUuid,
    totals::ClientTotals,
};

use crate::{
    extensions::*,
    observability,
    orders::{
        errors::into_status_error,
        get::{DeliveryInfoBody, OrderResponse},
    },
    state::State,
};

/// Line item sent at checkout.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemRequest {
    pub product_uuid: Uuid,
    pub quantity: u32,

    /// Price shown to the customer; the catalog price is used when omitted
    #[serde(default)]
    pub price: Option<u64>,
}

impl From<OrderItemRequest> for NewOrderItem {
    fn from(item: OrderItemRequest) -> Self {
        NewOrderItem {
            product_uuid: item.product_uuid.into(),
            quantity: item.quantity,
            price: item.price,
        }
    }
}

/// Totals the client displayed. Informational only.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct ClientTotalsRequest {
    pub subtotal: Option<u64>,
    pub shipping: Option<u64>,
    pub tax: Option<u64>,
    pub total: Option<u64>,
}

impl From<ClientTotalsRequest> for ClientTotals {
    fn from(totals: ClientTotalsRequest) -> Self {
        ClientTotals {
            subtotal: totals.subtotal,
            shipping: totals.shipping,
            tax: totals.tax,
            total: totals.total,
        }
    }
}

/// Create Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderRequest {
    /// Client-chosen identifier; generated when omitted
    #[serde(default)]
    pub uuid: Option<Uuid>,
    pub user_uuid: Uuid,

    /// When empty the user's stored cart is ordered
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,

    #[serde(default)]
    pub delivery_info: DeliveryInfoBody,

    /// `standard` or `express`
    #[serde(default = "standard")]
    pub delivery_option: String,

    #[serde(default)]
    pub delivery_date: String,

    #[serde(default)]
    pub delivery_time: String,

    #[serde(default)]
    pub payment_method: String,

    #[serde(default)]
    pub totals: Option<ClientTotalsRequest>,
}

fn standard() -> String {
    DeliveryOption::Standard.to_string()
}

impl CreateOrderRequest {
    fn into_new_order(self) -> Result<NewOrder, StatusError> {
        let delivery_option = parse_delivery_option(&self.delivery_option)?;

        Ok(NewOrder {
            uuid: self.uuid.map_or_else(OrderUuid::new, Into::into),
            user_uuid: self.user_uuid.into(),
            items: self.items.into_iter().map(NewOrderItem::from).collect(),
            delivery_info: self.delivery_info.into(),
            delivery_option,
            delivery_date: self.delivery_date,
            delivery_time: self.delivery_time,
            payment_method: self.payment_method,
            client_totals: self.totals.map(ClientTotals::from),
        })
    }
}

pub(crate) fn parse_delivery_option(value: &str) -> Result<DeliveryOption, StatusError> {
    value
        .parse::<DeliveryOption>()
        .or_400("Unknown delivery option")
}

/// Create Order Handler
///
/// Places the order, then runs first-order and promo-event rewards. Reward
/// failures never affect the response.
#[endpoint(
    tags("orders"),
    summary = "Place Order",
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::CONFLICT, description = "Order already exists"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let new_order = json.into_inner().into_new_order()?;

    let order = state
        .app
        .orders
        .place_order(new_order)
        .await
        .map_err(into_status_error)?;

    let rewards = state.app.rewards.reward_order(&order, Timestamp::now()).await;

    observability::record_order_placed(order.delivery_option.to_str());
    observability::record_promo_codes_issued(
        "welcome",
        usize::from(rewards.welcome_code.is_some()),
    );
    observability::record_promo_codes_issued("event", rewards.event_codes.len());

    debug!(
        order = %order.uuid,
        welcome_code = rewards.welcome_code.is_some(),
        event_codes = rewards.event_codes.len(),
        "order rewards processed"
    );

    res.add_header(LOCATION, format!("/api/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}
