//! Orders service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rustc_hash::FxHashMap;
use sqlx::{Postgres, Transaction};
use tracing::{Span, info, warn};

use crate::{
    database::Db,
    domain::{
        carts::repositories::PgCartItemsRepository,
        orders::{
            data::{NewOrder, OrderUpdate},
            errors::OrdersServiceError,
            records::{OrderItemRecord, OrderRecord, OrderUuid},
            repositories::{PgOrderItemsRepository, PgOrdersRepository},
            snapshot::{CartSnapshot, SnapshotSource},
            status::{self, OrderStatus, WorkingHours},
            totals::{self, TotalsPolicy},
        },
        products::{records::ProductUuid, repository::PgProductsRepository},
        users::UserUuid,
    },
    notifications::{Mailer, templates},
};

#[derive(Clone)]
pub struct PgOrdersService {
    db: Db,
    orders: PgOrdersRepository,
    items: PgOrderItemsRepository,
    products: PgProductsRepository,
    cart_items: PgCartItemsRepository,
    mailer: Arc<dyn Mailer>,
    totals: TotalsPolicy,
    working_hours: WorkingHours,
}

impl fmt::Debug for PgOrdersService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgOrdersService")
            .field("db", &self.db)
            .field("totals", &self.totals)
            .field("working_hours", &self.working_hours)
            .finish_non_exhaustive()
    }
}

impl PgOrdersService {
    #[must_use]
    pub fn new(
        db: Db,
        mailer: Arc<dyn Mailer>,
        totals: TotalsPolicy,
        working_hours: WorkingHours,
    ) -> Self {
        Self {
            db,
            orders: PgOrdersRepository::new(),
            items: PgOrderItemsRepository::new(),
            products: PgProductsRepository::new(),
            cart_items: PgCartItemsRepository::new(),
            mailer,
            totals,
            working_hours,
        }
    }

    async fn snapshot(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrder,
    ) -> Result<CartSnapshot, OrdersServiceError> {
        if order.items.is_empty() {
            let cart = self
                .cart_items
                .get_cart_items(tx, order.user_uuid)
                .await?;

            return Ok(CartSnapshot::from_cart_items(&cart)?);
        }

        let unpriced: Vec<ProductUuid> = order
            .items
            .iter()
            .filter(|item| item.price.is_none())
            .map(|item| item.product_uuid)
            .collect();

        let live_prices = if unpriced.is_empty() {
            FxHashMap::default()
        } else {
            self.products.get_live_prices(tx, &unpriced).await?
        };

        Ok(CartSnapshot::from_client_items(&order.items, &live_prices)?)
    }

    async fn attach_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &mut [OrderRecord],
    ) -> Result<(), OrdersServiceError> {
        if orders.is_empty() {
            return Ok(());
        }

        let uuids: Vec<OrderUuid> = orders.iter().map(|order| order.uuid).collect();

        let mut by_order: FxHashMap<OrderUuid, Vec<OrderItemRecord>> = FxHashMap::default();

        for row in self.items.get_order_items(tx, &uuids).await? {
            by_order.entry(row.order_uuid).or_default().push(row.item);
        }

        for order in orders.iter_mut() {
            order.items = by_order.remove(&order.uuid).unwrap_or_default();
        }

        Ok(())
    }

    async fn load_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut orders = [self.orders.get_order(tx, order).await?];

        self.attach_items(tx, &mut orders).await?;

        let [order] = orders;

        Ok(order)
    }

    async fn notify_delivered(&self, order: &OrderRecord) {
        if order.delivery_info.email.trim().is_empty() {
            return;
        }

        match self
            .mailer
            .send_email(templates::delivery_notification(order))
            .await
        {
            Ok(()) => info!(order_uuid = %order.uuid, "sent delivery notification"),
            Err(error) => warn!(
                order_uuid = %order.uuid,
                error = %error,
                "failed to send delivery notification"
            ),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.place_order",
        skip(self, order),
        fields(
            order_uuid = %order.uuid,
            user_uuid = %order.user_uuid,
            delivery_option = %order.delivery_option,
            source = tracing::field::Empty,
            line_count = tracing::field::Empty
        ),
        err
    )]
    async fn place_order(&self, order: NewOrder) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let snapshot = self.snapshot(&mut tx, &order).await?;

        let span = Span::current();

        span.record("source", tracing::field::debug(snapshot.source));
        span.record("line_count", snapshot.lines.len());

        let totals = self
            .totals
            .compute(snapshot.subtotal, order.delivery_option)?;

        if let Some(client_totals) = &order.client_totals {
            for mismatch in totals::reconcile(&totals, client_totals) {
                warn!(
                    field = mismatch.field,
                    client = mismatch.client,
                    server = mismatch.server,
                    "client totals differ from server totals"
                );
            }
        }

        let created = self.orders.create_order(&mut tx, &order, &totals).await?;

        self.items
            .create_order_items(&mut tx, created.uuid, &snapshot.lines)
            .await?;

        // Client-supplied lines leave the stored cart alone.
        let cleared = match snapshot.source {
            SnapshotSource::Cart => {
                self.cart_items
                    .clear_cart_items(&mut tx, order.user_uuid)
                    .await?
            }
            SnapshotSource::Client => 0,
        };

        let placed = self.load_order(&mut tx, created.uuid).await?;

        tx.commit().await?;

        info!(
            order_uuid = %placed.uuid,
            total = placed.totals.total,
            cleared_cart_lines = cleared,
            "placed order"
        );

        Ok(placed)
    }

    async fn list_orders(&self) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let mut orders = self.orders.list_orders(&mut tx).await?;

        self.attach_items(&mut tx, &mut orders).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn list_user_orders(
        &self,
        user: UserUuid,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let mut orders = self.orders.list_user_orders(&mut tx, user).await?;

        self.attach_items(&mut tx, &mut orders).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let order = self.load_order(&mut tx, order).await?;

        tx.commit().await?;

        Ok(order)
    }

    #[tracing::instrument(
        name = "orders.service.update_status",
        skip(self),
        fields(order_uuid = %order, status = %status),
        err
    )]
    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
        now: Timestamp,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let current = self.orders.get_order(&mut tx, order).await?;

        status::check_transition(status, &self.working_hours, now)?;

        self.orders.update_status(&mut tx, order, status).await?;

        let updated = self.load_order(&mut tx, order).await?;

        tx.commit().await?;

        info!(from = %current.status, to = %status, "updated order status");

        if status == OrderStatus::Delivered {
            self.notify_delivered(&updated).await;
        }

        Ok(updated)
    }

    #[tracing::instrument(
        name = "orders.service.update_order",
        skip(self, update),
        fields(order_uuid = %order, delivery_option = %update.delivery_option),
        err
    )]
    async fn update_order(
        &self,
        order: OrderUuid,
        update: OrderUpdate,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let current = self.orders.get_order(&mut tx, order).await?;

        let totals = self
            .totals
            .compute(current.totals.subtotal, update.delivery_option)?;

        self.orders
            .update_order(&mut tx, order, &update, &totals)
            .await?;

        let updated = self.load_order(&mut tx, order).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_order(&self, order: OrderUuid) -> Result<(), OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.orders.delete_order(&mut tx, order).await?;

        if rows_affected == 0 {
            return Err(OrdersServiceError::NotFound);
        }

        tx.commit().await?;

        info!(order_uuid = %order, "deleted order");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Place an order from the client's items, or the stored cart when none
    /// are given. The stored cart is emptied in the same transaction.
    async fn place_order(&self, order: NewOrder) -> Result<OrderRecord, OrdersServiceError>;

    /// All orders, newest first.
    async fn list_orders(&self) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// A user's orders, newest first.
    async fn list_user_orders(&self, user: UserUuid)
    -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Retrieve a single order with its items.
    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError>;

    /// Move an order to `status`, subject to the working hours guard.
    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
        now: Timestamp,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Edit delivery details. Shipping, tax and total follow the delivery option.
    async fn update_order(
        &self,
        order: OrderUuid,
        update: OrderUpdate,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Permanently remove an order and its items.
    async fn delete_order(&self, order: OrderUuid) -> Result<(), OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{
            carts::{CartsService, data::NewCartItem},
            orders::{
                data::{DeliveryInfo, DeliveryOption, NewOrderItem},
                totals::{ClientTotals, Totals},
            },
        },
        test::{TestContext, helpers::create_product},
    };

    use super::*;

    const OPEN: &str = "2026-03-02T10:00:00Z";
    const CLOSED: &str = "2026-03-02T21:30:00Z";

    fn new_order(user: UserUuid, items: Vec<NewOrderItem>) -> NewOrder {
        NewOrder {
            uuid: OrderUuid::new(),
            user_uuid: user,
            items,
            delivery_info: DeliveryInfo {
                name: "Asha".to_string(),
                email: "asha@example.com".to_string(),
                ..DeliveryInfo::default()
            },
            delivery_option: DeliveryOption::Standard,
            delivery_date: "2026-03-03".to_string(),
            delivery_time: "morning".to_string(),
            payment_method: "cod".to_string(),
            client_totals: None,
        }
    }

    async fn fill_cart(ctx: &TestContext, user: UserUuid) -> TestResult<(ProductUuid, ProductUuid)> {
        let a = create_product(ctx, "Alphonso Mango", "Fruits", 5_000).await?;
        let b = create_product(ctx, "Tiger Prawns", "Seafood", 3_000).await?;

        ctx.carts
            .add_item(
                user,
                NewCartItem {
                    product_uuid: a.uuid,
                    quantity: 2,
                },
            )
            .await?;

        ctx.carts
            .add_item(
                user,
                NewCartItem {
                    product_uuid: b.uuid,
                    quantity: 1,
                },
            )
            .await?;

        Ok((a.uuid, b.uuid))
    }

    #[tokio::test]
    async fn place_order_from_cart_computes_totals_and_empties_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        fill_cart(&ctx, user).await?;

        let order = ctx.orders.place_order(new_order(user, vec![])).await?;

        assert_eq!(
            order.totals,
            Totals {
                subtotal: 13_000,
                shipping: 0,
                tax: 1_300,
                total: 14_300,
            }
        );
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items.first().map(|i| i.price), Some(5_000));

        let cart = ctx.carts.get_cart(user).await?;

        assert!(cart.items.is_empty(), "cart should be empty after checkout");

        let orders = ctx.orders.list_user_orders(user).await?;

        assert_eq!(orders.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn place_order_with_empty_cart_writes_nothing() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let result = ctx.orders.place_order(new_order(user, vec![])).await;

        assert!(
            matches!(result, Err(OrdersServiceError::EmptyCart)),
            "expected EmptyCart, got {result:?}"
        );

        assert!(ctx.orders.list_orders().await?.is_empty());

        let item_rows: i64 = sqlx::query_scalar("SELECT count(*) FROM order_items")
            .fetch_one(ctx.db.pool())
            .await?;

        assert_eq!(item_rows, 0);

        Ok(())
    }

    #[tokio::test]
    async fn express_delivery_adds_shipping_fee() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        fill_cart(&ctx, user).await?;

        let mut order = new_order(user, vec![]);
        order.delivery_option = DeliveryOption::Express;

        let order = ctx.orders.place_order(order).await?;

        assert_eq!(order.totals.shipping, 12_900);
        assert_eq!(order.totals.total, 13_000 + 12_900 + 1_300);

        Ok(())
    }

    #[tokio::test]
    async fn client_items_use_given_prices_and_fill_missing_ones() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let a = create_product(&ctx, "Apples", "Fruits", 9_999).await?;
        let b = create_product(&ctx, "Cod", "Seafood", 3_000).await?;

        let order = ctx
            .orders
            .place_order(new_order(
                user,
                vec![
                    NewOrderItem {
                        product_uuid: a.uuid,
                        quantity: 2,
                        price: Some(5_000),
                    },
                    NewOrderItem {
                        product_uuid: b.uuid,
                        quantity: 1,
                        price: None,
                    },
                ],
            ))
            .await?;

        assert_eq!(order.totals.subtotal, 13_000);

        Ok(())
    }

    #[tokio::test]
    async fn client_items_leave_stored_cart_untouched() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        fill_cart(&ctx, user).await?;

        let other = create_product(&ctx, "Sourdough", "Bakery", 700).await?;

        let order = ctx
            .orders
            .place_order(new_order(
                user,
                vec![NewOrderItem {
                    product_uuid: other.uuid,
                    quantity: 3,
                    price: None,
                }],
            ))
            .await?;

        assert_eq!(order.totals.subtotal, 2_100);
        assert_eq!(order.items.len(), 1);

        let cart = ctx.carts.get_cart(user).await?;

        assert_eq!(cart.items.len(), 2, "stored cart should keep its lines");

        Ok(())
    }

    #[tokio::test]
    async fn client_totals_never_override_server_totals() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        fill_cart(&ctx, user).await?;

        let mut order = new_order(user, vec![]);
        order.client_totals = Some(ClientTotals {
            subtotal: Some(1),
            shipping: Some(0),
            tax: Some(0),
            total: Some(1),
        });

        let order = ctx.orders.place_order(order).await?;

        assert_eq!(order.totals.total, 14_300);

        Ok(())
    }

    #[tokio::test]
    async fn unpriced_unknown_product_returns_invalid_reference() {
        let ctx = TestContext::new().await;

        let result = ctx
            .orders
            .place_order(new_order(
                UserUuid::new(),
                vec![NewOrderItem {
                    product_uuid: ProductUuid::new(),
                    quantity: 1,
                    price: None,
                }],
            ))
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );
    }

    #[tokio::test]
    async fn missing_delivery_fields_default_to_empty_strings() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        fill_cart(&ctx, user).await?;

        let mut order = new_order(user, vec![]);
        order.delivery_info = DeliveryInfo::default();

        let order = ctx.orders.place_order(order).await?;
        let fetched = ctx.orders.get_order(order.uuid).await?;

        assert_eq!(fetched.delivery_info, DeliveryInfo::default());
        assert_eq!(fetched.items.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn delivered_outside_working_hours_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        fill_cart(&ctx, user).await?;

        let order = ctx.orders.place_order(new_order(user, vec![])).await?;

        let result = ctx
            .orders
            .update_status(order.uuid, OrderStatus::Delivered, CLOSED.parse()?)
            .await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::WorkingHoursViolation(OrderStatus::Delivered))
            ),
            "expected WorkingHoursViolation, got {result:?}"
        );

        let fetched = ctx.orders.get_order(order.uuid).await?;

        assert_eq!(fetched.status, OrderStatus::Pending);
        assert!(ctx.mailer.sent().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn delivered_inside_working_hours_sends_one_email() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        fill_cart(&ctx, user).await?;

        let order = ctx.orders.place_order(new_order(user, vec![])).await?;

        let updated = ctx
            .orders
            .update_status(order.uuid, OrderStatus::Delivered, OPEN.parse()?)
            .await?;

        assert_eq!(updated.status, OrderStatus::Delivered);

        let sent = ctx.mailer.sent();

        assert_eq!(sent.len(), 1);
        assert_eq!(sent.first().map(|m| m.to.as_str()), Some("asha@example.com"));

        Ok(())
    }

    #[tokio::test]
    async fn failed_delivery_email_keeps_status_change() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        fill_cart(&ctx, user).await?;

        let order = ctx.orders.place_order(new_order(user, vec![])).await?;

        ctx.mailer.fail_sends(true);

        let updated = ctx
            .orders
            .update_status(order.uuid, OrderStatus::Delivered, OPEN.parse()?)
            .await?;

        assert_eq!(updated.status, OrderStatus::Delivered);

        Ok(())
    }

    #[tokio::test]
    async fn other_statuses_are_allowed_any_time() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        fill_cart(&ctx, user).await?;

        let order = ctx.orders.place_order(new_order(user, vec![])).await?;

        let updated = ctx
            .orders
            .update_status(order.uuid, OrderStatus::Cancelled, CLOSED.parse()?)
            .await?;

        assert_eq!(updated.status, OrderStatus::Cancelled);
        assert!(ctx.mailer.sent().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn update_status_of_unknown_order_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let result = ctx
            .orders
            .update_status(OrderUuid::new(), OrderStatus::Confirmed, OPEN.parse()?)
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_order_recomputes_shipping() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        fill_cart(&ctx, user).await?;

        let order = ctx.orders.place_order(new_order(user, vec![])).await?;

        let updated = ctx
            .orders
            .update_order(
                order.uuid,
                OrderUpdate {
                    delivery_info: DeliveryInfo {
                        name: "Asha R".to_string(),
                        ..order.delivery_info.clone()
                    },
                    delivery_option: DeliveryOption::Express,
                    delivery_date: order.delivery_date.clone(),
                    delivery_time: "evening".to_string(),
                    payment_method: order.payment_method.clone(),
                },
            )
            .await?;

        assert_eq!(updated.delivery_info.name, "Asha R");
        assert_eq!(updated.delivery_time, "evening");
        assert_eq!(updated.totals.subtotal, 13_000);
        assert_eq!(updated.totals.shipping, 12_900);
        assert_eq!(updated.items, order.items);

        Ok(())
    }

    #[tokio::test]
    async fn delete_then_get_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        fill_cart(&ctx, user).await?;

        let order = ctx.orders.place_order(new_order(user, vec![])).await?;

        ctx.orders.delete_order(order.uuid).await?;

        let result = ctx.orders.get_order(order.uuid).await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        let result = ctx.orders.delete_order(order.uuid).await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound on second delete, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn user_orders_are_newest_first() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let other = UserUuid::new();
        let apples = create_product(&ctx, "Apples", "Fruits", 100).await?;

        let line = || NewOrderItem {
            product_uuid: apples.uuid,
            quantity: 1,
            price: None,
        };

        let first = ctx.orders.place_order(new_order(user, vec![line()])).await?;
        let second = ctx.orders.place_order(new_order(user, vec![line()])).await?;
        ctx.orders.place_order(new_order(other, vec![line()])).await?;

        let orders = ctx.orders.list_user_orders(user).await?;

        let uuids: Vec<OrderUuid> = orders.iter().map(|o| o.uuid).collect();

        assert_eq!(uuids, vec![second.uuid, first.uuid]);
        assert_eq!(ctx.orders.list_orders().await?.len(), 3);

        Ok(())
    }
}
