//! Order Items Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::{try_get_amount, try_get_count, try_i32_from_u32, try_i64_from_u64},
    domain::{
        orders::{
            records::{OrderItemRecord, OrderUuid},
            snapshot::SnapshotLine,
        },
        products::records::ProductUuid,
    },
};

const CREATE_ORDER_ITEM_SQL: &str = include_str!("../sql/create_order_item.sql");
const GET_ORDER_ITEMS_SQL: &str = include_str!("../sql/get_order_items.sql");
const GET_ORDER_CATEGORIES_SQL: &str = include_str!("../sql/get_order_categories.sql");

/// Order item tagged with the order it belongs to.
#[derive(Debug, Clone)]
pub(crate) struct OrderItemRow {
    pub order_uuid: OrderUuid,
    pub item: OrderItemRecord,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderItemsRepository;

impl PgOrderItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        lines: &[SnapshotLine],
    ) -> Result<(), sqlx::Error> {
        for (position, line) in lines.iter().enumerate() {
            let position = i32::try_from(position).map_err(|e| sqlx::Error::ColumnDecode {
                index: "position".to_string(),
                source: Box::new(e),
            })?;

            query(CREATE_ORDER_ITEM_SQL)
                .bind(order.into_uuid())
                .bind(position)
                .bind(line.product_uuid.into_uuid())
                .bind(try_i32_from_u32(line.quantity, "quantity")?)
                .bind(try_i64_from_u64(line.price, "price")?)
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }

    /// Items for each of `orders`, in line order.
    pub(crate) async fn get_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[OrderUuid],
    ) -> Result<Vec<OrderItemRow>, sqlx::Error> {
        let uuids: Vec<Uuid> = orders.iter().copied().map(OrderUuid::into_uuid).collect();

        query_as::<Postgres, OrderItemRow>(GET_ORDER_ITEMS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }

    /// Distinct, lower-cased product categories present in an order.
    pub(crate) async fn get_order_categories(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<String>, sqlx::Error> {
        query_scalar::<Postgres, String>(GET_ORDER_CATEGORIES_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItemRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            item: OrderItemRecord {
                position: try_get_count(row, "position")?,
                product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
                name: row.try_get("name")?,
                category: row.try_get("category")?,
                quantity: try_get_count(row, "quantity")?,
                price: try_get_amount(row, "price")?,
            },
        })
    }
}
