//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    database::{try_get_amount, try_i64_from_u64},
    domain::{
        orders::{
            data::{DeliveryInfo, DeliveryOption, NewOrder, OrderUpdate},
            records::{OrderRecord, OrderUuid},
            status::OrderStatus,
            totals::Totals,
        },
        users::UserUuid,
    },
};

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const LIST_ORDERS_SQL: &str = include_str!("../sql/list_orders.sql");
const LIST_USER_ORDERS_SQL: &str = include_str!("../sql/list_user_orders.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("../sql/update_order_status.sql");
const UPDATE_ORDER_SQL: &str = include_str!("../sql/update_order.sql");
const DELETE_ORDER_SQL: &str = include_str!("../sql/delete_order.sql");
const COUNT_EARLIER_USER_ORDERS_SQL: &str =
    include_str!("../sql/count_earlier_user_orders.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrder,
        totals: &Totals,
    ) -> Result<OrderRecord, sqlx::Error> {
        let info = &order.delivery_info;

        query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.user_uuid.into_uuid())
            .bind(&info.name)
            .bind(&info.email)
            .bind(&info.phone)
            .bind(&info.address)
            .bind(&info.city)
            .bind(&info.state)
            .bind(&info.zip)
            .bind(&info.notes)
            .bind(order.delivery_option.to_str())
            .bind(&order.delivery_date)
            .bind(&order.delivery_time)
            .bind(&order.payment_method)
            .bind(try_i64_from_u64(totals.subtotal, "subtotal")?)
            .bind(try_i64_from_u64(totals.shipping, "shipping")?)
            .bind(try_i64_from_u64(totals.tax, "tax")?)
            .bind(try_i64_from_u64(totals.total, "total")?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_user_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_USER_ORDERS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(UPDATE_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.to_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        update: &OrderUpdate,
        totals: &Totals,
    ) -> Result<OrderRecord, sqlx::Error> {
        let info = &update.delivery_info;

        query_as::<Postgres, OrderRecord>(UPDATE_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(&info.name)
            .bind(&info.email)
            .bind(&info.phone)
            .bind(&info.address)
            .bind(&info.city)
            .bind(&info.state)
            .bind(&info.zip)
            .bind(&info.notes)
            .bind(update.delivery_option.to_str())
            .bind(&update.delivery_date)
            .bind(&update.delivery_time)
            .bind(&update.payment_method)
            .bind(try_i64_from_u64(totals.shipping, "shipping")?)
            .bind(try_i64_from_u64(totals.tax, "tax")?)
            .bind(try_i64_from_u64(totals.total, "total")?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ORDER_SQL)
            .bind(order.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Orders the same user placed before `order`, or `None` if `order`
    /// no longer exists.
    pub(crate) async fn count_earlier_user_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Option<u64>, sqlx::Error> {
        let count: Option<i64> = query_scalar(COUNT_EARLIER_USER_ORDERS_SQL)
            .bind(order.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        count
            .map(|count| u64::try_from(count).map_err(|e| decode_error("count", e)))
            .transpose()
    }
}

fn decode_error<E>(column: &str, error: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(error),
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let delivery_option = row
            .try_get::<String, _>("delivery_option")?
            .parse::<DeliveryOption>()
            .map_err(|e| decode_error("delivery_option", e))?;

        let status = row
            .try_get::<String, _>("status")?
            .parse::<OrderStatus>()
            .map_err(|e| decode_error("status", e))?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            items: Vec::new(),
            delivery_info: DeliveryInfo {
                name: row.try_get("delivery_name")?,
                email: row.try_get("delivery_email")?,
                phone: row.try_get("delivery_phone")?,
                address: row.try_get("delivery_address")?,
                city: row.try_get("delivery_city")?,
                state: row.try_get("delivery_state")?,
                zip: row.try_get("delivery_zip")?,
                notes: row.try_get("delivery_notes")?,
            },
            delivery_option,
            delivery_date: row.try_get("delivery_date")?,
            delivery_time: row.try_get("delivery_time")?,
            payment_method: row.try_get("payment_method")?,
            totals: Totals {
                subtotal: try_get_amount(row, "subtotal")?,
                shipping: try_get_amount(row, "shipping")?,
                tax: try_get_amount(row, "tax")?,
                total: try_get_amount(row, "total")?,
            },
            status,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
