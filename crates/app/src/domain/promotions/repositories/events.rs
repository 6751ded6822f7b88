//! Promo Events Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{
    FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, types::Json,
};

use crate::{
    database::{try_get_amount, try_get_count, try_i32_from_u32, try_i64_from_u64},
    domain::promotions::{
        data::{NewPromoEvent, PromoEventUpdate, criteria::PromoCriteria},
        records::{PromoEventRecord, PromoEventUuid},
    },
};

use super::try_get_discount;

const CREATE_EVENT_SQL: &str = include_str!("../sql/create_event.sql");
const LIST_EVENTS_SQL: &str = include_str!("../sql/list_events.sql");
const LIST_ACTIVE_EVENTS_SQL: &str = include_str!("../sql/list_active_events.sql");
const GET_EVENT_SQL: &str = include_str!("../sql/get_event.sql");
const FIND_ACTIVE_EVENT_BY_NAME_SQL: &str = include_str!("../sql/find_active_event_by_name.sql");
const FIND_OPEN_CAMPAIGN_EVENT_SQL: &str = include_str!("../sql/find_open_campaign_event.sql");
const UPDATE_EVENT_SQL: &str = include_str!("../sql/update_event.sql");
const DELETE_EVENT_SQL: &str = include_str!("../sql/delete_event.sql");

/// Bindable column values shared by insert and update.
struct EventValues {
    name: String,
    description: String,
    trigger: String,
    discount_kind: &'static str,
    discount_amount: i64,
    duration_days: i32,
    min_order_amount: i64,
    is_active: bool,
    criteria: Option<Json<PromoCriteria>>,
}

impl TryFrom<PromoEventUpdate> for EventValues {
    type Error = sqlx::Error;

    fn try_from(event: PromoEventUpdate) -> Result<Self, Self::Error> {
        Ok(Self {
            discount_kind: event.discount.to_str(),
            discount_amount: try_i64_from_u64(event.discount.amount(), "discount_amount")?,
            duration_days: try_i32_from_u32(event.duration_days, "duration_days")?,
            min_order_amount: try_i64_from_u64(event.min_order_amount, "min_order_amount")?,
            criteria: event.criteria.map(|criteria| Json(criteria.normalized())),
            name: event.name,
            description: event.description,
            trigger: event.trigger,
            is_active: event.is_active,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPromoEventsRepository;

impl PgPromoEventsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_event(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event: NewPromoEvent,
    ) -> Result<PromoEventRecord, sqlx::Error> {
        let uuid = event.uuid;

        let values = EventValues::try_from(PromoEventUpdate {
            name: event.name,
            description: event.description,
            trigger: event.trigger,
            discount: event.discount,
            duration_days: event.duration_days,
            min_order_amount: event.min_order_amount,
            is_active: event.is_active,
            criteria: event.criteria,
        })?;

        query_as::<Postgres, PromoEventRecord>(CREATE_EVENT_SQL)
            .bind(uuid.into_uuid())
            .bind(values.name)
            .bind(values.description)
            .bind(values.trigger)
            .bind(values.discount_kind)
            .bind(values.discount_amount)
            .bind(values.duration_days)
            .bind(values.min_order_amount)
            .bind(values.is_active)
            .bind(values.criteria)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_events(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<PromoEventRecord>, sqlx::Error> {
        query_as::<Postgres, PromoEventRecord>(LIST_EVENTS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_active_events(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<PromoEventRecord>, sqlx::Error> {
        query_as::<Postgres, PromoEventRecord>(LIST_ACTIVE_EVENTS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_event(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event: PromoEventUuid,
    ) -> Result<PromoEventRecord, sqlx::Error> {
        query_as::<Postgres, PromoEventRecord>(GET_EVENT_SQL)
            .bind(event.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_active_event_by_name(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
    ) -> Result<Option<PromoEventRecord>, sqlx::Error> {
        query_as::<Postgres, PromoEventRecord>(FIND_ACTIVE_EVENT_BY_NAME_SQL)
            .bind(name)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Earliest active event that is not tied to order criteria.
    pub(crate) async fn find_open_campaign_event(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Option<PromoEventRecord>, sqlx::Error> {
        query_as::<Postgres, PromoEventRecord>(FIND_OPEN_CAMPAIGN_EVENT_SQL)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn update_event(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event: PromoEventUuid,
        update: PromoEventUpdate,
    ) -> Result<PromoEventRecord, sqlx::Error> {
        let values = EventValues::try_from(update)?;

        query_as::<Postgres, PromoEventRecord>(UPDATE_EVENT_SQL)
            .bind(event.into_uuid())
            .bind(values.name)
            .bind(values.description)
            .bind(values.trigger)
            .bind(values.discount_kind)
            .bind(values.discount_amount)
            .bind(values.duration_days)
            .bind(values.min_order_amount)
            .bind(values.is_active)
            .bind(values.criteria)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_event(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event: PromoEventUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_EVENT_SQL)
            .bind(event.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for PromoEventRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: PromoEventUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            trigger: row.try_get("trigger")?,
            discount: try_get_discount(row)?,
            duration_days: try_get_count(row, "duration_days")?,
            min_order_amount: try_get_amount(row, "min_order_amount")?,
            is_active: row.try_get("is_active")?,
            criteria: row
                .try_get::<Option<Json<PromoCriteria>>, _>("criteria")?
                .map(|criteria| criteria.0),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
