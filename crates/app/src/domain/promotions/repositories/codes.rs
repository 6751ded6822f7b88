//! Promo Codes Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::{
    database::{try_get_amount, try_get_count, try_i32_from_u32, try_i64_from_u64},
    domain::promotions::{
        data::NewPromoCode,
        records::{PromoCodeRecord, PromoCodeUuid, PromoEventUuid},
    },
};

use super::try_get_discount;

const CREATE_CODE_SQL: &str = include_str!("../sql/create_code.sql");
const GET_CODE_SQL: &str = include_str!("../sql/get_code.sql");
const LOCK_CODE_SQL: &str = include_str!("../sql/lock_code.sql");
const RECORD_CODE_USE_SQL: &str = include_str!("../sql/record_code_use.sql");
const LIST_EVENT_CODES_SQL: &str = include_str!("../sql/list_event_codes.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPromoCodesRepository;

impl PgPromoCodesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert a code. Returns `None` when the code string is already taken.
    pub(crate) async fn create_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &NewPromoCode,
    ) -> Result<Option<PromoCodeRecord>, sqlx::Error> {
        let discount_amount = try_i64_from_u64(code.discount.amount(), "discount_amount")?;
        let min_order_amount = try_i64_from_u64(code.min_order_amount, "min_order_amount")?;

        let max_uses = code
            .max_uses
            .map(|max| try_i32_from_u32(max, "max_uses"))
            .transpose()?;

        query_as::<Postgres, PromoCodeRecord>(CREATE_CODE_SQL)
            .bind(code.uuid.into_uuid())
            .bind(&code.code)
            .bind(code.promo_event_uuid.map(PromoEventUuid::into_uuid))
            .bind(&code.event_name)
            .bind(&code.recipient_email)
            .bind(code.discount.to_str())
            .bind(discount_amount)
            .bind(min_order_amount)
            .bind(max_uses)
            .bind(SqlxTimestamp::from(code.valid_from))
            .bind(SqlxTimestamp::from(code.valid_until))
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn get_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<PromoCodeRecord, sqlx::Error> {
        query_as::<Postgres, PromoCodeRecord>(GET_CODE_SQL)
            .bind(code)
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch a code and hold its row lock until the transaction ends.
    pub(crate) async fn lock_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<PromoCodeRecord, sqlx::Error> {
        query_as::<Postgres, PromoCodeRecord>(LOCK_CODE_SQL)
            .bind(code)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn record_code_use(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: PromoCodeUuid,
    ) -> Result<PromoCodeRecord, sqlx::Error> {
        query_as::<Postgres, PromoCodeRecord>(RECORD_CODE_USE_SQL)
            .bind(code.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_event_codes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event: PromoEventUuid,
    ) -> Result<Vec<PromoCodeRecord>, sqlx::Error> {
        query_as::<Postgres, PromoCodeRecord>(LIST_EVENT_CODES_SQL)
            .bind(event.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for PromoCodeRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let max_uses = row
            .try_get::<Option<i32>, _>("max_uses")?
            .map(u32::try_from)
            .transpose()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "max_uses".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: PromoCodeUuid::from_uuid(row.try_get("uuid")?),
            code: row.try_get("code")?,
            promo_event_uuid: row
                .try_get::<Option<Uuid>, _>("promo_event_uuid")?
                .map(PromoEventUuid::from_uuid),
            event_name: row.try_get("event_name")?,
            recipient_email: row.try_get("recipient_email")?,
            discount: try_get_discount(row)?,
            min_order_amount: try_get_amount(row, "min_order_amount")?,
            max_uses,
            used_count: try_get_count(row, "used_count")?,
            valid_from: row.try_get::<SqlxTimestamp, _>("valid_from")?.to_jiff(),
            valid_until: row.try_get::<SqlxTimestamp, _>("valid_until")?.to_jiff(),
            is_active: row.try_get("is_active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
