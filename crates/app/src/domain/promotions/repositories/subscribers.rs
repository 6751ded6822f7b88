//! Promo Subscribers Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::promotions::records::PromoSubscriberRecord;

const UPSERT_SUBSCRIBER_SQL: &str = include_str!("../sql/upsert_subscriber.sql");

/// Subscriber row plus whether the upsert inserted it.
#[derive(Debug, Clone)]
pub(crate) struct SubscriberUpsert {
    pub subscriber: PromoSubscriberRecord,
    pub inserted: bool,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPromoSubscribersRepository;

impl PgPromoSubscribersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn upsert_subscriber(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
    ) -> Result<SubscriberUpsert, sqlx::Error> {
        query_as::<Postgres, SubscriberUpsert>(UPSERT_SUBSCRIBER_SQL)
            .bind(email)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for SubscriberUpsert {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            subscriber: PromoSubscriberRecord {
                email: row.try_get("email")?,
                subscribed_at: row.try_get::<SqlxTimestamp, _>("subscribed_at")?.to_jiff(),
                updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            },
            inserted: row.try_get("inserted")?,
        })
    }
}
