//! Promotions Repositories

mod codes;
mod events;
mod grants;
mod subscribers;

pub(crate) use codes::PgPromoCodesRepository;
pub(crate) use events::PgPromoEventsRepository;
pub(crate) use grants::PgWelcomeGrantsRepository;
pub(crate) use subscribers::{PgPromoSubscribersRepository, SubscriberUpsert};

use sqlx::{Row, postgres::PgRow};

use crate::{database::try_get_amount, domain::promotions::data::discounts::PromoDiscount};

const COLUMN_DISCOUNT_KIND: &str = "discount_kind";
const COLUMN_DISCOUNT_AMOUNT: &str = "discount_amount";

/// Decode the `discount_kind` / `discount_amount` column pair.
fn try_get_discount(row: &PgRow) -> Result<PromoDiscount, sqlx::Error> {
    let kind: String = row.try_get(COLUMN_DISCOUNT_KIND)?;
    let amount = try_get_amount(row, COLUMN_DISCOUNT_AMOUNT)?;

    PromoDiscount::from_parts(&kind, amount).ok_or_else(|| sqlx::Error::ColumnDecode {
        index: COLUMN_DISCOUNT_KIND.to_string(),
        source: format!("unsupported discount {kind}:{amount}").into(),
    })
}
