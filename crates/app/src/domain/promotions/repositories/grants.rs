//! Welcome Grants Repository

use sqlx::{Postgres, Transaction, query};

use crate::domain::{promotions::records::PromoCodeUuid, users::UserUuid};

const CREATE_WELCOME_GRANT_SQL: &str = include_str!("../sql/create_welcome_grant.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgWelcomeGrantsRepository;

impl PgWelcomeGrantsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Record that `user` received `code`. Returns `false` when the user was
    /// already granted a welcome code.
    pub(crate) async fn create_grant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        code: PromoCodeUuid,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(CREATE_WELCOME_GRANT_SQL)
            .bind(user.into_uuid())
            .bind(code.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected == 1)
    }
}
