//! Promo code generation and issuance.

use jiff::{SignedDuration, Timestamp};
use rand::{Rng, seq::SliceRandom};
use sqlx::{Postgres, Transaction};
use tracing::debug;

use crate::domain::promotions::{
    PromotionsServiceError,
    data::NewPromoCode,
    records::{PromoCodeRecord, PromoCodeUuid, PromoEventRecord},
    repositories::PgPromoCodesRepository,
};

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of generated codes.
pub const CODE_LENGTH: usize = 6;

/// Attempts before giving up on finding an unused code.
const MAX_CODE_ATTEMPTS: usize = 8;

/// Draw a random code from `rng`.
pub fn generate_code_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..CODE_LENGTH)
        .filter_map(|_| CODE_ALPHABET.choose(rng))
        .map(|&byte| char::from(byte))
        .collect()
}

/// Draw a random code from the thread-local generator.
pub fn generate_code() -> String {
    generate_code_with(&mut rand::thread_rng())
}

/// Canonical form used for storage and lookups.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// `[now, now + duration_days]`.
///
/// # Errors
///
/// Returns an error when the window end is out of range.
pub fn validity_window(
    now: Timestamp,
    duration_days: u32,
) -> Result<(Timestamp, Timestamp), jiff::Error> {
    let until = now.checked_add(SignedDuration::from_hours(i64::from(duration_days) * 24))?;

    Ok((now, until))
}

/// Issue a single-use code for `event`, addressed to `recipient_email`.
///
/// Retries with a fresh code when the drawn one is already taken.
pub(crate) async fn issue_event_code(
    repository: &PgPromoCodesRepository,
    tx: &mut Transaction<'_, Postgres>,
    event: &PromoEventRecord,
    recipient_email: &str,
    now: Timestamp,
) -> Result<PromoCodeRecord, PromotionsServiceError> {
    let (valid_from, valid_until) = validity_window(now, event.duration_days)
        .map_err(|_error| PromotionsServiceError::InvalidData)?;

    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let code = NewPromoCode {
            uuid: PromoCodeUuid::new(),
            code: generate_code(),
            promo_event_uuid: Some(event.uuid),
            event_name: event.name.clone(),
            recipient_email: recipient_email.to_string(),
            discount: event.discount,
            min_order_amount: event.min_order_amount,
            max_uses: Some(1),
            valid_from,
            valid_until,
        };

        if let Some(created) = repository.create_code(tx, &code).await? {
            return Ok(created);
        }

        debug!(attempt, event_name = %event.name, "promo code collision, drawing again");
    }

    Err(PromotionsServiceError::AlreadyExists)
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn generated_codes_are_six_uppercase_alphanumerics() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let code = generate_code_with(&mut rng);

            assert_eq!(code.len(), CODE_LENGTH);
            assert!(
                code.bytes().all(|b| CODE_ALPHABET.contains(&b)),
                "unexpected character in {code}"
            );
        }
    }

    #[test]
    fn normalize_code_trims_and_uppercases() {
        assert_eq!(normalize_code("  ab12cd "), "AB12CD");
    }

    #[test]
    fn validity_window_spans_duration_days() -> TestResult {
        let now: Timestamp = "2026-03-02T10:00:00Z".parse()?;

        let (from, until) = validity_window(now, 7)?;

        assert_eq!(from, now);
        assert_eq!(until, "2026-03-09T10:00:00Z".parse::<Timestamp>()?);

        Ok(())
    }
}
