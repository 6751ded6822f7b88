//! Promotions service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::pricing::PricingError;

/// Why a promo code cannot be applied.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CodeRejection {
    #[error("promo code is no longer active")]
    Inactive,

    #[error("promo code is not valid yet")]
    NotYetValid,

    #[error("promo code has expired")]
    Expired,

    #[error("order amount is below the minimum of {minimum}")]
    BelowMinimum { minimum: u64 },

    #[error("promo code has already been used")]
    Exhausted,
}

#[derive(Debug, Error)]
pub enum PromotionsServiceError {
    #[error("promo event already exists")]
    AlreadyExists,

    #[error("not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("invalid email address")]
    InvalidEmail,

    #[error(transparent)]
    Rejected(#[from] CodeRejection),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for PromotionsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        if matches!(error, Error::ColumnDecode { .. }) {
            return Self::InvalidData;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}

impl From<PricingError> for PromotionsServiceError {
    fn from(_error: PricingError) -> Self {
        Self::InvalidData
    }
}
