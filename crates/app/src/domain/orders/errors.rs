//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::{
    orders::{
        snapshot::SnapshotError,
        status::{OrderStatus, TransitionRejected},
    },
    pricing::PricingError,
};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("quantity must be greater than zero")]
    InvalidQuantity,

    #[error("orders can only be marked {0} during working hours")]
    WorkingHoursViolation(OrderStatus),

    #[error("order already exists")]
    AlreadyExists,

    #[error("order not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
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

impl From<SnapshotError> for OrdersServiceError {
    fn from(error: SnapshotError) -> Self {
        match error {
            SnapshotError::Empty => Self::EmptyCart,
            SnapshotError::ZeroQuantity => Self::InvalidQuantity,
            SnapshotError::UnknownProduct(_) => Self::InvalidReference,
            SnapshotError::Pricing(_) => Self::InvalidData,
        }
    }
}

impl From<PricingError> for OrdersServiceError {
    fn from(_error: PricingError) -> Self {
        Self::InvalidData
    }
}

impl From<TransitionRejected> for OrdersServiceError {
    fn from(error: TransitionRejected) -> Self {
        Self::WorkingHoursViolation(error.to)
    }
}
