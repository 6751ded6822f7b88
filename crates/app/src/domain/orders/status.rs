//! Order Status
//!
//! Any status may follow any other, except that an order can only be
//! marked delivered while the store is open.

use std::{fmt, str::FromStr};

use jiff::{Timestamp, civil::Weekday, tz::TimeZone};
use thiserror::Error;

/// Order Status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Processing,
    Ready,
    OutForDelivery,
    Delivered,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    pub const ALL: [Self; 8] = [
        Self::Pending,
        Self::Confirmed,
        Self::Processing,
        Self::Ready,
        Self::OutForDelivery,
        Self::Delivered,
        Self::Cancelled,
        Self::Refunded,
    ];

    #[must_use]
    pub const fn to_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Ready => "ready",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown order status: {0}")]
pub struct UnknownOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.to_str() == s)
            .ok_or_else(|| UnknownOrderStatus(s.to_string()))
    }
}

/// Opening hours used to gate deliveries.
///
/// The window is `[opens_at, closes_at)` in whole hours of `time_zone`.
#[derive(Debug, Clone)]
pub struct WorkingHours {
    pub opens_at: i8,
    pub closes_at: i8,
    pub days: Vec<Weekday>,
    pub time_zone: TimeZone,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            opens_at: 8,
            closes_at: 18,
            days: vec![
                Weekday::Monday,
                Weekday::Tuesday,
                Weekday::Wednesday,
                Weekday::Thursday,
                Weekday::Friday,
                Weekday::Saturday,
            ],
            time_zone: TimeZone::UTC,
        }
    }
}

impl WorkingHours {
    /// Whether `now` falls inside opening hours.
    #[must_use]
    pub fn permits(&self, now: Timestamp) -> bool {
        let local = now.to_zoned(self.time_zone.clone());

        self.days.contains(&local.weekday())
            && (self.opens_at..self.closes_at).contains(&local.hour())
    }
}

/// The requested status change is not allowed right now.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("orders can only be marked {to} during working hours")]
pub struct TransitionRejected {
    pub to: OrderStatus,
}

/// Check a status change against the working hours guard.
///
/// # Errors
///
/// Returns [`TransitionRejected`] when moving into `delivered` outside
/// working hours.
pub fn check_transition(
    next: OrderStatus,
    hours: &WorkingHours,
    now: Timestamp,
) -> Result<(), TransitionRejected> {
    match next {
        OrderStatus::Delivered if !hours.permits(now) => Err(TransitionRejected { to: next }),
        OrderStatus::Pending
        | OrderStatus::Confirmed
        | OrderStatus::Processing
        | OrderStatus::Ready
        | OrderStatus::OutForDelivery
        | OrderStatus::Delivered
        | OrderStatus::Cancelled
        | OrderStatus::Refunded => Ok(()),
    }
}
