//! Orders

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repositories;
pub mod service;
pub mod snapshot;
pub mod status;
pub mod totals;

pub use errors::OrdersServiceError;
pub use service::*;
