//! Customer Promo Endpoints

mod handlers;

pub(crate) use handlers::*;
