//! Promo Handlers

pub(crate) mod redeem;
pub(crate) mod subscribe;
pub(crate) mod validate;
