//! FreshMart order placement, promotions and persistence.

pub mod config;
pub mod context;
pub mod database;
pub mod domain;
pub mod notifications;

#[cfg(test)]
mod test;

mod uuids;
