//! Promotions

pub mod codes;
pub mod data;
pub mod eligibility;
pub mod errors;
pub mod records;
mod repositories;
pub mod rewards;
pub mod service;

pub use errors::{CodeRejection, PromotionsServiceError};
pub use rewards::{
    MockRewardsService, PgRewardsService, PromotionsPolicy, RewardsOutcome, RewardsService,
};
pub use service::*;
