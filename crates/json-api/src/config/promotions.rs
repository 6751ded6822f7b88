//! Promotions Config

use clap::Args;

use freshmart_app::domain::promotions::{PromotionsPolicy, rewards::DEFAULT_WELCOME_EVENT_NAME};

/// Promotion campaign settings.
#[derive(Debug, Args)]
pub struct PromotionsConfig {
    /// Promo event that first-order welcome codes are issued from
    #[arg(long, env = "WELCOME_EVENT_NAME", default_value = DEFAULT_WELCOME_EVENT_NAME)]
    pub welcome_event_name: String,
}

impl PromotionsConfig {
    pub(super) fn policy(&self) -> PromotionsPolicy {
        PromotionsPolicy {
            welcome_event_name: self.welcome_event_name.trim().to_string(),
        }
    }
}
