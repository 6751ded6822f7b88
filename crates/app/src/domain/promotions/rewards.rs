//! Order Rewards
//!
//! Codes granted after an order is placed: a one-off welcome code on a
//! customer's first order, and one code per promo event whose criteria the
//! order satisfies. Rewards are best effort and never fail the order.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{debug, info, warn};

use crate::{
    database::Db,
    domain::{
        orders::{
            records::OrderRecord,
            repositories::{PgOrderItemsRepository, PgOrdersRepository},
        },
        promotions::{
            PromotionsServiceError, codes, eligibility,
            records::{PromoCodeRecord, PromoEventRecord},
            repositories::{
                PgPromoCodesRepository, PgPromoEventsRepository, PgWelcomeGrantsRepository,
            },
        },
    },
    notifications::{EmailMessage, Mailer, templates},
};

/// Name of the promo event welcome codes are issued from, unless configured.
pub const DEFAULT_WELCOME_EVENT_NAME: &str = "WELCOME";

/// Store promotions policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionsPolicy {
    pub welcome_event_name: String,
}

impl Default for PromotionsPolicy {
    fn default() -> Self {
        Self {
            welcome_event_name: DEFAULT_WELCOME_EVENT_NAME.to_string(),
        }
    }
}

/// Codes granted for an order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewardsOutcome {
    pub welcome_code: Option<PromoCodeRecord>,
    pub event_codes: Vec<PromoCodeRecord>,
}

#[derive(Clone)]
pub struct PgRewardsService {
    db: Db,
    orders: PgOrdersRepository,
    order_items: PgOrderItemsRepository,
    events: PgPromoEventsRepository,
    codes: PgPromoCodesRepository,
    grants: PgWelcomeGrantsRepository,
    mailer: Arc<dyn Mailer>,
    policy: PromotionsPolicy,
}

impl fmt::Debug for PgRewardsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgRewardsService")
            .field("db", &self.db)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl PgRewardsService {
    #[must_use]
    pub fn new(db: Db, mailer: Arc<dyn Mailer>, policy: PromotionsPolicy) -> Self {
        Self {
            db,
            orders: PgOrdersRepository::new(),
            order_items: PgOrderItemsRepository::new(),
            events: PgPromoEventsRepository::new(),
            codes: PgPromoCodesRepository::new(),
            grants: PgWelcomeGrantsRepository::new(),
            mailer,
            policy,
        }
    }

    async fn grant_welcome_code(
        &self,
        order: &OrderRecord,
        now: Timestamp,
    ) -> Result<Option<PromoCodeRecord>, PromotionsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let earlier_orders = self
            .orders
            .count_earlier_user_orders(&mut tx, order.uuid)
            .await?;

        match earlier_orders {
            Some(0) => {}
            Some(earlier_orders) => {
                debug!(earlier_orders, "not a first order, no welcome code");
                return Ok(None);
            }
            None => {
                debug!(order_uuid = %order.uuid, "order no longer exists, no welcome code");
                return Ok(None);
            }
        }

        let Some(event) = self
            .events
            .find_active_event_by_name(&mut tx, &self.policy.welcome_event_name)
            .await?
        else {
            debug!(
                event_name = %self.policy.welcome_event_name,
                "no active welcome event"
            );
            return Ok(None);
        };

        let code = codes::issue_event_code(
            &self.codes,
            &mut tx,
            &event,
            order.delivery_info.email.trim(),
            now,
        )
        .await?;

        if !self
            .grants
            .create_grant(&mut tx, order.user_uuid, code.uuid)
            .await?
        {
            tx.rollback().await?;

            debug!("user already received a welcome code");

            return Ok(None);
        }

        tx.commit().await?;

        info!(code_uuid = %code.uuid, "issued welcome code");

        Ok(Some(code))
    }

    async fn matching_events(
        &self,
        order: &OrderRecord,
    ) -> Result<Vec<PromoEventRecord>, PromotionsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let categories = self
            .order_items
            .get_order_categories(&mut tx, order.uuid)
            .await?;

        let events = self.events.list_active_events(&mut tx).await?;

        tx.commit().await?;

        let categories = eligibility::order_categories(categories);

        Ok(eligibility::matching_events(&events, &categories)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn issue_event_code(
        &self,
        event: &PromoEventRecord,
        recipient_email: &str,
        now: Timestamp,
    ) -> Result<PromoCodeRecord, PromotionsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let code = codes::issue_event_code(&self.codes, &mut tx, event, recipient_email, now).await?;

        tx.commit().await?;

        Ok(code)
    }

    async fn grant_event_codes(&self, order: &OrderRecord, now: Timestamp) -> Vec<PromoCodeRecord> {
        let events = match self.matching_events(order).await {
            Ok(events) => events,
            Err(error) => {
                warn!(error = %error, "failed to evaluate promo events");
                return Vec::new();
            }
        };

        let mut issued = Vec::with_capacity(events.len());

        for event in &events {
            match self
                .issue_event_code(event, order.delivery_info.email.trim(), now)
                .await
            {
                Ok(code) => {
                    info!(event_name = %event.name, code_uuid = %code.uuid, "issued event code");
                    issued.push(code);
                }
                Err(error) => {
                    warn!(event_name = %event.name, error = %error, "failed to issue event code");
                }
            }
        }

        issued
    }

    async fn send(&self, message: EmailMessage, kind: &'static str) {
        if message.to.is_empty() {
            debug!(kind, "no recipient email, code not sent");
            return;
        }

        if let Err(error) = self.mailer.send_email(message).await {
            warn!(kind, error = %error, "failed to send promo code email");
        }
    }
}

#[async_trait]
impl RewardsService for PgRewardsService {
    #[tracing::instrument(
        name = "rewards.service.reward_order",
        skip(self, order, now),
        fields(order_uuid = %order.uuid, user_uuid = %order.user_uuid)
    )]
    async fn reward_order(&self, order: &OrderRecord, now: Timestamp) -> RewardsOutcome {
        let welcome_code = match self.grant_welcome_code(order, now).await {
            Ok(code) => code,
            Err(error) => {
                warn!(error = %error, "failed to grant welcome code");
                None
            }
        };

        if let Some(code) = &welcome_code {
            self.send(
                templates::welcome_code(&order.delivery_info.name, code),
                "welcome",
            )
            .await;
        }

        let event_codes = self.grant_event_codes(order, now).await;

        for code in &event_codes {
            self.send(
                templates::campaign_code(&order.delivery_info.name, code),
                "campaign",
            )
            .await;
        }

        RewardsOutcome {
            welcome_code,
            event_codes,
        }
    }
}

#[automock]
#[async_trait]
pub trait RewardsService: Send + Sync {
    /// Grant any codes `order` earns. Failures are logged, never returned.
    async fn reward_order(&self, order: &OrderRecord, now: Timestamp) -> RewardsOutcome;
}
