//! Promotions Service

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{debug, info, warn};
use validator::ValidateEmail;

use crate::{
    database::Db,
    domain::promotions::{
        PromotionsServiceError, codes,
        data::{NewPromoEvent, PromoEventUpdate, discounts::PromoDiscount},
        records::{
            CodeValidation, PromoCodeRecord, PromoEventRecord, PromoEventUuid,
            SubscriptionOutcome,
        },
        repositories::{
            PgPromoCodesRepository, PgPromoEventsRepository, PgPromoSubscribersRepository,
        },
    },
    notifications::{Mailer, templates},
};

#[derive(Clone)]
pub struct PgPromotionsService {
    db: Db,
    events: PgPromoEventsRepository,
    codes: PgPromoCodesRepository,
    subscribers: PgPromoSubscribersRepository,
    mailer: Arc<dyn Mailer>,
}

impl fmt::Debug for PgPromotionsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgPromotionsService")
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

impl PgPromotionsService {
    #[must_use]
    pub fn new(db: Db, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            db,
            events: PgPromoEventsRepository::new(),
            codes: PgPromoCodesRepository::new(),
            subscribers: PgPromoSubscribersRepository::new(),
            mailer,
        }
    }
}

fn check_event(
    name: &str,
    discount: &PromoDiscount,
    duration_days: u32,
) -> Result<(), PromotionsServiceError> {
    if name.trim().is_empty() || !discount.is_valid() || duration_days == 0 {
        return Err(PromotionsServiceError::InvalidData);
    }

    Ok(())
}

/// Trimmed, lower-cased address, or `None` when it is not a valid one.
fn normalize_email(email: &str) -> Option<String> {
    let email = email.trim().to_lowercase();

    email.validate_email().then_some(email)
}

fn validation(
    code: &PromoCodeRecord,
    order_amount: u64,
) -> Result<CodeValidation, PromotionsServiceError> {
    Ok(CodeValidation {
        code: code.code.clone(),
        discount: code.discount,
        order_amount,
        discount_amount: code.discount.discount_for(order_amount)?,
        valid_until: code.valid_until,
    })
}

#[async_trait]
impl PromotionsService for PgPromotionsService {
    #[tracing::instrument(
        name = "promotions.service.create_event",
        skip(self, event),
        fields(event_uuid = %event.uuid, event_name = %event.name),
        err
    )]
    async fn create_event(
        &self,
        event: NewPromoEvent,
    ) -> Result<PromoEventRecord, PromotionsServiceError> {
        check_event(&event.name, &event.discount, event.duration_days)?;

        let mut tx = self.db.begin_transaction().await?;

        let created = self.events.create_event(&mut tx, event).await?;

        tx.commit().await?;

        info!(event_uuid = %created.uuid, "created promo event");

        Ok(created)
    }

    async fn list_events(&self) -> Result<Vec<PromoEventRecord>, PromotionsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let events = self.events.list_events(&mut tx).await?;

        tx.commit().await?;

        Ok(events)
    }

    async fn get_event(
        &self,
        event: PromoEventUuid,
    ) -> Result<PromoEventRecord, PromotionsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let event = self.events.get_event(&mut tx, event).await?;

        tx.commit().await?;

        Ok(event)
    }

    #[tracing::instrument(
        name = "promotions.service.update_event",
        skip(self, update),
        fields(event_uuid = %event),
        err
    )]
    async fn update_event(
        &self,
        event: PromoEventUuid,
        update: PromoEventUpdate,
    ) -> Result<PromoEventRecord, PromotionsServiceError> {
        check_event(&update.name, &update.discount, update.duration_days)?;

        let mut tx = self.db.begin_transaction().await?;

        let updated = self.events.update_event(&mut tx, event, update).await?;

        tx.commit().await?;

        info!(event_uuid = %updated.uuid, "updated promo event");

        Ok(updated)
    }

    async fn delete_event(&self, event: PromoEventUuid) -> Result<(), PromotionsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.events.delete_event(&mut tx, event).await?;

        if rows_affected == 0 {
            return Err(PromotionsServiceError::NotFound);
        }

        tx.commit().await?;

        info!(event_uuid = %event, "deleted promo event");

        Ok(())
    }

    async fn list_event_codes(
        &self,
        event: PromoEventUuid,
    ) -> Result<Vec<PromoCodeRecord>, PromotionsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        self.events.get_event(&mut tx, event).await?;

        let codes = self.codes.list_event_codes(&mut tx, event).await?;

        tx.commit().await?;

        Ok(codes)
    }

    #[tracing::instrument(
        name = "promotions.service.subscribe",
        skip(self, email),
        fields(newly_subscribed = tracing::field::Empty),
        err
    )]
    async fn subscribe(
        &self,
        email: String,
        now: Timestamp,
    ) -> Result<SubscriptionOutcome, PromotionsServiceError> {
        let email = normalize_email(&email).ok_or(PromotionsServiceError::InvalidEmail)?;

        let mut tx = self.db.begin_transaction().await?;

        let upsert = self.subscribers.upsert_subscriber(&mut tx, &email).await?;

        tracing::Span::current().record("newly_subscribed", upsert.inserted);

        let code = if upsert.inserted {
            match self.events.find_open_campaign_event(&mut tx).await? {
                Some(event) => {
                    Some(codes::issue_event_code(&self.codes, &mut tx, &event, &email, now).await?)
                }
                None => {
                    debug!("no open campaign, subscribing without a code");
                    None
                }
            }
        } else {
            None
        };

        tx.commit().await?;

        if let Some(code) = &code {
            match self.mailer.send_email(templates::subscription_code(code)).await {
                Ok(()) => info!(event_name = %code.event_name, "sent subscription code"),
                Err(error) => warn!(error = %error, "failed to send subscription code"),
            }
        }

        Ok(SubscriptionOutcome {
            subscriber: upsert.subscriber,
            newly_subscribed: upsert.inserted,
        })
    }

    async fn validate_code(
        &self,
        code: String,
        order_amount: u64,
        now: Timestamp,
    ) -> Result<CodeValidation, PromotionsServiceError> {
        let code = codes::normalize_code(&code);

        let mut tx = self.db.begin_transaction().await?;

        let record = self.codes.get_code(&mut tx, &code).await?;

        tx.commit().await?;

        record.check(order_amount, now)?;

        validation(&record, order_amount)
    }

    #[tracing::instrument(
        name = "promotions.service.redeem_code",
        skip(self, code),
        err
    )]
    async fn redeem_code(
        &self,
        code: String,
        order_amount: u64,
        now: Timestamp,
    ) -> Result<CodeValidation, PromotionsServiceError> {
        let code = codes::normalize_code(&code);

        let mut tx = self.db.begin_transaction().await?;

        let record = self.codes.lock_code(&mut tx, &code).await?;

        record.check(order_amount, now)?;

        let redeemed = self.codes.record_code_use(&mut tx, record.uuid).await?;

        tx.commit().await?;

        info!(
            code_uuid = %redeemed.uuid,
            used_count = redeemed.used_count,
            "redeemed promo code"
        );

        validation(&redeemed, order_amount)
    }
}

#[automock]
#[async_trait]
pub trait PromotionsService: Send + Sync {
    /// Create a promo event.
    async fn create_event(
        &self,
        event: NewPromoEvent,
    ) -> Result<PromoEventRecord, PromotionsServiceError>;

    /// All promo events, oldest first.
    async fn list_events(&self) -> Result<Vec<PromoEventRecord>, PromotionsServiceError>;

    async fn get_event(
        &self,
        event: PromoEventUuid,
    ) -> Result<PromoEventRecord, PromotionsServiceError>;

    /// Replace every editable field of an event.
    async fn update_event(
        &self,
        event: PromoEventUuid,
        update: PromoEventUpdate,
    ) -> Result<PromoEventRecord, PromotionsServiceError>;

    /// Delete an event. Codes already issued from it stay valid.
    async fn delete_event(&self, event: PromoEventUuid) -> Result<(), PromotionsServiceError>;

    /// Codes issued from an event, oldest first.
    async fn list_event_codes(
        &self,
        event: PromoEventUuid,
    ) -> Result<Vec<PromoCodeRecord>, PromotionsServiceError>;

    /// Opt an email address in to promo mail. A first subscription receives a
    /// code from the oldest open campaign.
    async fn subscribe(
        &self,
        email: String,
        now: Timestamp,
    ) -> Result<SubscriptionOutcome, PromotionsServiceError>;

    /// Check a code against an order amount without using it.
    async fn validate_code(
        &self,
        code: String,
        order_amount: u64,
        now: Timestamp,
    ) -> Result<CodeValidation, PromotionsServiceError>;

    /// Check and use a code.
    async fn redeem_code(
        &self,
        code: String,
        order_amount: u64,
        now: Timestamp,
    ) -> Result<CodeValidation, PromotionsServiceError>;
}
