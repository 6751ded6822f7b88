//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    config::AppConfig,
    database::{self, Db},
    domain::{
        carts::{CartsService, PgCartsService},
        orders::{OrdersService, PgOrdersService},
        products::{PgProductsService, ProductsService},
        promotions::{PgPromotionsService, PgRewardsService, PromotionsService, RewardsService},
    },
    notifications::{HttpMailer, LogMailer, Mailer, MailerError},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to build email client")]
    Mailer(#[source] MailerError),
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub promotions: Arc<dyn PromotionsService>,
    pub rewards: Arc<dyn RewardsService>,
}

impl AppContext {
    /// Build application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or building
    /// the email client fails.
    pub async fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let pool = database::connect(&config.database_url, config.pool)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        let mailer: Arc<dyn Mailer> = match &config.mailer {
            Some(mailer) => Arc::new(HttpMailer::new(mailer.clone()).map_err(AppInitError::Mailer)?),
            None => Arc::new(LogMailer),
        };

        Ok(Self {
            products: Arc::new(PgProductsService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(
                db.clone(),
                Arc::clone(&mailer),
                config.totals,
                config.working_hours.clone(),
            )),
            promotions: Arc::new(PgPromotionsService::new(db.clone(), Arc::clone(&mailer))),
            rewards: Arc::new(PgRewardsService::new(
                db,
                mailer,
                config.promotions.clone(),
            )),
        })
    }
}
