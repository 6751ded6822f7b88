use std::sync::Arc;

use clap::{Args, ValueEnum};
use freshmart_app::{
    database::{self, Db, PoolConfig},
    domain::promotions::{
        PgPromotionsService, PromotionsService,
        data::{NewPromoEvent, criteria::PromoCriteria, discounts::PromoDiscount},
        records::PromoEventUuid,
    },
    notifications::LogMailer,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DiscountType {
    Percentage,
    Fixed,
}

#[derive(Debug, Args)]
pub(crate) struct CreatePromoEventArgs {
    /// Unique event name; codes are tagged with it
    #[arg(long)]
    name: String,

    #[arg(long, default_value = "")]
    description: String,

    /// Informational label, e.g. "first order"
    #[arg(long, default_value = "")]
    trigger: String,

    #[arg(long, value_enum)]
    discount_type: DiscountType,

    /// Percent for percentage discounts, minor units for fixed ones
    #[arg(long)]
    discount_amount: u64,

    /// How long issued codes stay valid
    #[arg(long, default_value_t = 30)]
    duration_days: u32,

    /// Minimum order amount in minor units
    #[arg(long, default_value_t = 0)]
    min_order_amount: u64,

    /// Category an order must contain; repeat for several
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Create the event switched off
    #[arg(long)]
    inactive: bool,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: CreatePromoEventArgs) -> Result<(), String> {
    let discount = match args.discount_type {
        DiscountType::Percentage => PromoDiscount::Percentage {
            percent: u16::try_from(args.discount_amount)
                .map_err(|_error| "percentage must be between 1 and 100".to_string())?,
        },
        DiscountType::Fixed => PromoDiscount::Fixed {
            amount: args.discount_amount,
        },
    };

    let pool = database::connect(&args.database_url, PoolConfig::default())
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgPromotionsService::new(Db::new(pool), Arc::new(LogMailer));

    let criteria = (!args.categories.is_empty()).then_some(PromoCriteria::CategorySet {
        categories: args.categories,
    });

    let event = service
        .create_event(NewPromoEvent {
            uuid: PromoEventUuid::new(),
            name: args.name,
            description: args.description,
            trigger: args.trigger,
            discount,
            duration_days: args.duration_days,
            min_order_amount: args.min_order_amount,
            is_active: !args.inactive,
            criteria,
        })
        .await
        .map_err(|error| format!("failed to create promo event: {error}"))?;

    println!("promo_event_uuid: {}", event.uuid);
    println!("promo_event_name: {}", event.name);
    println!("discount: {}", event.discount);

    Ok(())
}
