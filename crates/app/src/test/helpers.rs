//! Test Helpers

use crate::{
    domain::{
        products::{
            ProductsService, ProductsServiceError,
            data::NewProduct,
            records::{ProductRecord, ProductUuid},
        },
        promotions::{
            data::{NewPromoEvent, discounts::PromoDiscount},
            records::PromoEventUuid,
        },
    },
    test::TestContext,
};

pub(crate) async fn create_product(
    ctx: &TestContext,
    name: &str,
    category: &str,
    price: u64,
) -> Result<ProductRecord, ProductsServiceError> {
    ctx.products
        .create_product(NewProduct {
            uuid: ProductUuid::new(),
            name: name.to_string(),
            category: category.to_string(),
            price,
        })
        .await
}

/// An active 10% off event lasting a week, with no minimum and no criteria.
pub(crate) fn new_promo_event(name: &str) -> NewPromoEvent {
    NewPromoEvent {
        uuid: PromoEventUuid::new(),
        name: name.to_string(),
        description: format!("{name} campaign"),
        trigger: String::new(),
        discount: PromoDiscount::Percentage { percent: 10 },
        duration_days: 7,
        min_order_amount: 0,
        is_active: true,
        criteria: None,
    }
}
