//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};

use freshmart_app::{
    context::AppContext,
    domain::{
        carts::{MockCartsService, records::CartRecord},
        orders::{
            MockOrdersService,
            data::{DeliveryInfo, DeliveryOption},
            records::{OrderItemRecord, OrderRecord, OrderUuid},
            status::OrderStatus,
            totals::Totals,
        },
        products::{
            MockProductsService,
            records::{ProductRecord, ProductUuid},
        },
        promotions::{
            MockPromotionsService, MockRewardsService,
            data::discounts::PromoDiscount,
            records::{PromoCodeRecord, PromoCodeUuid, PromoEventRecord, PromoEventUuid},
        },
        users::UserUuid,
    },
};

use crate::state::State;

/// Service mocks behind a test router. Any call without a matching
/// expectation fails the test.
#[derive(Default)]
pub(crate) struct TestServices {
    pub products: MockProductsService,
    pub carts: MockCartsService,
    pub orders: MockOrdersService,
    pub promotions: MockPromotionsService,
    pub rewards: MockRewardsService,
}

impl TestServices {
    pub(crate) fn into_service(self, route: Router) -> Service {
        let app = AppContext {
            products: Arc::new(self.products),
            carts: Arc::new(self.carts),
            orders: Arc::new(self.orders),
            promotions: Arc::new(self.promotions),
            rewards: Arc::new(self.rewards),
        };

        Service::new(
            Router::new()
                .hoop(inject(State::from_app_context(app)))
                .push(route),
        )
    }
}

pub(crate) fn products_service(products: MockProductsService, route: Router) -> Service {
    TestServices {
        products,
        ..TestServices::default()
    }
    .into_service(route)
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    TestServices {
        carts,
        ..TestServices::default()
    }
    .into_service(route)
}

pub(crate) fn orders_service(orders: MockOrdersService, route: Router) -> Service {
    TestServices {
        orders,
        ..TestServices::default()
    }
    .into_service(route)
}

pub(crate) fn promotions_service(promotions: MockPromotionsService, route: Router) -> Service {
    TestServices {
        promotions,
        ..TestServices::default()
    }
    .into_service(route)
}

pub(crate) fn make_product(uuid: ProductUuid) -> ProductRecord {
    ProductRecord {
        uuid,
        name: "Alphonso Mango".to_string(),
        category: "Fruits".to_string(),
        price: 5_000,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

pub(crate) fn make_cart(user: UserUuid) -> CartRecord {
    CartRecord {
        user_uuid: user,
        subtotal: 0,
        items: Vec::new(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

/// A pending standard-delivery order of two mangoes at 50.00.
pub(crate) fn make_order(uuid: OrderUuid, user: UserUuid) -> OrderRecord {
    OrderRecord {
        uuid,
        user_uuid: user,
        items: vec![OrderItemRecord {
            position: 0,
            product_uuid: ProductUuid::new(),
            name: "Alphonso Mango".to_string(),
            category: "Fruits".to_string(),
            quantity: 2,
            price: 5_000,
        }],
        delivery_info: DeliveryInfo {
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            ..DeliveryInfo::default()
        },
        delivery_option: DeliveryOption::Standard,
        delivery_date: String::new(),
        delivery_time: String::new(),
        payment_method: "cod".to_string(),
        totals: Totals {
            subtotal: 10_000,
            shipping: 0,
            tax: 1_000,
            total: 11_000,
        },
        status: OrderStatus::Pending,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_event(uuid: PromoEventUuid) -> PromoEventRecord {
    PromoEventRecord {
        uuid,
        name: "WELCOME".to_string(),
        description: "First order reward".to_string(),
        trigger: "first order".to_string(),
        discount: PromoDiscount::Percentage { percent: 10 },
        duration_days: 30,
        min_order_amount: 0,
        is_active: true,
        criteria: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_code(code: &str) -> PromoCodeRecord {
    PromoCodeRecord {
        uuid: PromoCodeUuid::new(),
        code: code.to_string(),
        promo_event_uuid: None,
        event_name: "WELCOME".to_string(),
        recipient_email: "asha@example.com".to_string(),
        discount: PromoDiscount::Percentage { percent: 10 },
        min_order_amount: 0,
        max_uses: Some(1),
        used_count: 0,
        valid_from: Timestamp::UNIX_EPOCH,
        valid_until: Timestamp::UNIX_EPOCH,
        is_active: true,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
