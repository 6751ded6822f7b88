//! App Router

use salvo::Router;

use crate::{carts, orders, products, promo, promotions};

pub(crate) fn app_router() -> Router {
    Router::with_path("api")
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .post(orders::create::handler)
                .push(Router::with_path("user/{user}").get(orders::user_index::handler))
                .push(
                    Router::with_path("{order}")
                        .get(orders::get::handler)
                        .put(orders::update::handler)
                        .delete(orders::delete::handler)
                        .push(Router::with_path("status").put(orders::update_status::handler)),
                ),
        )
        .push(
            Router::with_path("carts/{user}")
                .get(carts::get::handler)
                .delete(carts::clear::handler)
                .push(Router::with_path("merge").post(carts::merge::handler))
                .push(
                    Router::with_path("items")
                        .post(carts::items::create::handler)
                        .push(
                            Router::with_path("{product}")
                                .put(carts::items::update::handler)
                                .delete(carts::items::delete::handler),
                        ),
                ),
        )
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .post(products::create::handler)
                .push(
                    Router::with_path("{product}")
                        .get(products::get::handler)
                        .put(products::update::handler)
                        .delete(products::delete::handler),
                ),
        )
        .push(
            Router::with_path("promo")
                .push(Router::with_path("subscribe").post(promo::subscribe::handler))
                .push(Router::with_path("validate").post(promo::validate::handler))
                .push(Router::with_path("redeem").post(promo::redeem::handler)),
        )
        .push(
            Router::with_path("admin/promo-events")
                .get(promotions::index::handler)
                .post(promotions::create::handler)
                .push(
                    Router::with_path("{event}")
                        .get(promotions::get::handler)
                        .put(promotions::update::handler)
                        .delete(promotions::delete::handler)
                        .push(Router::with_path("codes").get(promotions::codes::handler)),
                ),
        )
}
