//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{debug, info};

use crate::{
    database::Db,
    domain::{
        carts::{
            data::NewCartItem,
            errors::CartsServiceError,
            records::CartRecord,
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        pricing,
        products::records::ProductUuid,
        users::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
        }
    }

    async fn load_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut cart = self.carts_repository.ensure_cart(tx, user).await?;

        let items = self.items_repository.get_cart_items(tx, user).await?;

        cart.subtotal = pricing::subtotal(items.iter().map(|item| (item.quantity, item.price)))?;
        cart.items = items;

        Ok(cart)
    }

    async fn add_to_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        item: &NewCartItem,
    ) -> Result<(), CartsServiceError> {
        if item.quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        self.items_repository
            .add_cart_item(tx, user, item)
            .await?
            .ok_or(CartsServiceError::InvalidReference)?;

        Ok(())
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let cart = self.load_cart(&mut tx, user).await?;

        tx.commit().await?;

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, item),
        fields(
            user_uuid = %user,
            product_uuid = %item.product_uuid,
            quantity = item.quantity
        ),
        err
    )]
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        self.carts_repository.ensure_cart(&mut tx, user).await?;
        self.add_to_cart(&mut tx, user, &item).await?;
        self.carts_repository.touch_cart(&mut tx, user).await?;

        let cart = self.load_cart(&mut tx, user).await?;

        tx.commit().await?;

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.set_item_quantity",
        skip(self),
        fields(user_uuid = %user, product_uuid = %product),
        err
    )]
    async fn set_item_quantity(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = if quantity == 0 {
            self.items_repository
                .delete_cart_item(&mut tx, user, product)
                .await?
        } else {
            self.items_repository
                .set_cart_item_quantity(&mut tx, user, product, quantity)
                .await?
        };

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        self.carts_repository.touch_cart(&mut tx, user).await?;

        let cart = self.load_cart(&mut tx, user).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn remove_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self
            .items_repository
            .delete_cart_item(&mut tx, user, product)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        self.carts_repository.touch_cart(&mut tx, user).await?;

        let cart = self.load_cart(&mut tx, user).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn clear_cart(&self, user: UserUuid) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let removed = self.items_repository.clear_cart_items(&mut tx, user).await?;

        self.carts_repository.touch_cart(&mut tx, user).await?;

        tx.commit().await?;

        debug!(user_uuid = %user, removed, "cleared cart");

        Ok(())
    }

    #[tracing::instrument(
        name = "carts.service.merge_items",
        skip(self, items),
        fields(user_uuid = %user, lines = items.len()),
        err
    )]
    async fn merge_items(
        &self,
        user: UserUuid,
        items: Vec<NewCartItem>,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        self.carts_repository.ensure_cart(&mut tx, user).await?;

        for item in &items {
            self.add_to_cart(&mut tx, user, item).await?;
        }

        self.carts_repository.touch_cart(&mut tx, user).await?;

        let cart = self.load_cart(&mut tx, user).await?;

        tx.commit().await?;

        info!(user_uuid = %user, merged = items.len(), "merged guest cart");

        Ok(cart)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the user's cart, creating an empty one on first use.
    async fn get_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError>;

    /// Add a quantity of a product to the cart, on top of any existing line.
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Replace the quantity of an existing line. Zero removes the line.
    async fn set_item_quantity(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Remove a line from the cart.
    async fn remove_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Remove every line from the cart.
    async fn clear_cart(&self, user: UserUuid) -> Result<(), CartsServiceError>;

    /// Fold guest cart lines into the user's stored cart.
    async fn merge_items(
        &self,
        user: UserUuid,
        items: Vec<NewCartItem>,
    ) -> Result<CartRecord, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::products::{ProductsService, data::ProductUpdate},
        test::{TestContext, helpers::create_product},
    };

    use super::*;

    fn line(product: ProductUuid, quantity: u32) -> NewCartItem {
        NewCartItem {
            product_uuid: product,
            quantity,
        }
    }

    #[tokio::test]
    async fn get_cart_creates_empty_cart_on_first_use() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let cart = ctx.carts.get_cart(user).await?;

        assert_eq!(cart.user_uuid, user);
        assert!(cart.items.is_empty());
        assert_eq!(cart.subtotal, 0);

        let again = ctx.carts.get_cart(user).await?;

        assert_eq!(again.created_at, cart.created_at);

        Ok(())
    }

    #[tokio::test]
    async fn add_item_accumulates_quantity() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let apples = create_product(&ctx, "Apples", "Fruits", 50).await?;

        ctx.carts.add_item(user, line(apples.uuid, 1)).await?;

        let cart = ctx.carts.add_item(user, line(apples.uuid, 2)).await?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items.first().map(|i| i.quantity), Some(3));
        assert_eq!(cart.subtotal, 150);

        Ok(())
    }

    #[tokio::test]
    async fn cart_prices_follow_the_catalog() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let apples = create_product(&ctx, "Apples", "Fruits", 50).await?;

        ctx.carts.add_item(user, line(apples.uuid, 2)).await?;

        ctx.products
            .update_product(
                apples.uuid,
                ProductUpdate {
                    name: "Apples".to_string(),
                    category: "Fruits".to_string(),
                    price: 60,
                },
            )
            .await?;

        let cart = ctx.carts.get_cart(user).await?;

        assert_eq!(cart.items.first().map(|i| i.price), Some(60));
        assert_eq!(cart.subtotal, 120);

        Ok(())
    }

    #[tokio::test]
    async fn add_unknown_product_returns_invalid_reference() {
        let ctx = TestContext::new().await;

        let result = ctx
            .carts
            .add_item(UserUuid::new(), line(ProductUuid::new(), 1))
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );
    }

    #[tokio::test]
    async fn add_deleted_product_returns_invalid_reference() -> TestResult {
        let ctx = TestContext::new().await;
        let apples = create_product(&ctx, "Apples", "Fruits", 50).await?;

        ctx.products.delete_product(apples.uuid).await?;

        let result = ctx
            .carts
            .add_item(UserUuid::new(), line(apples.uuid, 1))
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_zero_quantity_returns_invalid_quantity() -> TestResult {
        let ctx = TestContext::new().await;
        let apples = create_product(&ctx, "Apples", "Fruits", 50).await?;

        let result = ctx
            .carts
            .add_item(UserUuid::new(), line(apples.uuid, 0))
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn set_item_quantity_replaces_and_zero_removes() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let apples = create_product(&ctx, "Apples", "Fruits", 50).await?;

        ctx.carts.add_item(user, line(apples.uuid, 4)).await?;

        let cart = ctx.carts.set_item_quantity(user, apples.uuid, 1).await?;

        assert_eq!(cart.items.first().map(|i| i.quantity), Some(1));

        let cart = ctx.carts.set_item_quantity(user, apples.uuid, 0).await?;

        assert!(cart.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn remove_missing_item_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .carts
            .remove_item(UserUuid::new(), ProductUuid::new())
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn clear_cart_removes_all_items() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let apples = create_product(&ctx, "Apples", "Fruits", 50).await?;
        let prawns = create_product(&ctx, "Prawns", "Seafood", 30).await?;

        ctx.carts.add_item(user, line(apples.uuid, 1)).await?;
        ctx.carts.add_item(user, line(prawns.uuid, 1)).await?;

        ctx.carts.clear_cart(user).await?;

        let cart = ctx.carts.get_cart(user).await?;

        assert!(cart.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn merge_items_adds_guest_lines() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let apples = create_product(&ctx, "Apples", "Fruits", 50).await?;
        let prawns = create_product(&ctx, "Prawns", "Seafood", 30).await?;

        ctx.carts.add_item(user, line(apples.uuid, 1)).await?;

        let cart = ctx
            .carts
            .merge_items(user, vec![line(apples.uuid, 1), line(prawns.uuid, 2)])
            .await?;

        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.subtotal, 2 * 50 + 2 * 30);

        Ok(())
    }

    #[tokio::test]
    async fn merge_items_with_unknown_product_changes_nothing() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let apples = create_product(&ctx, "Apples", "Fruits", 50).await?;

        let result = ctx
            .carts
            .merge_items(user, vec![line(apples.uuid, 1), line(ProductUuid::new(), 1)])
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );

        let cart = ctx.carts.get_cart(user).await?;

        assert!(cart.items.is_empty());

        Ok(())
    }
}
