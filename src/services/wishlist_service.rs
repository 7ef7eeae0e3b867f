//! Wishlist service - Products a customer saved for later.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{ensure_access, Caller, WishlistEntry};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Wishlist service trait for dependency injection.
#[async_trait]
pub trait WishlistService: Send + Sync {
    async fn list_wishlist(&self, caller: Caller) -> AppResult<Vec<WishlistEntry>>;

    /// `Conflict` if the product is already saved
    async fn add_to_wishlist(&self, caller: Caller, product_id: Uuid) -> AppResult<WishlistEntry>;

    async fn remove_from_wishlist(&self, caller: Caller, item_id: Uuid) -> AppResult<()>;
}

pub struct WishlistManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> WishlistManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> WishlistService for WishlistManager<U> {
    async fn list_wishlist(&self, caller: Caller) -> AppResult<Vec<WishlistEntry>> {
        let items = self.uow.wishlist().list_for_user(caller.user_id).await?;
        let ids = items.iter().map(|item| item.product_id).collect();
        let products: HashMap<_, _> = self
            .uow
            .products()
            .find_many(ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(items
            .into_iter()
            .filter_map(|item| {
                products.get(&item.product_id).map(|product| WishlistEntry {
                    id: item.id,
                    product: product.clone(),
                    added_at: item.added_at,
                })
            })
            .collect())
    }

    async fn add_to_wishlist(&self, caller: Caller, product_id: Uuid) -> AppResult<WishlistEntry> {
        let product = self
            .uow
            .products()
            .find_by_id(product_id)
            .await?
            .ok_or_not_found()?;

        if self
            .uow
            .wishlist()
            .find_entry(caller.user_id, product_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Product already in wishlist"));
        }

        let item = self.uow.wishlist().add(caller.user_id, product_id).await?;
        Ok(WishlistEntry {
            id: item.id,
            product,
            added_at: item.added_at,
        })
    }

    async fn remove_from_wishlist(&self, caller: Caller, item_id: Uuid) -> AppResult<()> {
        let item = self
            .uow
            .wishlist()
            .find_by_id(item_id)
            .await?
            .ok_or_not_found()?;
        let item = ensure_access(&caller, item)?;

        self.uow.wishlist().remove(item.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    use crate::domain::{Product, WishlistItem};
    use crate::infra::repositories::{MockProductRepository, MockWishlistRepository};
    use crate::services::testing::TestUnitOfWork;

    fn product(id: Uuid) -> Product {
        let now = Utc::now();
        Product {
            id,
            name: "Mug".to_string(),
            description: String::new(),
            price: Decimal::new(800, 2),
            stock: 3,
            category_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn item(user_id: Uuid, product_id: Uuid) -> WishlistItem {
        WishlistItem {
            id: Uuid::new_v4(),
            user_id,
            product_id,
            added_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_add_conflicts() {
        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .returning(|id| Ok(Some(product(id))));

        let mut wishlist = MockWishlistRepository::new();
        wishlist
            .expect_find_entry()
            .returning(|user_id, product_id| Ok(Some(item(user_id, product_id))));
        wishlist.expect_add().never();

        let uow = TestUnitOfWork::default()
            .with_products(products)
            .with_wishlist(wishlist);
        let service = WishlistManager::new(Arc::new(uow));

        let result = service
            .add_to_wishlist(Caller::user(Uuid::new_v4()), Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_list_joins_products() {
        let user_id = Uuid::new_v4();
        let product_id = Uuid::new_v4();

        let mut wishlist = MockWishlistRepository::new();
        wishlist
            .expect_list_for_user()
            .returning(move |user_id| Ok(vec![item(user_id, product_id)]));

        let mut products = MockProductRepository::new();
        products
            .expect_find_many()
            .returning(|ids| Ok(ids.into_iter().map(product).collect()));

        let uow = TestUnitOfWork::default()
            .with_products(products)
            .with_wishlist(wishlist);
        let service = WishlistManager::new(Arc::new(uow));

        let entries = service.list_wishlist(Caller::user(user_id)).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].product.id, product_id);
    }

    #[tokio::test]
    async fn test_cannot_remove_foreign_item() {
        let mut wishlist = MockWishlistRepository::new();
        wishlist
            .expect_find_by_id()
            .returning(|_| Ok(Some(item(Uuid::new_v4(), Uuid::new_v4()))));
        wishlist.expect_remove().never();

        let uow = TestUnitOfWork::default().with_wishlist(wishlist);
        let service = WishlistManager::new(Arc::new(uow));

        let result = service
            .remove_from_wishlist(Caller::user(Uuid::new_v4()), Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }
}
