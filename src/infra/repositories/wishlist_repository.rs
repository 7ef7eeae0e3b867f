//! Wishlist repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::wishlist_item::{self, ActiveModel, Entity as WishlistEntity};
use crate::domain::WishlistItem;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Wishlist repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait WishlistRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<WishlistItem>>;

    /// Entry for a (user, product) pair, if saved
    async fn find_entry(&self, user_id: Uuid, product_id: Uuid)
        -> AppResult<Option<WishlistItem>>;

    /// A user's wishlist, most recently added first
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<WishlistItem>>;

    async fn add(&self, user_id: Uuid, product_id: Uuid) -> AppResult<WishlistItem>;

    async fn remove(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of WishlistRepository
pub struct WishlistStore {
    db: DatabaseConnection,
}

impl WishlistStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WishlistRepository for WishlistStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<WishlistItem>> {
        let result = WishlistEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(WishlistItem::from))
    }

    async fn find_entry(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Option<WishlistItem>> {
        let result = WishlistEntity::find()
            .filter(wishlist_item::Column::UserId.eq(user_id))
            .filter(wishlist_item::Column::ProductId.eq(product_id))
            .one(&self.db)
            .await?;

        Ok(result.map(WishlistItem::from))
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<WishlistItem>> {
        let models = WishlistEntity::find()
            .filter(wishlist_item::Column::UserId.eq(user_id))
            .order_by_desc(wishlist_item::Column::AddedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(WishlistItem::from).collect())
    }

    async fn add(&self, user_id: Uuid, product_id: Uuid) -> AppResult<WishlistItem> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            product_id: Set(product_id),
            added_at: Set(Utc::now()),
        };

        // The unique (user, product) index settles concurrent adds
        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| AppError::unique_violation(e, "Product already in wishlist"))?;
        Ok(WishlistItem::from(model))
    }

    async fn remove(&self, id: Uuid) -> AppResult<()> {
        let result = WishlistEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
