//! Cart repository.
//!
//! The row-level helpers are generic over [`ConnectionTrait`] so the same
//! queries back both the pooled store and the transactional repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::cart::{self, Entity as CartEntity};
use super::entities::cart_item::{self, Entity as CartItemEntity};
use crate::domain::{Cart, CartItem};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Cart repository trait for dependency injection.
///
/// Only reads and the idempotent cart creation live here; line mutations
/// go through the transactional cart repository.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Return the user's cart, creating it on first access
    async fn get_or_create(&self, user_id: Uuid) -> AppResult<Cart>;

    async fn list_items(&self, cart_id: Uuid) -> AppResult<Vec<CartItem>>;
}

/// Concrete implementation of CartRepository
pub struct CartStore {
    db: DatabaseConnection,
}

impl CartStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartRepository for CartStore {
    async fn get_or_create(&self, user_id: Uuid) -> AppResult<Cart> {
        ensure_cart(&self.db, user_id).await
    }

    async fn list_items(&self, cart_id: Uuid) -> AppResult<Vec<CartItem>> {
        cart_items(&self.db, cart_id).await
    }
}

/// Insert the user's cart if absent, then read it back.
///
/// Concurrent first accesses race on the unique `carts.user_id` index;
/// the loser's insert is a no-op and both read the same row.
pub(crate) async fn ensure_cart<C: ConnectionTrait>(db: &C, user_id: Uuid) -> AppResult<Cart> {
    let candidate = cart::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        created_at: Set(Utc::now()),
    };

    CartEntity::insert(candidate)
        .on_conflict(
            OnConflict::column(cart::Column::UserId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    CartEntity::find()
        .filter(cart::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .map(Cart::from)
        .ok_or_else(|| AppError::internal(format!("Cart for user {user_id} missing after insert")))
}

pub(crate) async fn cart_items<C: ConnectionTrait>(db: &C, cart_id: Uuid) -> AppResult<Vec<CartItem>> {
    let models = CartItemEntity::find()
        .filter(cart_item::Column::CartId.eq(cart_id))
        .order_by_asc(cart_item::Column::Id)
        .all(db)
        .await?;

    Ok(models.into_iter().map(CartItem::from).collect())
}
