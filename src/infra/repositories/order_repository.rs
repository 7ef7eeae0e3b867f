//! Order repository (read side).
//!
//! Orders are only written inside checkout, payment and status
//! transactions; see the transactional order repository.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use super::entities::order::{self, Entity as OrderEntity};
use super::entities::order_item::{self, Entity as OrderItemEntity};
use crate::domain::{Order, OrderItem};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Order repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>>;

    /// Every order, newest first
    async fn list_all(&self) -> AppResult<Vec<Order>>;

    /// A user's orders, newest first
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Order>>;

    /// Items of every order in `order_ids`
    async fn items_for(&self, order_ids: Vec<Uuid>) -> AppResult<Vec<OrderItem>>;

    /// Whether any order line references the product
    async fn references_product(&self, product_id: Uuid) -> AppResult<bool>;
}

/// Concrete implementation of OrderRepository
pub struct OrderStore {
    db: DatabaseConnection,
}

impl OrderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderRepository for OrderStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>> {
        OrderEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Order::try_from)
            .transpose()
    }

    async fn list_all(&self) -> AppResult<Vec<Order>> {
        let models = OrderEntity::find()
            .order_by_desc(order::Column::CreatedAt)
            .all(&self.db)
            .await?;

        models.into_iter().map(Order::try_from).collect()
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Order>> {
        let models = OrderEntity::find()
            .filter(order::Column::UserId.eq(user_id))
            .order_by_desc(order::Column::CreatedAt)
            .all(&self.db)
            .await?;

        models.into_iter().map(Order::try_from).collect()
    }

    async fn items_for(&self, order_ids: Vec<Uuid>) -> AppResult<Vec<OrderItem>> {
        order_items(&self.db, order_ids).await
    }

    async fn references_product(&self, product_id: Uuid) -> AppResult<bool> {
        let line = OrderItemEntity::find()
            .filter(order_item::Column::ProductId.eq(product_id))
            .one(&self.db)
            .await?;

        Ok(line.is_some())
    }
}

pub(crate) async fn order_items<C: ConnectionTrait>(
    db: &C,
    order_ids: Vec<Uuid>,
) -> AppResult<Vec<OrderItem>> {
    if order_ids.is_empty() {
        return Ok(Vec::new());
    }

    let models = OrderItemEntity::find()
        .filter(order_item::Column::OrderId.is_in(order_ids))
        .order_by_asc(order_item::Column::ProductId)
        .all(db)
        .await?;

    Ok(models.into_iter().map(OrderItem::from).collect())
}
