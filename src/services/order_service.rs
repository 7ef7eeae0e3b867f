//! Order service - Order history and administrator status changes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    ensure_access, Caller, OrderDetail, OrderItem, OrderStatus, StatusChange, TransitionPolicy,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// Order service trait for dependency injection.
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Administrators see every order, customers their own; newest first
    async fn list_orders(&self, caller: Caller) -> AppResult<Vec<OrderDetail>>;

    async fn get_order(&self, caller: Caller, id: Uuid) -> AppResult<OrderDetail>;

    /// Set an order's status. Administrator only.
    async fn update_status(&self, caller: Caller, id: Uuid, status: String)
        -> AppResult<StatusChange>;
}

pub struct OrderManager<U: UnitOfWork> {
    uow: Arc<U>,
    policy: TransitionPolicy,
}

impl<U: UnitOfWork> OrderManager<U> {
    pub fn new(uow: Arc<U>, policy: TransitionPolicy) -> Self {
        Self { uow, policy }
    }
}

#[async_trait]
impl<U: UnitOfWork> OrderService for OrderManager<U> {
    async fn list_orders(&self, caller: Caller) -> AppResult<Vec<OrderDetail>> {
        let orders = if caller.is_admin {
            self.uow.orders().list_all().await?
        } else {
            self.uow.orders().list_for_user(caller.user_id).await?
        };

        let ids = orders.iter().map(|order| order.id).collect();
        let mut items: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
        for item in self.uow.orders().items_for(ids).await? {
            items.entry(item.order_id).or_default().push(item);
        }

        Ok(orders
            .into_iter()
            .map(|order| OrderDetail {
                items: items.remove(&order.id).unwrap_or_default(),
                order,
            })
            .collect())
    }

    async fn get_order(&self, caller: Caller, id: Uuid) -> AppResult<OrderDetail> {
        let order = self.uow.orders().find_by_id(id).await?.ok_or_not_found()?;
        let order = ensure_access(&caller, order)?;
        let items = self.uow.orders().items_for(vec![order.id]).await?;

        Ok(OrderDetail { order, items })
    }

    async fn update_status(
        &self,
        caller: Caller,
        id: Uuid,
        status: String,
    ) -> AppResult<StatusChange> {
        caller.require_admin()?;
        let target = OrderStatus::parse_admin_target(&status)?;
        let policy = self.policy;

        let order = with_transaction!(self.uow, |ctx| {
            let orders = ctx.orders();
            let current = orders
                .find_for_update(id)
                .await?
                .ok_or(AppError::NotFound)?;

            policy.check(current.status, target)?;
            orders.set_status(current.id, target).await
        })?;

        tracing::info!(order_id = %order.id, status = %order.status, "Order status updated");

        Ok(StatusChange {
            message: format!("Order status updated to {}", order.status),
            order_id: order.id,
            status: order.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;

    use crate::domain::Order;
    use crate::infra::repositories::MockOrderRepository;
    use crate::services::testing::TestUnitOfWork;

    fn order(user_id: Uuid, age_minutes: i64) -> Order {
        let created = Utc::now() - Duration::minutes(age_minutes);
        Order {
            id: Uuid::new_v4(),
            user_id,
            status: OrderStatus::Pending,
            total: Decimal::new(2000, 2),
            payment_method: None,
            transaction_id: None,
            shipping_address: Some("Jane Doe, 1 Main St, Springfield, IL 62701, US".to_string()),
            created_at: created,
            updated_at: created,
        }
    }

    fn item(order_id: Uuid) -> OrderItem {
        OrderItem {
            id: Uuid::new_v4(),
            order_id,
            product_id: Uuid::new_v4(),
            quantity: 2,
            price: Decimal::new(1000, 2),
        }
    }

    fn manager(orders: MockOrderRepository) -> OrderManager<TestUnitOfWork> {
        OrderManager::new(
            Arc::new(TestUnitOfWork::default().with_orders(orders)),
            TransitionPolicy::Permissive,
        )
    }

    #[tokio::test]
    async fn test_customer_lists_own_orders_with_items() {
        let user_id = Uuid::new_v4();
        let newer = order(user_id, 1);
        let older = order(user_id, 30);
        let listed = vec![newer.clone(), older.clone()];
        let newer_id = newer.id;

        let mut orders = MockOrderRepository::new();
        orders.expect_list_all().never();
        orders
            .expect_list_for_user()
            .returning(move |_| Ok(listed.clone()));
        orders
            .expect_items_for()
            .returning(move |_| Ok(vec![item(newer_id), item(newer_id)]));

        let result = manager(orders)
            .list_orders(Caller::user(user_id))
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].order.id, newer.id);
        assert_eq!(result[0].items.len(), 2);
        assert!(result[1].items.is_empty());
    }

    #[tokio::test]
    async fn test_admin_lists_all_orders() {
        let mut orders = MockOrderRepository::new();
        orders
            .expect_list_all()
            .times(1)
            .returning(|| Ok(vec![order(Uuid::new_v4(), 5), order(Uuid::new_v4(), 2)]));
        orders.expect_list_for_user().never();
        orders.expect_items_for().returning(|_| Ok(vec![]));

        let result = manager(orders)
            .list_orders(Caller::admin(Uuid::new_v4()))
            .await
            .unwrap();
        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_get_foreign_order_not_found() {
        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(|_| Ok(Some(order(Uuid::new_v4(), 0))));
        orders.expect_items_for().never();

        let result = manager(orders)
            .get_order(Caller::user(Uuid::new_v4()), Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_status_requires_admin() {
        let result = manager(MockOrderRepository::new())
            .update_status(
                Caller::user(Uuid::new_v4()),
                Uuid::new_v4(),
                "SHIPPED".to_string(),
            )
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_update_status_rejects_unknown_and_pending() {
        for status in ["LOST", "PENDING"] {
            let result = manager(MockOrderRepository::new())
                .update_status(
                    Caller::admin(Uuid::new_v4()),
                    Uuid::new_v4(),
                    status.to_string(),
                )
                .await;
            assert!(matches!(result, Err(AppError::InvalidStatus(_))));
        }
    }
}
