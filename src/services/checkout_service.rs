//! Checkout service - Turns a cart into an order and simulates payment.
//!
//! Both operations run in a single transaction each:
//!
//! - checkout: lock cart, resolve address, snapshot prices into a
//!   PENDING order, empty the cart.
//! - payment: lock order, lock products, check every line's stock before
//!   touching any, decrement with a guarded update, then compare-and-set
//!   the order from PENDING to PAID.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{MAX_PAYMENT_METHOD_LENGTH, PAYMENT_SUCCESS_MESSAGE};
use crate::domain::{
    ensure_owner, Caller, CartLine, NewOrderItem, OrderDetail, OrderItem, OrderStatus,
    PaymentReceipt, Product,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// Checkout service trait for dependency injection.
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Convert the caller's cart into a PENDING order.
    ///
    /// Ships to `address_id` when given, otherwise to the default address.
    async fn checkout(&self, caller: Caller, address_id: Option<Uuid>) -> AppResult<OrderDetail>;

    /// Pay a PENDING order owned by the caller.
    async fn pay(
        &self,
        caller: Caller,
        order_id: Uuid,
        payment_method: Option<String>,
    ) -> AppResult<PaymentReceipt>;
}

pub struct CheckoutManager<U: UnitOfWork> {
    uow: Arc<U>,
    default_payment_method: String,
}

impl<U: UnitOfWork> CheckoutManager<U> {
    pub fn new(uow: Arc<U>, default_payment_method: String) -> Self {
        Self {
            uow,
            default_payment_method,
        }
    }

    fn resolve_payment_method(&self, requested: Option<String>) -> AppResult<String> {
        match requested.map(|m| m.trim().to_string()) {
            Some(method) if method.chars().count() as u64 > MAX_PAYMENT_METHOD_LENGTH => Err(
                AppError::validation(format!(
                    "Payment method must be at most {} characters",
                    MAX_PAYMENT_METHOD_LENGTH
                )),
            ),
            Some(method) if !method.is_empty() => Ok(method),
            _ => Ok(self.default_payment_method.clone()),
        }
    }
}

/// Units needed per product, in product id order.
fn stock_demand(items: &[OrderItem]) -> BTreeMap<Uuid, i32> {
    let mut demand = BTreeMap::new();
    for item in items {
        *demand.entry(item.product_id).or_insert(0) += item.quantity;
    }
    demand
}

/// Fail on the first product (by id) that cannot cover its demand.
fn check_stock(demand: &BTreeMap<Uuid, i32>, products: &HashMap<Uuid, Product>) -> AppResult<()> {
    for (product_id, quantity) in demand {
        match products.get(product_id) {
            Some(product) if product.has_stock_for(*quantity) => {}
            Some(product) => {
                return Err(AppError::insufficient_stock(
                    product.id,
                    product.name.clone(),
                    product.stock,
                ))
            }
            None => {
                return Err(AppError::insufficient_stock(
                    *product_id,
                    product_id.to_string(),
                    0,
                ))
            }
        }
    }
    Ok(())
}

#[async_trait]
impl<U: UnitOfWork> CheckoutService for CheckoutManager<U> {
    async fn checkout(&self, caller: Caller, address_id: Option<Uuid>) -> AppResult<OrderDetail> {
        let user_id = caller.user_id;

        let detail = with_transaction!(self.uow, |ctx| {
            let carts = ctx.carts();
            let cart = carts
                .lock_for_user(user_id)
                .await?
                .ok_or(AppError::NotFound)?;

            let items = carts.items(cart.id).await?;
            if items.is_empty() {
                return Err(AppError::EmptyCart);
            }

            let addresses = ctx.addresses();
            let address = match address_id {
                Some(id) => addresses
                    .find_by_id(id)
                    .await?
                    .filter(|a| a.user_id == user_id)
                    .ok_or(AppError::InvalidAddress)?,
                None => addresses
                    .find_default(user_id)
                    .await?
                    .ok_or(AppError::NoDefaultAddress)?,
            };

            let ids = items.iter().map(|item| item.product_id).collect();
            let products = ctx.products().find_many(ids).await?;
            let lines = CartLine::join(items, products)?;

            // Prices are frozen here; the order total is computed from the snapshots
            let snapshots: Vec<NewOrderItem> = lines.iter().map(NewOrderItem::snapshot).collect();
            let copied = snapshots.len() as u64;

            let detail = ctx
                .orders()
                .create(user_id, address.shipping_label(), snapshots)
                .await?;

            let removed = carts.clear(cart.id).await?;
            if removed != copied {
                return Err(AppError::conflict(
                    "Cart changed during checkout, please try again",
                ));
            }

            Ok(detail)
        })?;

        tracing::info!(
            order_id = %detail.order.id,
            user_id = %user_id,
            total = %detail.order.total,
            items = detail.items.len(),
            "Order created"
        );
        Ok(detail)
    }

    async fn pay(
        &self,
        caller: Caller,
        order_id: Uuid,
        payment_method: Option<String>,
    ) -> AppResult<PaymentReceipt> {
        let method = self.resolve_payment_method(payment_method)?;
        let transaction_id = Uuid::new_v4().to_string();

        let receipt = with_transaction!(self.uow, |ctx| {
            let orders = ctx.orders();
            let order = orders
                .find_for_update(order_id)
                .await?
                .ok_or(AppError::NotFound)?;
            let order = ensure_owner(&caller, order)?;

            if order.status != OrderStatus::Pending {
                return Err(AppError::NotPending);
            }

            let items = orders.items(order.id).await?;
            let demand = stock_demand(&items);

            let products = ctx.products();
            let locked: HashMap<Uuid, Product> = products
                .lock_many(demand.keys().copied().collect())
                .await?
                .into_iter()
                .map(|p| (p.id, p))
                .collect();

            // Nothing is written unless every line is covered
            check_stock(&demand, &locked)?;

            for (product_id, quantity) in &demand {
                if !products.decrement_stock(*product_id, *quantity).await? {
                    let (name, available) = locked
                        .get(product_id)
                        .map(|p| (p.name.clone(), p.stock))
                        .unwrap_or_else(|| (product_id.to_string(), 0));
                    return Err(AppError::insufficient_stock(*product_id, name, available));
                }
            }

            if !orders
                .mark_paid(order.id, method.clone(), transaction_id.clone())
                .await?
            {
                // A concurrent payment won the race
                return Err(AppError::NotPending);
            }

            Ok(PaymentReceipt {
                message: PAYMENT_SUCCESS_MESSAGE.to_string(),
                order_id: order.id,
                status: OrderStatus::Paid,
                payment_method: method,
                transaction_id,
            })
        })?;

        tracing::info!(
            order_id = %receipt.order_id,
            user_id = %caller.user_id,
            payment_method = %receipt.payment_method,
            "Order paid"
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    use crate::services::testing::TestUnitOfWork;

    fn manager() -> CheckoutManager<TestUnitOfWork> {
        CheckoutManager::new(Arc::new(TestUnitOfWork::default()), "MockPay".to_string())
    }

    fn product(stock: i32) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4(),
            name: format!("Item with {stock}"),
            description: String::new(),
            price: Decimal::TEN,
            stock,
            category_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn item(product_id: Uuid, quantity: i32) -> OrderItem {
        OrderItem {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            product_id,
            quantity,
            price: Decimal::TEN,
        }
    }

    #[test]
    fn test_payment_method_defaults() {
        let manager = manager();
        assert_eq!(manager.resolve_payment_method(None).unwrap(), "MockPay");
        assert_eq!(
            manager.resolve_payment_method(Some("  ".to_string())).unwrap(),
            "MockPay"
        );
        assert_eq!(
            manager.resolve_payment_method(Some("Card".to_string())).unwrap(),
            "Card"
        );
        assert!(manager
            .resolve_payment_method(Some("x".repeat(51)))
            .is_err());
    }

    #[test]
    fn test_payment_method_length_counts_characters() {
        let manager = manager();
        // 50 characters, 100 bytes
        let method = "é".repeat(50);
        assert_eq!(
            manager.resolve_payment_method(Some(method.clone())).unwrap(),
            method
        );
        assert!(matches!(
            manager.resolve_payment_method(Some("é".repeat(51))),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_stock_demand_sums_lines_per_product() {
        let shared = Uuid::new_v4();
        let demand = stock_demand(&[item(shared, 2), item(shared, 3), item(Uuid::new_v4(), 1)]);
        assert_eq!(demand.len(), 2);
        assert_eq!(demand[&shared], 5);
    }

    #[test]
    fn test_check_stock_names_first_short_product() {
        let plenty = product(10);
        let short = product(1);
        let demand: BTreeMap<Uuid, i32> = [(plenty.id, 2), (short.id, 2)].into_iter().collect();
        let products: HashMap<Uuid, Product> = [plenty, short.clone()]
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        match check_stock(&demand, &products) {
            Err(AppError::InsufficientStock {
                product_id,
                available,
                ..
            }) => {
                assert_eq!(product_id, short.id);
                assert_eq!(available, 1);
            }
            other => panic!("expected InsufficientStock, got {:?}", other),
        }
    }

    #[test]
    fn test_check_stock_passes_exact_stock() {
        let exact = product(3);
        let demand: BTreeMap<Uuid, i32> = [(exact.id, 3)].into_iter().collect();
        let products: HashMap<Uuid, Product> = [(exact.id, exact)].into_iter().collect();
        assert!(check_stock(&demand, &products).is_ok());
    }
}
