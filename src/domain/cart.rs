//! Shopping cart entities.
//!
//! Cart lines always read the live product price; nothing here is
//! snapshotted. Prices are frozen only when an order is created.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::caller::Owned;
use super::catalog::Product;
use crate::errors::{AppError, AppResult};

/// One cart per user, created lazily
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cart {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Owned for Cart {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// Stored cart line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Cart line joined with its product
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartLine {
    pub id: Uuid,
    pub product: Product,
    #[schema(example = 2)]
    pub quantity: i32,
}

impl CartLine {
    pub fn new(item: CartItem, product: Product) -> Self {
        Self {
            id: item.id,
            product,
            quantity: item.quantity,
        }
    }

    /// Pair each stored line with its product, keeping line order.
    pub fn join(items: Vec<CartItem>, products: Vec<Product>) -> AppResult<Vec<CartLine>> {
        let by_id: HashMap<Uuid, Product> = products.into_iter().map(|p| (p.id, p)).collect();

        items
            .into_iter()
            .map(|item| {
                let product = by_id
                    .get(&item.product_id)
                    .cloned()
                    .ok_or_else(|| {
                        AppError::internal(format!(
                            "Cart item {} references missing product {}",
                            item.id, item.product_id
                        ))
                    })?;
                Ok(CartLine::new(item, product))
            })
            .collect()
    }

    /// quantity × current product price
    pub fn subtotal(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// Cart as returned to clients, with its live total
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<CartLine>,
    #[schema(value_type = String, example = "20.00")]
    pub total: Decimal,
}

impl CartView {
    pub fn new(cart: Cart, items: Vec<CartLine>) -> Self {
        let total = cart_total(&items);
        Self {
            id: cart.id,
            user_id: cart.user_id,
            items,
            total,
        }
    }
}

/// Sum of line subtotals at current prices.
pub fn cart_total(lines: &[CartLine]) -> Decimal {
    lines.iter().map(CartLine::subtotal).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: Decimal) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4(),
            name: "Mug".to_string(),
            description: String::new(),
            price,
            stock: 10,
            category_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn line(price: Decimal, quantity: i32) -> CartLine {
        let product = product(price);
        CartLine {
            id: Uuid::new_v4(),
            product,
            quantity,
        }
    }

    #[test]
    fn test_subtotal_uses_live_price() {
        let mut line = line(Decimal::new(1000, 2), 2);
        assert_eq!(line.subtotal(), Decimal::new(2000, 2));

        line.product.price = Decimal::new(1250, 2);
        assert_eq!(line.subtotal(), Decimal::new(2500, 2));
    }

    #[test]
    fn test_join_keeps_item_order() {
        let a = product(Decimal::new(100, 2));
        let b = product(Decimal::new(200, 2));
        let cart_id = Uuid::new_v4();
        let items = vec![
            CartItem {
                id: Uuid::new_v4(),
                cart_id,
                product_id: b.id,
                quantity: 1,
            },
            CartItem {
                id: Uuid::new_v4(),
                cart_id,
                product_id: a.id,
                quantity: 3,
            },
        ];

        let lines = CartLine::join(items, vec![a.clone(), b.clone()]).unwrap();
        assert_eq!(lines[0].product.id, b.id);
        assert_eq!(lines[1].product.id, a.id);
        assert_eq!(cart_total(&lines), Decimal::new(500, 2));
    }

    #[test]
    fn test_join_missing_product_is_internal() {
        let item = CartItem {
            id: Uuid::new_v4(),
            cart_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            quantity: 1,
        };
        assert!(matches!(
            CartLine::join(vec![item], vec![]),
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn test_cart_total() {
        let lines = vec![line(Decimal::new(1000, 2), 2), line(Decimal::new(399, 2), 3)];
        assert_eq!(cart_total(&lines), Decimal::new(3197, 2));
        assert_eq!(cart_total(&[]), Decimal::ZERO);
    }
}
