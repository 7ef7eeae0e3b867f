//! Cart service - The caller's single shopping cart.
//!
//! Reads use the pooled repositories; every line mutation runs in a
//! transaction holding the cart row lock, so the stock check and the
//! write cannot interleave with a concurrent edit or checkout.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Caller, CartItem, CartLine, CartView, Product};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// Requested change to a cart line
#[derive(Debug, Clone, Copy, Default)]
pub struct CartItemUpdate {
    pub quantity: Option<i32>,
    pub product_id: Option<Uuid>,
}

/// Cart service trait for dependency injection.
#[async_trait]
pub trait CartService: Send + Sync {
    /// Return the caller's cart with live prices, creating it if needed
    async fn get_cart(&self, caller: Caller) -> AppResult<CartView>;

    /// Add `quantity` units, merging into an existing line for the product
    async fn add_item(&self, caller: Caller, product_id: Uuid, quantity: i32)
        -> AppResult<CartLine>;

    async fn update_item(
        &self,
        caller: Caller,
        item_id: Uuid,
        update: CartItemUpdate,
    ) -> AppResult<CartLine>;

    async fn remove_item(&self, caller: Caller, item_id: Uuid) -> AppResult<()>;

    /// Remove every line from the caller's cart
    async fn clear_cart(&self, caller: Caller) -> AppResult<()>;
}

pub struct CartManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CartManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

fn validate_quantity(quantity: i32) -> AppResult<()> {
    if quantity < 1 {
        return Err(AppError::validation("Quantity must be at least 1"));
    }
    Ok(())
}

/// Quantity of `product` once `quantity` joins the existing line, if any.
///
/// A sum that overflows can never be in stock.
fn combined_quantity(
    existing: Option<&CartItem>,
    quantity: i32,
    product: &Product,
) -> AppResult<i32> {
    existing
        .map_or(0, |line| line.quantity)
        .checked_add(quantity)
        .filter(|wanted| product.has_stock_for(*wanted))
        .ok_or_else(|| {
            AppError::insufficient_stock(product.id, product.name.clone(), product.stock)
        })
}

#[async_trait]
impl<U: UnitOfWork> CartService for CartManager<U> {
    async fn get_cart(&self, caller: Caller) -> AppResult<CartView> {
        let cart = self.uow.carts().get_or_create(caller.user_id).await?;
        let items = self.uow.carts().list_items(cart.id).await?;
        let ids = items.iter().map(|item| item.product_id).collect();
        let products = self.uow.products().find_many(ids).await?;

        let lines = CartLine::join(items, products)?;
        Ok(CartView::new(cart, lines))
    }

    async fn add_item(
        &self,
        caller: Caller,
        product_id: Uuid,
        quantity: i32,
    ) -> AppResult<CartLine> {
        validate_quantity(quantity)?;
        let user_id = caller.user_id;

        with_transaction!(self.uow, |ctx| {
            let product = ctx
                .products()
                .find_by_id(product_id)
                .await?
                .ok_or(AppError::NotFound)?;

            let carts = ctx.carts();
            let cart = carts.get_or_create_locked(user_id).await?;
            let existing = carts.find_line(cart.id, product_id).await?;

            let wanted = combined_quantity(existing.as_ref(), quantity, &product)?;

            let item = match existing {
                Some(mut line) => {
                    line.quantity = wanted;
                    carts.save_item(line).await?
                }
                None => carts.insert_item(cart.id, product_id, quantity).await?,
            };

            tracing::debug!(user_id = %user_id, product_id = %product_id, quantity = wanted, "Cart line saved");
            Ok(CartLine::new(item, product))
        })
    }

    async fn update_item(
        &self,
        caller: Caller,
        item_id: Uuid,
        update: CartItemUpdate,
    ) -> AppResult<CartLine> {
        if let Some(quantity) = update.quantity {
            validate_quantity(quantity)?;
        }
        let user_id = caller.user_id;

        with_transaction!(self.uow, |ctx| {
            let carts = ctx.carts();
            let cart = carts
                .lock_for_user(user_id)
                .await?
                .ok_or(AppError::NotFound)?;
            let item = carts
                .find_item(cart.id, item_id)
                .await?
                .ok_or(AppError::NotFound)?;

            let product_id = update.product_id.unwrap_or(item.product_id);
            let quantity = update.quantity.unwrap_or(item.quantity);
            let product = ctx
                .products()
                .find_by_id(product_id)
                .await?
                .ok_or(AppError::NotFound)?;

            // Switching to a product already in the cart merges the two lines
            let merge_into = if product_id != item.product_id {
                carts.find_line(cart.id, product_id).await?
            } else {
                None
            };

            let wanted = combined_quantity(merge_into.as_ref(), quantity, &product)?;

            let saved = match merge_into {
                Some(mut target) => {
                    carts.delete_item(item.id).await?;
                    target.quantity = wanted;
                    carts.save_item(target).await?
                }
                None => {
                    let mut item = item;
                    item.product_id = product_id;
                    item.quantity = quantity;
                    carts.save_item(item).await?
                }
            };

            Ok(CartLine::new(saved, product))
        })
    }

    async fn remove_item(&self, caller: Caller, item_id: Uuid) -> AppResult<()> {
        let user_id = caller.user_id;

        with_transaction!(self.uow, |ctx| {
            let carts = ctx.carts();
            let cart = carts
                .lock_for_user(user_id)
                .await?
                .ok_or(AppError::NotFound)?;
            let item = carts
                .find_item(cart.id, item_id)
                .await?
                .ok_or(AppError::NotFound)?;

            carts.delete_item(item.id).await
        })
    }

    async fn clear_cart(&self, caller: Caller) -> AppResult<()> {
        let user_id = caller.user_id;

        with_transaction!(self.uow, |ctx| {
            let carts = ctx.carts();
            if let Some(cart) = carts.lock_for_user(user_id).await? {
                let removed = carts.clear(cart.id).await?;
                tracing::debug!(user_id = %user_id, removed, "Cart cleared");
            }
            Ok(())
        })
    }
}
