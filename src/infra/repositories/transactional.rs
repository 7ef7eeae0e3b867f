//! Transaction-scoped repositories.
//!
//! Each repository borrows the open [`DatabaseTransaction`] so every
//! read, lock and write it performs commits or rolls back together.
//! Row locks (`SELECT ... FOR UPDATE`) are held until the transaction ends.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::cart_repository::{cart_items, ensure_cart};
use super::entities::address::{self, Entity as AddressEntity};
use super::entities::cart::{self, Entity as CartEntity};
use super::entities::cart_item::{self, Entity as CartItemEntity};
use super::entities::order::{self, Entity as OrderEntity};
use super::entities::order_item::{self, Entity as OrderItemEntity};
use super::entities::product::{self, Entity as ProductEntity};
use super::order_repository::order_items;
use crate::domain::{
    order_total, Address, AddressFields, Cart, CartItem, NewOrderItem, Order, OrderDetail,
    OrderItem, OrderStatus, Product,
};
use crate::errors::{AppError, AppResult};

/// Product access inside a transaction.
pub struct TxProductRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxProductRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        let result = ProductEntity::find_by_id(id).one(self.txn).await?;
        Ok(result.map(Product::from))
    }

    pub async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = ProductEntity::find()
            .filter(product::Column::Id.is_in(ids))
            .all(self.txn)
            .await?;

        Ok(models.into_iter().map(Product::from).collect())
    }

    /// Lock the given products for update.
    ///
    /// Rows are locked in id order so concurrent payments touching
    /// overlapping products cannot deadlock.
    pub async fn lock_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = ProductEntity::find()
            .filter(product::Column::Id.is_in(ids))
            .order_by_asc(product::Column::Id)
            .lock_exclusive()
            .all(self.txn)
            .await?;

        Ok(models.into_iter().map(Product::from).collect())
    }

    /// `stock = stock - quantity WHERE stock >= quantity`.
    ///
    /// Returns `false` when the guard rejected the update.
    pub async fn decrement_stock(&self, id: Uuid, quantity: i32) -> AppResult<bool> {
        let result = ProductEntity::update_many()
            .col_expr(
                product::Column::Stock,
                Expr::col(product::Column::Stock).sub(quantity),
            )
            .col_expr(product::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(product::Column::Id.eq(id))
            .filter(product::Column::Stock.gte(quantity))
            .exec(self.txn)
            .await?;

        Ok(result.rows_affected == 1)
    }
}

/// Cart access inside a transaction.
pub struct TxCartRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxCartRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Lock the user's cart row, if the user has a cart.
    pub async fn lock_for_user(&self, user_id: Uuid) -> AppResult<Option<Cart>> {
        let result = CartEntity::find()
            .filter(cart::Column::UserId.eq(user_id))
            .lock_exclusive()
            .one(self.txn)
            .await?;

        Ok(result.map(Cart::from))
    }

    /// Create the user's cart if needed and lock it.
    pub async fn get_or_create_locked(&self, user_id: Uuid) -> AppResult<Cart> {
        ensure_cart(self.txn, user_id).await?;
        self.lock_for_user(user_id)
            .await?
            .ok_or_else(|| AppError::internal(format!("Cart for user {user_id} missing after insert")))
    }

    pub async fn items(&self, cart_id: Uuid) -> AppResult<Vec<CartItem>> {
        cart_items(self.txn, cart_id).await
    }

    /// Line `item_id` of cart `cart_id`
    pub async fn find_item(&self, cart_id: Uuid, item_id: Uuid) -> AppResult<Option<CartItem>> {
        let result = CartItemEntity::find_by_id(item_id)
            .filter(cart_item::Column::CartId.eq(cart_id))
            .one(self.txn)
            .await?;

        Ok(result.map(CartItem::from))
    }

    /// Line holding `product_id` in cart `cart_id`
    pub async fn find_line(&self, cart_id: Uuid, product_id: Uuid) -> AppResult<Option<CartItem>> {
        let result = CartItemEntity::find()
            .filter(cart_item::Column::CartId.eq(cart_id))
            .filter(cart_item::Column::ProductId.eq(product_id))
            .one(self.txn)
            .await?;

        Ok(result.map(CartItem::from))
    }

    pub async fn insert_item(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> AppResult<CartItem> {
        let active_model = cart_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            cart_id: Set(cart_id),
            product_id: Set(product_id),
            quantity: Set(quantity),
        };

        let model = active_model.insert(self.txn).await?;
        Ok(CartItem::from(model))
    }

    /// Persist the line's product and quantity.
    pub async fn save_item(&self, item: CartItem) -> AppResult<CartItem> {
        let active_model = cart_item::ActiveModel {
            id: Unchanged(item.id),
            cart_id: Unchanged(item.cart_id),
            product_id: Set(item.product_id),
            quantity: Set(item.quantity),
        };

        let model = active_model.update(self.txn).await?;
        Ok(CartItem::from(model))
    }

    pub async fn delete_item(&self, item_id: Uuid) -> AppResult<()> {
        let result = CartItemEntity::delete_by_id(item_id).exec(self.txn).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    /// Delete every line of the cart, returning how many were removed.
    pub async fn clear(&self, cart_id: Uuid) -> AppResult<u64> {
        let result = CartItemEntity::delete_many()
            .filter(cart_item::Column::CartId.eq(cart_id))
            .exec(self.txn)
            .await?;

        Ok(result.rows_affected)
    }
}

/// Order access inside a transaction.
pub struct TxOrderRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxOrderRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Lock the order row for update.
    pub async fn find_for_update(&self, id: Uuid) -> AppResult<Option<Order>> {
        OrderEntity::find_by_id(id)
            .lock_exclusive()
            .one(self.txn)
            .await?
            .map(Order::try_from)
            .transpose()
    }

    pub async fn items(&self, order_id: Uuid) -> AppResult<Vec<OrderItem>> {
        order_items(self.txn, vec![order_id]).await
    }

    /// Insert a PENDING order and its snapshotted items.
    ///
    /// The total is computed from the same snapshots that are stored.
    pub async fn create(
        &self,
        user_id: Uuid,
        shipping_address: String,
        lines: Vec<NewOrderItem>,
    ) -> AppResult<OrderDetail> {
        let now = Utc::now();
        let order_model = order::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            status: Set(OrderStatus::Pending.as_str().to_string()),
            total: Set(order_total(&lines)),
            payment_method: Set(None),
            transaction_id: Set(None),
            shipping_address: Set(Some(shipping_address)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.txn)
        .await?;

        let order = Order::try_from(order_model)?;

        let items: Vec<OrderItem> = lines
            .into_iter()
            .map(|line| OrderItem {
                id: Uuid::new_v4(),
                order_id: order.id,
                product_id: line.product_id,
                quantity: line.quantity,
                price: line.price,
            })
            .collect();

        if !items.is_empty() {
            let models = items.iter().map(|item| order_item::ActiveModel {
                id: Set(item.id),
                order_id: Set(item.order_id),
                product_id: Set(item.product_id),
                quantity: Set(item.quantity),
                price: Set(item.price),
            });

            OrderItemEntity::insert_many(models)
                .exec_without_returning(self.txn)
                .await?;
        }

        Ok(OrderDetail { order, items })
    }

    /// Compare-and-set `PENDING -> PAID`.
    ///
    /// Returns `false` when the order was no longer pending.
    pub async fn mark_paid(
        &self,
        id: Uuid,
        payment_method: String,
        transaction_id: String,
    ) -> AppResult<bool> {
        let result = OrderEntity::update_many()
            .col_expr(order::Column::Status, Expr::value(OrderStatus::Paid.as_str()))
            .col_expr(order::Column::PaymentMethod, Expr::value(payment_method))
            .col_expr(order::Column::TransactionId, Expr::value(transaction_id))
            .col_expr(order::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(order::Column::Id.eq(id))
            .filter(order::Column::Status.eq(OrderStatus::Pending.as_str()))
            .exec(self.txn)
            .await?;

        Ok(result.rows_affected == 1)
    }

    pub async fn set_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order> {
        let existing = OrderEntity::find_by_id(id)
            .one(self.txn)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: order::ActiveModel = existing.into();
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(Utc::now());

        let model = active.update(self.txn).await?;
        Order::try_from(model)
    }
}

/// Address access inside a transaction.
pub struct TxAddressRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxAddressRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Address>> {
        let result = AddressEntity::find_by_id(id).one(self.txn).await?;
        Ok(result.map(Address::from))
    }

    pub async fn find_default(&self, user_id: Uuid) -> AppResult<Option<Address>> {
        let result = AddressEntity::find()
            .filter(address::Column::UserId.eq(user_id))
            .filter(address::Column::IsDefault.eq(true))
            .one(self.txn)
            .await?;

        Ok(result.map(Address::from))
    }

    /// Lock every address row of the user.
    ///
    /// Default-flag changes for one user serialize on these locks.
    pub async fn lock_for_user(&self, user_id: Uuid) -> AppResult<Vec<Address>> {
        let models = AddressEntity::find()
            .filter(address::Column::UserId.eq(user_id))
            .order_by_asc(address::Column::Id)
            .lock_exclusive()
            .all(self.txn)
            .await?;

        Ok(models.into_iter().map(Address::from).collect())
    }

    /// Unset the default flag on all of the user's addresses.
    pub async fn clear_defaults(&self, user_id: Uuid) -> AppResult<u64> {
        let result = AddressEntity::update_many()
            .col_expr(address::Column::IsDefault, Expr::value(false))
            .filter(address::Column::UserId.eq(user_id))
            .filter(address::Column::IsDefault.eq(true))
            .exec(self.txn)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn insert(&self, user_id: Uuid, fields: AddressFields) -> AppResult<Address> {
        let active_model = address::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            full_name: Set(fields.full_name),
            phone: Set(fields.phone),
            street: Set(fields.street),
            city: Set(fields.city),
            state: Set(fields.state),
            postal_code: Set(fields.postal_code),
            country: Set(fields.country),
            is_default: Set(fields.is_default),
        };

        let model = active_model.insert(self.txn).await?;
        Ok(Address::from(model))
    }

    /// Write every editable field of `address`.
    pub async fn save(&self, address: Address) -> AppResult<Address> {
        let active_model = address::ActiveModel {
            id: Unchanged(address.id),
            user_id: Unchanged(address.user_id),
            full_name: Set(address.full_name),
            phone: Set(address.phone),
            street: Set(address.street),
            city: Set(address.city),
            state: Set(address.state),
            postal_code: Set(address.postal_code),
            country: Set(address.country),
            is_default: Set(address.is_default),
        };

        let model = active_model.update(self.txn).await?;
        Ok(Address::from(model))
    }
}
