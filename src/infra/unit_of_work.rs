//! Unit of Work pattern implementation.
//!
//! Centralizes access to the pooled repositories and runs multi-step
//! workflows (checkout, payment, default-address changes, cart edits)
//! inside one database transaction that commits or rolls back as a whole.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::repositories::{
    AddressRepository, AddressStore, CartRepository, CartStore, CategoryRepository,
    CategoryStore, OrderRepository, OrderStore, ProductRepository, ProductStore, ReviewRepository,
    ReviewStore, TxAddressRepository, TxCartRepository, TxOrderRepository, TxProductRepository,
    WishlistRepository, WishlistStore,
};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Note: This trait is not mockable directly due to the generic
/// `transaction` method. Tests wrap mock repositories in a small
/// hand-written implementation instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn products(&self) -> Arc<dyn ProductRepository>;

    fn categories(&self) -> Arc<dyn CategoryRepository>;

    fn reviews(&self) -> Arc<dyn ReviewRepository>;

    fn wishlist(&self) -> Arc<dyn WishlistRepository>;

    fn carts(&self) -> Arc<dyn CartRepository>;

    fn addresses(&self) -> Arc<dyn AddressRepository>;

    fn orders(&self) -> Arc<dyn OrderRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed when the closure succeeds and rolled
    /// back when it returns an error. Runs at ReadCommitted; row locks
    /// taken through the context provide the per-cart and per-order
    /// serialization.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>
            + Send,
        T: Send;
}

/// Repository access within a transaction.
///
/// The context borrows the transaction, so repositories obtained from it
/// cannot outlive the commit or rollback.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn products(&self) -> TxProductRepository<'_> {
        TxProductRepository::new(self.txn)
    }

    pub fn carts(&self) -> TxCartRepository<'_> {
        TxCartRepository::new(self.txn)
    }

    pub fn orders(&self) -> TxOrderRepository<'_> {
        TxOrderRepository::new(self.txn)
    }

    pub fn addresses(&self) -> TxAddressRepository<'_> {
        TxAddressRepository::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    product_repo: Arc<ProductStore>,
    category_repo: Arc<CategoryStore>,
    review_repo: Arc<ReviewStore>,
    wishlist_repo: Arc<WishlistStore>,
    cart_repo: Arc<CartStore>,
    address_repo: Arc<AddressStore>,
    order_repo: Arc<OrderStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            product_repo: Arc::new(ProductStore::new(db.clone())),
            category_repo: Arc::new(CategoryStore::new(db.clone())),
            review_repo: Arc::new(ReviewStore::new(db.clone())),
            wishlist_repo: Arc::new(WishlistStore::new(db.clone())),
            cart_repo: Arc::new(CartStore::new(db.clone())),
            address_repo: Arc::new(AddressStore::new(db.clone())),
            order_repo: Arc::new(OrderStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn products(&self) -> Arc<dyn ProductRepository> {
        self.product_repo.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.category_repo.clone()
    }

    fn reviews(&self) -> Arc<dyn ReviewRepository> {
        self.review_repo.clone()
    }

    fn wishlist(&self) -> Arc<dyn WishlistRepository> {
        self.wishlist_repo.clone()
    }

    fn carts(&self) -> Arc<dyn CartRepository> {
        self.cart_repo.clone()
    }

    fn addresses(&self) -> Arc<dyn AddressRepository> {
        self.address_repo.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.order_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>
            + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Run a block inside `$uow.transaction`, binding the context to `$ctx`.
///
/// The block may only capture owned values.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
