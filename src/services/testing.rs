//! Unit of Work double for service unit tests.

use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{
    MockAddressRepository, MockCartRepository, MockCategoryRepository, MockOrderRepository,
    MockProductRepository, MockReviewRepository, MockWishlistRepository,
};
use crate::infra::{
    AddressRepository, CartRepository, CategoryRepository, OrderRepository, ProductRepository,
    ReviewRepository, TransactionContext, UnitOfWork, WishlistRepository,
};

/// Wraps mock repositories; any repository left unset rejects every call.
pub(crate) struct TestUnitOfWork {
    products: Arc<MockProductRepository>,
    categories: Arc<MockCategoryRepository>,
    reviews: Arc<MockReviewRepository>,
    wishlist: Arc<MockWishlistRepository>,
    carts: Arc<MockCartRepository>,
    addresses: Arc<MockAddressRepository>,
    orders: Arc<MockOrderRepository>,
}

impl Default for TestUnitOfWork {
    fn default() -> Self {
        Self {
            products: Arc::new(MockProductRepository::new()),
            categories: Arc::new(MockCategoryRepository::new()),
            reviews: Arc::new(MockReviewRepository::new()),
            wishlist: Arc::new(MockWishlistRepository::new()),
            carts: Arc::new(MockCartRepository::new()),
            addresses: Arc::new(MockAddressRepository::new()),
            orders: Arc::new(MockOrderRepository::new()),
        }
    }
}

impl TestUnitOfWork {
    pub fn with_products(mut self, repo: MockProductRepository) -> Self {
        self.products = Arc::new(repo);
        self
    }

    pub fn with_categories(mut self, repo: MockCategoryRepository) -> Self {
        self.categories = Arc::new(repo);
        self
    }

    pub fn with_reviews(mut self, repo: MockReviewRepository) -> Self {
        self.reviews = Arc::new(repo);
        self
    }

    pub fn with_wishlist(mut self, repo: MockWishlistRepository) -> Self {
        self.wishlist = Arc::new(repo);
        self
    }

    pub fn with_carts(mut self, repo: MockCartRepository) -> Self {
        self.carts = Arc::new(repo);
        self
    }

    pub fn with_addresses(mut self, repo: MockAddressRepository) -> Self {
        self.addresses = Arc::new(repo);
        self
    }

    pub fn with_orders(mut self, repo: MockOrderRepository) -> Self {
        self.orders = Arc::new(repo);
        self
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn products(&self) -> Arc<dyn ProductRepository> {
        self.products.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.categories.clone()
    }

    fn reviews(&self) -> Arc<dyn ReviewRepository> {
        self.reviews.clone()
    }

    fn wishlist(&self) -> Arc<dyn WishlistRepository> {
        self.wishlist.clone()
    }

    fn carts(&self) -> Arc<dyn CartRepository> {
        self.carts.clone()
    }

    fn addresses(&self) -> Arc<dyn AddressRepository> {
        self.addresses.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.orders.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>
            + Send,
        T: Send,
    {
        // Transactional paths are covered by the SQLite integration tests
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}
