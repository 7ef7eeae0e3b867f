//! Service Container - Centralized service access.
//!
//! Every service shares one Unit of Work over the same connection pool;
//! handlers only see the service traits.

use std::future::Future;
use std::sync::Arc;

use super::{
    AddressService, AuthService, CartService, CatalogService, CheckoutService, OrderService,
    ReviewService, WishlistService,
};
use crate::config::Config;
use crate::domain::TransitionPolicy;
use crate::errors::AppResult;
use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Products, images and categories
    fn catalog(&self) -> Arc<dyn CatalogService>;

    fn reviews(&self) -> Arc<dyn ReviewService>;

    fn wishlist(&self) -> Arc<dyn WishlistService>;

    fn carts(&self) -> Arc<dyn CartService>;

    fn addresses(&self) -> Arc<dyn AddressService>;

    fn orders(&self) -> Arc<dyn OrderService>;

    /// Checkout and payment
    fn checkout(&self) -> Arc<dyn CheckoutService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    catalog_service: Arc<dyn CatalogService>,
    review_service: Arc<dyn ReviewService>,
    wishlist_service: Arc<dyn WishlistService>,
    cart_service: Arc<dyn CartService>,
    address_service: Arc<dyn AddressService>,
    order_service: Arc<dyn OrderService>,
    checkout_service: Arc<dyn CheckoutService>,
}

impl Services {
    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: &Config) -> Self {
        use super::{
            AddressManager, Authenticator, CartManager, CatalogManager, CheckoutManager,
            OrderManager, ReviewManager, WishlistManager,
        };

        let uow = Arc::new(Persistence::new(db));
        let policy = TransitionPolicy::from_strict(config.strict_order_lifecycle);

        Self {
            auth_service: Arc::new(Authenticator::new(config)),
            catalog_service: Arc::new(CatalogManager::new(uow.clone())),
            review_service: Arc::new(ReviewManager::new(uow.clone())),
            wishlist_service: Arc::new(WishlistManager::new(uow.clone())),
            cart_service: Arc::new(CartManager::new(uow.clone())),
            address_service: Arc::new(AddressManager::new(uow.clone())),
            order_service: Arc::new(OrderManager::new(uow.clone(), policy)),
            checkout_service: Arc::new(CheckoutManager::new(
                uow,
                config.default_payment_method.clone(),
            )),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogService> {
        self.catalog_service.clone()
    }

    fn reviews(&self) -> Arc<dyn ReviewService> {
        self.review_service.clone()
    }

    fn wishlist(&self) -> Arc<dyn WishlistService> {
        self.wishlist_service.clone()
    }

    fn carts(&self) -> Arc<dyn CartService> {
        self.cart_service.clone()
    }

    fn addresses(&self) -> Arc<dyn AddressService> {
        self.address_service.clone()
    }

    fn orders(&self) -> Arc<dyn OrderService> {
        self.order_service.clone()
    }

    fn checkout(&self) -> Arc<dyn CheckoutService> {
        self.checkout_service.clone()
    }
}

/// Run independent read operations concurrently.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    /// Execute three independent async operations in parallel.
    ///
    /// If any operation fails, the error is returned immediately.
    ///
    /// # Example
    /// ```ignore
    /// let (category, images, ratings) = parallel::join3(
    ///     uow.categories().find_by_id(category_id),
    ///     uow.products().list_images(product_id),
    ///     uow.reviews().ratings_for_product(product_id),
    /// ).await?;
    /// ```
    pub async fn join3<F1, F2, F3, T1, T2, T3>(
        f1: F1,
        f2: F2,
        f3: F3,
    ) -> AppResult<(T1, T2, T3)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
        F3: Future<Output = AppResult<T3>>,
    {
        try_join!(f1, f2, f3)
    }
}
