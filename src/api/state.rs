//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, RateLimiter};
use crate::services::{
    AddressService, AuthService, CartService, CatalogService, CheckoutService, OrderService,
    ReviewService, ServiceContainer, Services, WishlistService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub catalog_service: Arc<dyn CatalogService>,
    pub review_service: Arc<dyn ReviewService>,
    pub wishlist_service: Arc<dyn WishlistService>,
    pub cart_service: Arc<dyn CartService>,
    pub address_service: Arc<dyn AddressService>,
    pub order_service: Arc<dyn OrderService>,
    pub checkout_service: Arc<dyn CheckoutService>,
    /// Redis-backed limiter; `None` disables rate limiting
    pub rate_limiter: Option<Arc<RateLimiter>>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database connection and config.
    ///
    /// This is the recommended way to create AppState as it wires every
    /// service over one shared Unit of Work.
    pub fn from_config(
        database: Arc<Database>,
        rate_limiter: Option<Arc<RateLimiter>>,
        config: &Config,
    ) -> Self {
        let container = Services::from_connection(database.get_connection(), config);
        Self::new(&container, rate_limiter, database)
    }

    /// Create application state from any service container.
    pub fn new(
        services: &dyn ServiceContainer,
        rate_limiter: Option<Arc<RateLimiter>>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            auth_service: services.auth(),
            catalog_service: services.catalog(),
            review_service: services.reviews(),
            wishlist_service: services.wishlist(),
            cart_service: services.carts(),
            address_service: services.addresses(),
            order_service: services.orders(),
            checkout_service: services.checkout(),
            rate_limiter,
            database,
        }
    }
}
