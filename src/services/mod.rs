//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! All services use the Unit of Work pattern for centralized repository
//! access and transaction management. Every operation receives the
//! requesting [`Caller`](crate::domain::Caller) explicitly.

mod address_service;
mod auth_service;
mod cart_service;
mod catalog_service;
mod checkout_service;
pub mod container;
mod order_service;
mod review_service;
mod wishlist_service;

#[cfg(test)]
mod testing;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use address_service::{AddressManager, AddressService};
pub use auth_service::{AuthService, Authenticator, Claims};
pub use cart_service::{CartItemUpdate, CartManager, CartService};
pub use catalog_service::{CatalogManager, CatalogService};
pub use checkout_service::{CheckoutManager, CheckoutService};
pub use order_service::{OrderManager, OrderService};
pub use review_service::{ReviewManager, ReviewService};
pub use wishlist_service::{WishlistManager, WishlistService};

// Parallel execution utilities
pub use container::parallel;

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
