//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.
//! Pooled stores serve standalone reads and writes; the `Tx*`
//! repositories run inside a Unit of Work transaction.

mod address_repository;
mod cart_repository;
mod category_repository;
pub(crate) mod entities;
mod order_repository;
mod product_repository;
mod review_repository;
mod transactional;
mod wishlist_repository;

pub use address_repository::{AddressRepository, AddressStore};
pub use cart_repository::{CartRepository, CartStore};
pub use category_repository::{CategoryRepository, CategoryStore};
pub use order_repository::{OrderRepository, OrderStore};
pub use product_repository::{ProductRepository, ProductStore};
pub use review_repository::{ReviewRepository, ReviewStore};
pub use transactional::{
    TxAddressRepository, TxCartRepository, TxOrderRepository, TxProductRepository,
};
pub use wishlist_repository::{WishlistRepository, WishlistStore};

// Export mocks for tests
#[cfg(any(test, feature = "test-utils"))]
pub use address_repository::MockAddressRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use cart_repository::MockCartRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use category_repository::MockCategoryRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use order_repository::MockOrderRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use product_repository::MockProductRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use review_repository::MockReviewRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use wishlist_repository::MockWishlistRepository;
