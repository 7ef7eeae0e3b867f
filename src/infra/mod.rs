//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections, migrations and repositories
//! - Redis-backed rate limiting
//! - Unit of Work for transaction management

pub mod db;
pub mod rate_limiter;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, MigrationState, Migrator};
pub use rate_limiter::{RateLimitDecision, RateLimiter};
pub use repositories::{
    AddressRepository, CartRepository, CategoryRepository, OrderRepository, ProductRepository,
    ReviewRepository, WishlistRepository,
};
pub use unit_of_work::{Persistence, TransactionContext, UnitOfWork};
