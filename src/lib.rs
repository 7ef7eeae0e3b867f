//! Shop API - E-commerce backend
//!
//! Catalog, shopping cart, checkout with simulated payment, order
//! history and address book behind a JSON HTTP API.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and rules
//! - **services**: Application use cases (cart, checkout, orders, ...)
//! - **infra**: Database, migrations, repositories, rate limiter
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared HTTP response helpers
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server (applies pending migrations)
//! shop-api serve
//!
//! # Run migrations
//! shop-api migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::Caller;
pub use errors::{AppError, AppResult};
pub use infra::{Database, RateLimiter};
