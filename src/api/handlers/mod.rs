//! HTTP request handlers.

pub mod address_handler;
pub mod cart_handler;
pub mod category_handler;
pub mod order_handler;
pub mod product_handler;
pub mod review_handler;
pub mod wishlist_handler;

pub use address_handler::address_routes;
pub use cart_handler::cart_routes;
pub use category_handler::{category_admin_routes, category_public_routes};
pub use order_handler::order_routes;
pub use product_handler::{product_admin_routes, product_public_routes};
pub use review_handler::{review_public_routes, review_routes};
pub use wishlist_handler::wishlist_routes;
