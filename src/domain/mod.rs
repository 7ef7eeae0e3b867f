//! Domain layer - Core business entities and rules
//!
//! Contains the shop's entities and the rules that do not need
//! storage: ownership checks, cart totals, the order status lifecycle.
//! No database types appear here.

pub mod address;
pub mod caller;
pub mod cart;
pub mod catalog;
pub mod order;

pub use address::{Address, AddressFields, AddressPatch};
pub use caller::{can_access, ensure_access, ensure_owner, Caller, Owned};
pub use cart::{cart_total, Cart, CartItem, CartLine, CartView};
pub use catalog::{
    average_rating, Category, CategoryResponse, NewProduct, Product, ProductChanges,
    ProductDetail, ProductImage, Review, WishlistEntry, WishlistItem,
};
pub use order::{
    order_total, NewOrderItem, Order, OrderDetail, OrderItem, OrderStatus, PaymentReceipt,
    StatusChange, TransitionPolicy,
};
