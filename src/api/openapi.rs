//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    address_handler, cart_handler, category_handler, order_handler, product_handler,
    review_handler, wishlist_handler,
};
use crate::domain::{
    Address, CartLine, CartView, Category, CategoryResponse, Order, OrderDetail, OrderItem,
    OrderStatus, PaymentReceipt, Product, ProductDetail, ProductImage, Review, StatusChange,
    WishlistEntry,
};

/// OpenAPI documentation for the shop API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shop API",
        version = "0.1.0",
        description = "E-commerce backend: catalog, cart, checkout, orders and addresses",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Cart
        cart_handler::get_cart,
        cart_handler::clear_cart,
        cart_handler::add_to_cart,
        cart_handler::update_cart_item,
        cart_handler::remove_cart_item,
        // Checkout and orders
        order_handler::checkout,
        order_handler::list_orders,
        order_handler::get_order,
        order_handler::pay_order,
        order_handler::update_order_status,
        // Addresses
        address_handler::list_addresses,
        address_handler::create_address,
        address_handler::get_address,
        address_handler::update_address,
        address_handler::patch_address,
        address_handler::delete_address,
        address_handler::set_default_address,
        // Products
        product_handler::list_products,
        product_handler::get_product,
        product_handler::create_product,
        product_handler::update_product,
        product_handler::delete_product,
        product_handler::list_product_images,
        product_handler::add_product_image,
        product_handler::delete_product_image,
        // Reviews
        review_handler::list_reviews,
        review_handler::create_review,
        review_handler::get_review,
        review_handler::update_review,
        review_handler::delete_review,
        // Categories
        category_handler::list_categories,
        category_handler::get_category,
        category_handler::create_category,
        category_handler::update_category,
        category_handler::delete_category,
        // Wishlist
        wishlist_handler::list_wishlist,
        wishlist_handler::add_to_wishlist,
        wishlist_handler::remove_from_wishlist,
    ),
    components(
        schemas(
            // Domain types
            Product,
            ProductDetail,
            ProductImage,
            Category,
            CategoryResponse,
            Review,
            WishlistEntry,
            CartLine,
            CartView,
            Address,
            Order,
            OrderItem,
            OrderDetail,
            OrderStatus,
            PaymentReceipt,
            StatusChange,
            // Request bodies
            cart_handler::AddToCartRequest,
            cart_handler::UpdateCartItemRequest,
            order_handler::CheckoutRequest,
            order_handler::PayRequest,
            order_handler::UpdateStatusRequest,
            address_handler::AddressRequest,
            address_handler::PatchAddressRequest,
            product_handler::CreateProductRequest,
            product_handler::UpdateProductRequest,
            product_handler::AddImageRequest,
            review_handler::CreateReviewRequest,
            review_handler::UpdateReviewRequest,
            category_handler::CreateCategoryRequest,
            category_handler::UpdateCategoryRequest,
            wishlist_handler::AddToWishlistRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Cart", description = "The caller's shopping cart"),
        (name = "Orders", description = "Checkout, payment and order history"),
        (name = "Addresses", description = "Shipping address book"),
        (name = "Products", description = "Product catalog and images"),
        (name = "Reviews", description = "Product reviews"),
        (name = "Categories", description = "Product categories"),
        (name = "Wishlist", description = "Saved products")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("HS256 token issued by the identity provider"))
                        .build(),
                ),
            );
        }
    }
}
