//! Product and product image handlers.
//!
//! Reads are public; writes need an administrator token.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{delete, get, post, put},
    Extension, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Caller, NewProduct, Product, ProductChanges, ProductDetail, ProductImage};
use crate::errors::AppResult;
use crate::types::{double_option, Created, NoContent};

/// New product
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    #[schema(example = "Desk Lamp")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    #[schema(example = 12)]
    pub stock: i32,
    pub category_id: Option<Uuid>,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(req: CreateProductRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            price: req.price,
            stock: req.stock,
            category_id: req.category_id,
        }
    }
}

/// Product changes; `category_id: null` removes the category
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>, example = "24.99")]
    pub price: Option<Decimal>,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub category_id: Option<Option<Uuid>>,
}

impl From<UpdateProductRequest> for ProductChanges {
    fn from(req: UpdateProductRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            price: req.price,
            stock: req.stock,
            category_id: req.category_id,
        }
    }
}

/// Image reference to attach to a product
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddImageRequest {
    #[validate(url(message = "Image URL is invalid"))]
    #[schema(example = "https://cdn.example.com/lamp.jpg")]
    pub url: String,
    #[serde(default)]
    #[validate(length(max = 255, message = "Alt text must be at most 255 characters"))]
    pub alt_text: String,
}

/// Catalog reads, no token required
pub fn product_public_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/:id", get(get_product))
        .route("/products/:id/images", get(list_product_images))
}

/// Catalog writes
pub fn product_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(create_product))
        .route("/products/:id", put(update_product).delete(delete_product))
        .route("/products/:id/images", post(add_product_image))
        .route("/products/:id/images/:image_id", delete(delete_product_image))
}

/// List products, newest first
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    responses((status = 200, description = "All products", body = Vec<Product>))
)]
pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let products = state.catalog_service.list_products().await?;
    Ok(Json(products))
}

/// Get a product with category, images and average rating
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = ProductDetail),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ProductDetail>> {
    let product = state.catalog_service.get_product(id).await?;
    Ok(Json(product))
}

/// Create a product (admin only)
#[utoipa::path(
    post,
    path = "/products",
    tag = "Products",
    security(("bearer_auth" = [])),
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ValidatedJson(payload): ValidatedJson<CreateProductRequest>,
) -> AppResult<Created<Product>> {
    let product = state
        .catalog_service
        .create_product(caller, payload.into())
        .await?;

    Ok(Created(product))
}

/// Update a product (admin only)
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateProductRequest>,
) -> AppResult<Json<Product>> {
    let product = state
        .catalog_service
        .update_product(caller, id, payload.into())
        .await?;

    Ok(Json(product))
}

/// Delete a product (admin only)
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.catalog_service.delete_product(caller, id).await?;
    Ok(NoContent)
}

/// List a product's images
#[utoipa::path(
    get,
    path = "/products/{id}/images",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product images", body = Vec<ProductImage>),
        (status = 404, description = "Product not found")
    )
)]
pub async fn list_product_images(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<ProductImage>>> {
    let images = state.catalog_service.list_images(id).await?;
    Ok(Json(images))
}

/// Attach an image to a product (admin only)
#[utoipa::path(
    post,
    path = "/products/{id}/images",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = AddImageRequest,
    responses(
        (status = 201, description = "Image added", body = ProductImage),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn add_product_image(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AddImageRequest>,
) -> AppResult<Created<ProductImage>> {
    let image = state
        .catalog_service
        .add_image(caller, id, payload.url, payload.alt_text)
        .await?;

    Ok(Created(image))
}

/// Remove a product image (admin only)
#[utoipa::path(
    delete,
    path = "/products/{id}/images/{image_id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        ("image_id" = Uuid, Path, description = "Image ID")
    ),
    responses(
        (status = 204, description = "Image removed"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Image not found")
    )
)]
pub async fn delete_product_image(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path((id, image_id)): Path<(Uuid, Uuid)>,
) -> AppResult<NoContent> {
    state
        .catalog_service
        .delete_image(caller, id, image_id)
        .await?;
    Ok(NoContent)
}
