//! Shopping cart handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, patch, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Caller, CartLine, CartView};
use crate::errors::AppResult;
use crate::services::CartItemUpdate;
use crate::types::{Created, NoContent};

/// Add a product to the cart
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1, max = 10000, message = "Quantity must be between 1 and 10000"))]
    #[schema(example = 2, minimum = 1, maximum = 10000)]
    pub quantity: i32,
}

/// Change a cart line's quantity or product
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCartItemRequest {
    #[validate(range(min = 1, max = 10000, message = "Quantity must be between 1 and 10000"))]
    #[schema(example = 3, minimum = 1, maximum = 10000)]
    pub quantity: Option<i32>,
    pub product_id: Option<Uuid>,
}

/// Create cart routes
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_cart).delete(clear_cart))
        .route("/add", post(add_to_cart))
        .route("/item/:id", patch(update_cart_item).delete(remove_cart_item))
}

/// Get the caller's cart, creating it on first access
#[utoipa::path(
    get,
    path = "/cart",
    tag = "Cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Cart with live prices and total", body = CartView),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_cart(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> AppResult<Json<CartView>> {
    let cart = state.cart_service.get_cart(caller).await?;
    Ok(Json(cart))
}

/// Remove every item from the caller's cart
#[utoipa::path(
    delete,
    path = "/cart",
    tag = "Cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Cart emptied"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> AppResult<NoContent> {
    state.cart_service.clear_cart(caller).await?;
    Ok(NoContent)
}

/// Add a product to the cart
#[utoipa::path(
    post,
    path = "/cart/add",
    tag = "Cart",
    security(("bearer_auth" = [])),
    request_body = AddToCartRequest,
    responses(
        (status = 201, description = "Item added or merged", body = CartLine),
        (status = 400, description = "Validation error or insufficient stock"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ValidatedJson(payload): ValidatedJson<AddToCartRequest>,
) -> AppResult<Created<CartLine>> {
    let line = state
        .cart_service
        .add_item(caller, payload.product_id, payload.quantity)
        .await?;

    Ok(Created(line))
}

/// Update a cart item
#[utoipa::path(
    patch,
    path = "/cart/item/{id}",
    tag = "Cart",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Cart item ID")),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Item updated", body = CartLine),
        (status = 400, description = "Validation error or insufficient stock"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn update_cart_item(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateCartItemRequest>,
) -> AppResult<Json<CartLine>> {
    let update = CartItemUpdate {
        quantity: payload.quantity,
        product_id: payload.product_id,
    };
    let line = state.cart_service.update_item(caller, id, update).await?;

    Ok(Json(line))
}

/// Remove a cart item
#[utoipa::path(
    delete,
    path = "/cart/item/{id}",
    tag = "Cart",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Cart item ID")),
    responses(
        (status = 204, description = "Item removed"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn remove_cart_item(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.cart_service.remove_item(caller, id).await?;
    Ok(NoContent)
}
