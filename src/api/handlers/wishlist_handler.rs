//! Wishlist handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{delete, get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Caller, WishlistEntry};
use crate::errors::AppResult;
use crate::types::{Created, NoContent};

/// Product to save
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddToWishlistRequest {
    pub product_id: Uuid,
}

/// Create wishlist routes
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_wishlist))
        .route("/add", post(add_to_wishlist))
        .route("/:id/remove", delete(remove_from_wishlist))
}

/// List the caller's wishlist
#[utoipa::path(
    get,
    path = "/wishlist",
    tag = "Wishlist",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Saved products", body = Vec<WishlistEntry>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_wishlist(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> AppResult<Json<Vec<WishlistEntry>>> {
    let entries = state.wishlist_service.list_wishlist(caller).await?;
    Ok(Json(entries))
}

/// Save a product to the wishlist
#[utoipa::path(
    post,
    path = "/wishlist/add",
    tag = "Wishlist",
    security(("bearer_auth" = [])),
    request_body = AddToWishlistRequest,
    responses(
        (status = 201, description = "Product saved", body = WishlistEntry),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Product already in wishlist")
    )
)]
pub async fn add_to_wishlist(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ValidatedJson(payload): ValidatedJson<AddToWishlistRequest>,
) -> AppResult<Created<WishlistEntry>> {
    let entry = state
        .wishlist_service
        .add_to_wishlist(caller, payload.product_id)
        .await?;

    Ok(Created(entry))
}

/// Remove a wishlist entry
#[utoipa::path(
    delete,
    path = "/wishlist/{id}/remove",
    tag = "Wishlist",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Wishlist entry ID")),
    responses(
        (status = 204, description = "Entry removed"),
        (status = 404, description = "Entry not found")
    )
)]
pub async fn remove_from_wishlist(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state
        .wishlist_service
        .remove_from_wishlist(caller, id)
        .await?;
    Ok(NoContent)
}
