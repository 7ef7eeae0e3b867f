//! Checkout, payment and order history handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{OptionalJson, ValidatedJson};
use crate::api::AppState;
use crate::domain::{Caller, OrderDetail, PaymentReceipt, StatusChange};
use crate::errors::AppResult;
use crate::types::Created;

/// Checkout options; an empty body ships to the default address
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct CheckoutRequest {
    /// One of the caller's addresses
    pub address_id: Option<Uuid>,
}

/// Payment options; an empty body uses the default payment method
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct PayRequest {
    #[validate(length(max = 50, message = "Payment method must be at most 50 characters"))]
    #[schema(example = "MockPay")]
    pub payment_method: Option<String>,
}

/// Administrator status change
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusRequest {
    #[validate(length(min = 1, message = "Status is required"))]
    #[schema(example = "SHIPPED")]
    pub status: String,
}

/// Create order routes
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/:id", get(get_order))
        .route("/:id/pay", post(pay_order))
        .route("/:id/update_status", post(update_order_status))
}

/// Turn the caller's cart into a pending order
#[utoipa::path(
    post,
    path = "/checkout",
    tag = "Orders",
    security(("bearer_auth" = [])),
    request_body(content = Option<CheckoutRequest>, description = "Optional shipping address"),
    responses(
        (status = 201, description = "Order created", body = OrderDetail),
        (status = 400, description = "Empty cart or no default address"),
        (status = 404, description = "No cart or unknown address"),
        (status = 409, description = "Cart changed during checkout")
    )
)]
pub async fn checkout(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    OptionalJson(payload): OptionalJson<CheckoutRequest>,
) -> AppResult<Created<OrderDetail>> {
    let order = state
        .checkout_service
        .checkout(caller, payload.address_id)
        .await?;

    Ok(Created(order))
}

/// List orders (administrators see all orders)
#[utoipa::path(
    get,
    path = "/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Orders, newest first", body = Vec<OrderDetail>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> AppResult<Json<Vec<OrderDetail>>> {
    let orders = state.order_service.list_orders(caller).await?;
    Ok(Json(orders))
}

/// Get an order with its items
#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order found", body = OrderDetail),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<OrderDetail>> {
    let order = state.order_service.get_order(caller, id).await?;
    Ok(Json(order))
}

/// Pay a pending order (simulated)
#[utoipa::path(
    post,
    path = "/orders/{id}/pay",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body(content = Option<PayRequest>, description = "Optional payment method"),
    responses(
        (status = 200, description = "Payment successful", body = PaymentReceipt),
        (status = 400, description = "Order not pending or insufficient stock"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn pay_order(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    OptionalJson(payload): OptionalJson<PayRequest>,
) -> AppResult<Json<PaymentReceipt>> {
    let receipt = state
        .checkout_service
        .pay(caller, id, payload.payment_method)
        .await?;

    Ok(Json(receipt))
}

/// Set an order's status (admin only)
#[utoipa::path(
    post,
    path = "/orders/{id}/update_status",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = StatusChange),
        (status = 400, description = "Invalid status or transition"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateStatusRequest>,
) -> AppResult<Json<StatusChange>> {
    let change = state
        .order_service
        .update_status(caller, id, payload.status)
        .await?;

    Ok(Json(change))
}
