//! Address book handlers.

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

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Address, AddressFields, AddressPatch, Caller};
use crate::errors::AppResult;
use crate::types::{Created, NoContent};

/// Full address (create and PUT)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddressRequest {
    #[validate(length(min = 1, max = 100, message = "Full name must be 1-100 characters"))]
    #[schema(example = "Jane Doe")]
    pub full_name: String,
    #[validate(length(min = 1, max = 20, message = "Phone must be 1-20 characters"))]
    #[schema(example = "+1 555 0100")]
    pub phone: String,
    #[validate(length(min = 1, max = 255, message = "Street must be 1-255 characters"))]
    #[schema(example = "1 Main St")]
    pub street: String,
    #[validate(length(min = 1, max = 100, message = "City must be 1-100 characters"))]
    #[schema(example = "Springfield")]
    pub city: String,
    #[validate(length(min = 1, max = 100, message = "State must be 1-100 characters"))]
    #[schema(example = "IL")]
    pub state: String,
    #[validate(length(min = 1, max = 20, message = "Postal code must be 1-20 characters"))]
    #[schema(example = "62701")]
    pub postal_code: String,
    #[validate(length(min = 1, max = 100, message = "Country must be 1-100 characters"))]
    #[schema(example = "US")]
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

impl From<AddressRequest> for AddressFields {
    fn from(req: AddressRequest) -> Self {
        Self {
            full_name: req.full_name,
            phone: req.phone,
            street: req.street,
            city: req.city,
            state: req.state,
            postal_code: req.postal_code,
            country: req.country,
            is_default: req.is_default,
        }
    }
}

/// Partial address (PATCH)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PatchAddressRequest {
    #[validate(length(min = 1, max = 100, message = "Full name must be 1-100 characters"))]
    pub full_name: Option<String>,
    #[validate(length(min = 1, max = 20, message = "Phone must be 1-20 characters"))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Street must be 1-255 characters"))]
    pub street: Option<String>,
    #[validate(length(min = 1, max = 100, message = "City must be 1-100 characters"))]
    pub city: Option<String>,
    #[validate(length(min = 1, max = 100, message = "State must be 1-100 characters"))]
    pub state: Option<String>,
    #[validate(length(min = 1, max = 20, message = "Postal code must be 1-20 characters"))]
    pub postal_code: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Country must be 1-100 characters"))]
    pub country: Option<String>,
    pub is_default: Option<bool>,
}

impl From<PatchAddressRequest> for AddressPatch {
    fn from(req: PatchAddressRequest) -> Self {
        Self {
            full_name: req.full_name,
            phone: req.phone,
            street: req.street,
            city: req.city,
            state: req.state,
            postal_code: req.postal_code,
            country: req.country,
            is_default: req.is_default,
        }
    }
}

/// Create address routes
pub fn address_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_addresses).post(create_address))
        .route(
            "/:id",
            get(get_address)
                .put(update_address)
                .patch(patch_address)
                .delete(delete_address),
        )
        .route("/:id/set-default", post(set_default_address))
}

/// List the caller's addresses
#[utoipa::path(
    get,
    path = "/addresses",
    tag = "Addresses",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Addresses, default first", body = Vec<Address>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_addresses(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> AppResult<Json<Vec<Address>>> {
    let addresses = state.address_service.list_addresses(caller).await?;
    Ok(Json(addresses))
}

/// Add an address
#[utoipa::path(
    post,
    path = "/addresses",
    tag = "Addresses",
    security(("bearer_auth" = [])),
    request_body = AddressRequest,
    responses(
        (status = 201, description = "Address created", body = Address),
        (status = 400, description = "Validation error")
    )
)]
pub async fn create_address(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ValidatedJson(payload): ValidatedJson<AddressRequest>,
) -> AppResult<Created<Address>> {
    let address = state
        .address_service
        .create_address(caller, payload.into())
        .await?;

    Ok(Created(address))
}

/// Get an address
#[utoipa::path(
    get,
    path = "/addresses/{id}",
    tag = "Addresses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Address ID")),
    responses(
        (status = 200, description = "Address found", body = Address),
        (status = 404, description = "Address not found")
    )
)]
pub async fn get_address(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Address>> {
    let address = state.address_service.get_address(caller, id).await?;
    Ok(Json(address))
}

/// Replace an address
#[utoipa::path(
    put,
    path = "/addresses/{id}",
    tag = "Addresses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Address ID")),
    request_body = AddressRequest,
    responses(
        (status = 200, description = "Address replaced", body = Address),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Address not found")
    )
)]
pub async fn update_address(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AddressRequest>,
) -> AppResult<Json<Address>> {
    let address = state
        .address_service
        .update_address(caller, id, payload.into())
        .await?;

    Ok(Json(address))
}

/// Change some fields of an address
#[utoipa::path(
    patch,
    path = "/addresses/{id}",
    tag = "Addresses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Address ID")),
    request_body = PatchAddressRequest,
    responses(
        (status = 200, description = "Address updated", body = Address),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Address not found")
    )
)]
pub async fn patch_address(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<PatchAddressRequest>,
) -> AppResult<Json<Address>> {
    let address = state
        .address_service
        .patch_address(caller, id, payload.into())
        .await?;

    Ok(Json(address))
}

/// Delete an address
#[utoipa::path(
    delete,
    path = "/addresses/{id}",
    tag = "Addresses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Address ID")),
    responses(
        (status = 204, description = "Address deleted"),
        (status = 404, description = "Address not found")
    )
)]
pub async fn delete_address(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.address_service.delete_address(caller, id).await?;
    Ok(NoContent)
}

/// Make an address the caller's default
#[utoipa::path(
    post,
    path = "/addresses/{id}/set-default",
    tag = "Addresses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Address ID")),
    responses(
        (status = 200, description = "Default address set", body = Address),
        (status = 404, description = "Address not found")
    )
)]
pub async fn set_default_address(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Address>> {
    let address = state.address_service.set_default(caller, id).await?;
    Ok(Json(address))
}
