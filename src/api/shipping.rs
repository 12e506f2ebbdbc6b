//! Shipping method API endpoints.

use axum::extract::{Path, State};

use super::{created, max_len, non_negative, require, success, ApiJson, ApiResult};
use crate::models::{
    CreateShippingMethodRequest, ShippingMethod, UpdateShippingMethodRequest, MAX_NAME_LEN,
};
use crate::AppState;

/// GET /api/shipping - List shipping methods, cheapest first.
pub async fn list_shipping_methods(State(state): State<AppState>) -> ApiResult<Vec<ShippingMethod>> {
    success(state.repo.list_shipping_methods().await?)
}

/// POST /api/shipping - Create a shipping method.
pub async fn create_shipping_method(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateShippingMethodRequest>,
) -> ApiResult<ShippingMethod> {
    require(&request.name, "Please provide a method name")?;
    max_len(&request.name, MAX_NAME_LEN, "Name")?;
    require(&request.delivery_time, "Please provide estimated delivery time")?;
    non_negative(request.price, "Price")?;

    let method = state.repo.create_shipping_method(&request).await?;
    tracing::info!(method_id = %method.id, name = %method.name, "Shipping method created");
    created(method)
}

/// PATCH /api/shipping/:id - Partially update a shipping method.
pub async fn update_shipping_method(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateShippingMethodRequest>,
) -> ApiResult<ShippingMethod> {
    if let Some(name) = &request.name {
        require(name, "Please provide a method name")?;
        max_len(name, MAX_NAME_LEN, "Name")?;
    }
    if let Some(delivery_time) = &request.delivery_time {
        require(delivery_time, "Please provide estimated delivery time")?;
    }
    if let Some(price) = request.price {
        non_negative(price, "Price")?;
    }

    success(state.repo.update_shipping_method(&id, &request).await?)
}

/// DELETE /api/shipping/:id - Delete a shipping method.
pub async fn delete_shipping_method(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<serde_json::Value> {
    state.repo.delete_shipping_method(&id).await?;
    tracing::info!(method_id = %id, "Shipping method deleted");
    success(serde_json::json!({}))
}
