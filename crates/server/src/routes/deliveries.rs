use axum::extract::{Path, State};
use serde_json::Value;
use service::delivery::domain::{DeliveryInput, DeliveryView};

use crate::errors::JsonApiError;
use crate::response::{self, join, ApiResult};
use crate::routes::auth::ServerState;
use crate::validation::{parse_body, require_fields, ApiJson};

const REQUIRED: &[&str] = &["company_name", "date", "price", "quantity"];

#[utoipa::path(get, path = "/api/v1/deliveries", tag = "deliveries",
    responses((status = 200, description = "OK"), (status = 404, description = "No deliveries found")))]
pub async fn list(State(state): State<ServerState>) -> ApiResult<Vec<DeliveryView>> {
    let rows = state.deliveries.list().await?;
    if rows.is_empty() {
        return Err(JsonApiError::not_found("No deliveries found"));
    }
    let message = format!(
        "Deliveries with delivery {} and IDs {} retrieved",
        join(rows.iter().map(|d| d.company_name.as_str())),
        join(rows.iter().map(|d| d.id)),
    );
    response::ok(message, rows)
}

#[utoipa::path(get, path = "/api/v1/delivery/{id}", tag = "deliveries",
    params(("id" = String, Path, description = "Delivery ID")),
    responses((status = 200, description = "OK"), (status = 400, description = "Invalid ID"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, Path(id): Path<String>) -> ApiResult<DeliveryView> {
    let d = state.deliveries.get(&id).await?;
    response::ok(format!("Delivery {} with ID {} retrieved", d.company_name, d.id), d)
}

#[utoipa::path(post, path = "/api/v1/deliveries", tag = "deliveries", request_body = crate::openapi::DeliveryRequest,
    responses((status = 201, description = "Created"), (status = 400, description = "Validation Error"), (status = 409, description = "Duplicate company name")))]
pub async fn create(State(state): State<ServerState>, ApiJson(body): ApiJson<Value>) -> ApiResult<DeliveryView> {
    require_fields(&body, REQUIRED)?;
    let input: DeliveryInput = parse_body(body)?;
    let d = state.deliveries.create(input).await?;
    response::created(format!("Created new Delivery {} with an ID {}", d.company_name, d.id), d)
}

#[utoipa::path(patch, path = "/api/v1/delivery/edit/{id}", tag = "deliveries", request_body = crate::openapi::DeliveryRequest,
    params(("id" = String, Path, description = "Delivery ID")),
    responses((status = 200, description = "Updated"), (status = 404, description = "Not Found"), (status = 409, description = "Duplicate company name")))]
pub async fn update(State(state): State<ServerState>, Path(id): Path<String>, ApiJson(body): ApiJson<Value>) -> ApiResult<DeliveryView> {
    require_fields(&body, REQUIRED)?;
    let input: DeliveryInput = parse_body(body)?;
    let d = state.deliveries.update(&id, input).await?;
    response::ok(format!("Delivery {} with ID {} is updated", d.company_name, d.id), d)
}

#[utoipa::path(delete, path = "/api/v1/delivery/{id}", tag = "deliveries",
    params(("id" = String, Path, description = "Delivery ID")),
    responses((status = 200, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<String>) -> ApiResult<DeliveryView> {
    let d = state.deliveries.delete(&id).await?;
    response::ok(format!("Delivery {} with ID {} is deleted", d.company_name, d.id), d)
}
