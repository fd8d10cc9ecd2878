use axum::extract::{Path, State};
use serde_json::Value;
use service::product::domain::{ProductInput, ProductView};

use crate::errors::JsonApiError;
use crate::response::{self, join, ApiResult};
use crate::routes::auth::ServerState;
use crate::validation::{parse_body, require_fields, ApiJson};

#[utoipa::path(get, path = "/api/v1/products", tag = "products",
    responses((status = 200, description = "OK"), (status = 404, description = "No products found")))]
pub async fn list(State(state): State<ServerState>) -> ApiResult<Vec<ProductView>> {
    let rows = state.products.list().await?;
    if rows.is_empty() {
        return Err(JsonApiError::not_found("No products found"));
    }
    let message = format!(
        "Products with product {} and IDs {} retrieved",
        join(rows.iter().map(|p| p.product_name.as_str())),
        join(rows.iter().map(|p| p.id)),
    );
    response::ok(message, rows)
}

#[utoipa::path(get, path = "/api/v1/product/{id}", tag = "products",
    params(("id" = String, Path, description = "Product ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, Path(id): Path<String>) -> ApiResult<ProductView> {
    let p = state.products.get(&id).await?;
    response::ok(format!("Product {} with ID {} retrieved", p.product_name, p.id), p)
}

#[utoipa::path(post, path = "/api/v1/products", tag = "products", request_body = crate::openapi::ProductRequest,
    responses((status = 201, description = "Created"), (status = 400, description = "Validation Error")))]
pub async fn create(State(state): State<ServerState>, ApiJson(body): ApiJson<Value>) -> ApiResult<ProductView> {
    require_fields(&body, &["user", "product_name", "type", "class"])?;
    let input: ProductInput = parse_body(body)?;
    let p = state.products.create(input).await?;
    response::created(format!("Created new Product {} with an ID {}", p.product_name, p.id), p)
}

#[utoipa::path(patch, path = "/api/v1/product/edit/{id}", tag = "products", request_body = crate::openapi::ProductRequest,
    params(("id" = String, Path, description = "Product ID")),
    responses((status = 200, description = "Updated"), (status = 404, description = "Not Found")))]
pub async fn update(State(state): State<ServerState>, Path(id): Path<String>, ApiJson(body): ApiJson<Value>) -> ApiResult<ProductView> {
    let input: ProductInput = parse_body(body)?;
    let p = state.products.update(&id, input).await?;
    response::ok(format!("Product {} with ID {} is updated", p.product_name, p.id), p)
}

#[utoipa::path(delete, path = "/api/v1/product/{id}", tag = "products",
    params(("id" = String, Path, description = "Product ID")),
    responses((status = 200, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<String>) -> ApiResult<ProductView> {
    let p = state.products.delete(&id).await?;
    response::ok(format!("Product {} with ID {} is deleted", p.product_name, p.id), p)
}
