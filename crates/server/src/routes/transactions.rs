use axum::extract::{Path, State};
use serde_json::Value;
use service::transaction::domain::{TransactionInput, TransactionView};

use crate::errors::JsonApiError;
use crate::response::{self, join, ApiResult};
use crate::routes::auth::ServerState;
use crate::validation::{parse_body, require_fields, ApiJson};

#[utoipa::path(get, path = "/api/v1/transactions", tag = "transactions",
    responses((status = 200, description = "OK"), (status = 404, description = "No transactions found")))]
pub async fn list(State(state): State<ServerState>) -> ApiResult<Vec<TransactionView>> {
    let rows = state.transactions.list().await?;
    if rows.is_empty() {
        return Err(JsonApiError::not_found("No transactions found"));
    }
    let message = format!(
        "Transactions with transaction {} and IDs {} retrieved",
        join(rows.iter().map(TransactionView::user_name)),
        join(rows.iter().map(|t| t.id)),
    );
    response::ok(message, rows)
}

#[utoipa::path(get, path = "/api/v1/transaction/{id}", tag = "transactions",
    params(("id" = String, Path, description = "Transaction ID")),
    responses((status = 200, description = "OK"), (status = 400, description = "Invalid ID"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, Path(id): Path<String>) -> ApiResult<TransactionView> {
    let t = state.transactions.get(&id).await?;
    response::ok(format!("Transaction of {} is {}", t.user_name(), t.status.as_str()), t)
}

#[utoipa::path(post, path = "/api/v1/transactions", tag = "transactions", request_body = crate::openapi::TransactionRequest,
    responses((status = 201, description = "Created"), (status = 400, description = "Validation Error"), (status = 404, description = "User not found")))]
pub async fn create(State(state): State<ServerState>, ApiJson(body): ApiJson<Value>) -> ApiResult<TransactionView> {
    require_fields(&body, &["user", "product", "date"])?;
    let input: TransactionInput = parse_body(body)?;
    let t = state.transactions.create(input).await?;
    response::created(format!("Transaction of {} with ID {} is created", t.user_name(), t.id), t)
}

#[utoipa::path(patch, path = "/api/v1/transaction/edit/{id}", tag = "transactions", request_body = crate::openapi::TransactionRequest,
    params(("id" = String, Path, description = "Transaction ID")),
    responses((status = 200, description = "Updated"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found")))]
pub async fn update(State(state): State<ServerState>, Path(id): Path<String>, ApiJson(body): ApiJson<Value>) -> ApiResult<TransactionView> {
    require_fields(&body, &["status", "date"])?;
    let input: TransactionInput = parse_body(body)?;
    let t = state.transactions.update(&id, input).await?;
    response::ok(format!("Transaction on {} with ID {} is updated", t.date.to_rfc3339(), t.id), t)
}

#[utoipa::path(delete, path = "/api/v1/transaction/{id}", tag = "transactions",
    params(("id" = String, Path, description = "Transaction ID")),
    responses((status = 200, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<String>) -> ApiResult<TransactionView> {
    let t = state.transactions.delete(&id).await?;
    response::ok(format!("Transaction on {} with ID {} is deleted", t.date.to_rfc3339(), t.id), t)
}
