use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::errors::JsonApiError;

/// Success envelope: `{ success: true, message, data }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), JsonApiError>;

fn envelope<T: Serialize>(status: StatusCode, message: String, data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (status, Json(ApiResponse { success: true, message, data }))
}

pub fn ok<T: Serialize>(message: impl Into<String>, data: T) -> ApiResult<T> {
    Ok(envelope(StatusCode::OK, message.into(), data))
}

pub fn created<T: Serialize>(message: impl Into<String>, data: T) -> ApiResult<T> {
    Ok(envelope(StatusCode::CREATED, message.into(), data))
}

/// `a, b, c` for list messages.
pub fn join<I, D>(items: I) -> String
where
    I: IntoIterator<Item = D>,
    D: std::fmt::Display,
{
    items.into_iter().map(|i| i.to_string()).collect::<Vec<_>>().join(", ")
}
