//! Request-body checks that run before a payload reaches the service layer.

use axum::async_trait;
use axum::extract::{rejection::JsonRejection, FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::JsonApiError;

/// `Json` extractor whose rejections render as the JSON error envelope.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Reject the body with 400 listing every field that is absent, null or blank.
pub fn require_fields(body: &Value, fields: &[&str]) -> Result<(), JsonApiError> {
    if !body.is_object() {
        return Err(JsonApiError::bad_request("Request body must be a JSON object"));
    }
    let missing: Vec<&str> = fields.iter().copied().filter(|f| is_missing(body.get(*f))).collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(JsonApiError::new(
            axum::http::StatusCode::BAD_REQUEST,
            "Missing Fields",
            Some(format!("Missing required fields: {}", missing.join(", "))),
        ))
    }
}

/// Deserialize a checked body into its typed input.
pub fn parse_body<T: DeserializeOwned>(body: Value) -> Result<T, JsonApiError> {
    serde_json::from_value(body).map_err(|e| JsonApiError::new(
        axum::http::StatusCode::BAD_REQUEST,
        "Validation Error",
        Some(e.to_string()),
    ))
}
