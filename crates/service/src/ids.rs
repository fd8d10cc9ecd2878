use uuid::Uuid;

use crate::errors::ServiceError;

/// Parse a path identifier, rejecting anything that is not a UUID.
pub fn parse_id(raw: &str, resource: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ServiceError::InvalidId(format!("Invalid {} ID: {}", resource, raw)))
}
