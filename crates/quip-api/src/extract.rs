//! Path extractors that validate ids before any store call.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use bson::oid::ObjectId;

use quip_types::models::MAX_ID_LEN;

use crate::error::ApiError;

/// Trim `raw` and accept it if non-empty and at most `MAX_ID_LEN` UTF-16
/// code units long, so a character outside the BMP counts twice.
pub fn validate_id(raw: &str) -> Option<&str> {
    let id = raw.trim();
    (!id.is_empty() && id.encode_utf16().count() <= MAX_ID_LEN).then_some(id)
}

/// A validated user id from the path.
pub struct UserId(pub String);

impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let invalid = || ApiError::invalid("Invalid or missing 'id'");

        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| invalid())?;

        let id = validate_id(&raw).ok_or_else(invalid)?;
        Ok(Self(id.to_string()))
    }
}

/// A message id from the path, parsed into the store's id format.
pub struct MessageId(pub ObjectId);

impl<S> FromRequestParts<S> for MessageId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let invalid = || ApiError::invalid("Invalid or missing message 'id'");

        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| invalid())?;

        let id = validate_id(&raw).ok_or_else(invalid)?;
        let oid =
            ObjectId::parse_str(id).map_err(|_| ApiError::invalid("Invalid ObjectId format"))?;
        Ok(Self(oid))
    }
}

/// Handler for routes whose id segment is empty, e.g. `/profile/`.
pub async fn missing_user_id() -> ApiError {
    ApiError::invalid("Invalid or missing 'id'")
}

pub async fn missing_message_id() -> ApiError {
    ApiError::invalid("Invalid or missing message 'id'")
}
