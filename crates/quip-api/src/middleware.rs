use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

pub const ADMIN_KEY_HEADER: &str = "x-api-key";

/// Reject admin requests whose `x-api-key` header does not equal the
/// configured secret. Runs before any path or body validation.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = req
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match (state.admin_key.as_deref(), provided) {
        (Some(expected), Some(provided)) if provided == expected => Ok(next.run(req).await),
        _ => Err(ApiError::Unauthorized),
    }
}
