use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::header,
    response::{IntoResponse, Response},
};
use tracing::debug;

use quip_types::ResponseKind;
use quip_types::api::MessageResponse;

use crate::error::{ApiError, ApiResult};
use crate::extract::UserId;
use crate::state::AppState;

/// Pick the `category` filter out of the query string. A repeated key
/// keeps its last value; blank means no filter.
fn category_filter(pairs: Vec<(String, String)>) -> Option<String> {
    pairs
        .into_iter()
        .rev()
        .find(|(key, _)| key == "category")
        .map(|(_, value)| value.trim().to_string())
        .filter(|c| !c.is_empty())
}

/// GET /{id}: resolve a user's entry according to its response kind.
///
/// For `default` users this draws one active message at random, so the
/// response is marked `no-store`.
pub async fn get_entry(
    State(state): State<AppState>,
    UserId(id): UserId,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(pairs) = query.map_err(|_| ApiError::invalid("Invalid query string"))?;
    let category = category_filter(pairs);

    let user = state
        .store
        .find_user(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    match &user.response {
        ResponseKind::Default => {
            let message = state
                .store
                .sample_message(&user.id, category.as_deref())
                .await?
                .ok_or_else(|| ApiError::not_found("No active messages for this user"))?;

            debug!(user = %user.id, category = ?category, message = %message.id, "Serving entry");

            Ok((
                [(header::CACHE_CONTROL, "no-store")],
                Json(MessageResponse {
                    message: message.into(),
                }),
            )
                .into_response())
        }
        ResponseKind::Static => Err(ApiError::NotImplemented(
            "static not implemented yet".to_string(),
        )),
        kind @ (ResponseKind::Redirect | ResponseKind::Json | ResponseKind::Unknown(_)) => Err(
            ApiError::NotImplemented(format!("Response type not implemented: {}", kind)),
        ),
    }
}
