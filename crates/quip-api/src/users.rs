use axum::{Json, body::Bytes, extract::State, response::IntoResponse};
use bson::oid::ObjectId;
use tracing::{info, warn};

use quip_types::ResponseKind;
use quip_types::api::{MessageView, ProfileResponse, UpsertUserRequest, UpsertUserResponse};

use crate::error::{ApiError, ApiResult};
use crate::extract::UserId;
use crate::state::AppState;

/// GET /profile/{id}: a user and the messages it authored.
pub async fn get_profile(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .store
        .find_user(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let refs = user.messages_created.as_deref().unwrap_or_default();
    if refs.is_empty() {
        return Ok(Json(ProfileResponse {
            user,
            messages: vec![],
        }));
    }

    // A corrupt back-reference is skipped, not fatal.
    let ids: Vec<ObjectId> = refs
        .iter()
        .filter_map(|raw| match ObjectId::parse_str(raw) {
            Ok(oid) => Some(oid),
            Err(_) => {
                warn!("Skipping malformed message reference '{}' on user '{}'", raw, user.id);
                None
            }
        })
        .collect();

    let messages = state
        .store
        .find_messages(&ids)
        .await?
        .into_iter()
        .map(MessageView::from)
        .collect();

    Ok(Json(ProfileResponse { user, messages }))
}

/// PUT /admin/users/{id}: set a user's response kind, creating the user
/// if needed.
pub async fn upsert_user(
    State(state): State<AppState>,
    UserId(id): UserId,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let req: UpsertUserRequest = if body.is_empty() {
        UpsertUserRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|_| ApiError::invalid("Invalid JSON body"))?
    };

    let response = req
        .response
        .as_deref()
        .map(ResponseKind::from)
        .unwrap_or_default();
    if !response.is_known() {
        return Err(ApiError::invalid("Invalid response kind"));
    }

    state.store.upsert_user_response(&id, &response).await?;
    info!(user = %id, response = %response, "Upserted user");

    Ok(Json(UpsertUserResponse { id, response }))
}
