use std::collections::HashMap;

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use bson::Bson;
use bson::oid::ObjectId;
use futures_util::future::join_all;
use tracing::{info, warn};

use quip_db::Store;
use quip_types::MessageDoc;
use quip_types::api::{InsertMessagesResponse, MessageBatch, MessageResponse};
use quip_types::models::{default_active, default_weight};

use crate::error::{ApiError, ApiResult};
use crate::extract::MessageId;
use crate::state::AppState;

/// GET /messages/{id}: direct lookup, inactive messages included.
pub async fn get_message(
    State(state): State<AppState>,
    MessageId(id): MessageId,
) -> ApiResult<impl IntoResponse> {
    let message = state
        .store
        .find_message(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Message not found"))?;

    Ok(Json(MessageResponse {
        message: message.into(),
    }))
}

/// POST /admin/messages: insert one message or a batch.
///
/// The batch is validated as a whole before anything is written. After the
/// insert, new ids are appended to each author's `messagesCreated`. That
/// second step is best-effort: authors that do not exist, or whose update
/// fails, are skipped and the insert still stands.
pub async fn insert_messages(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    if body.is_empty() {
        return Err(ApiError::invalid("Missing body"));
    }

    let payload: serde_json::Value =
        serde_json::from_slice(&body).map_err(|_| ApiError::invalid("Invalid JSON body"))?;
    let docs = normalize(payload)?;

    let inserted_ids: Vec<String> = docs.iter().map(|d| d.id.to_hex()).collect();
    let mut by_author: HashMap<String, Vec<String>> = HashMap::new();
    for doc in &docs {
        by_author
            .entry(doc.user_id.clone())
            .or_default()
            .push(doc.id.to_hex());
    }

    let inserted_count = state.store.insert_messages(docs).await?;
    let users_updated = link_authors(state.store.as_ref(), &by_author).await;

    info!(inserted_count, users_updated, "Inserted messages");

    Ok((
        StatusCode::CREATED,
        Json(InsertMessagesResponse {
            inserted_count,
            inserted_ids,
            users_updated,
        }),
    ))
}

fn fields_required() -> ApiError {
    ApiError::invalid("Fields required: userId, category, text")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn active_flag(raw: Option<Bson>) -> ApiResult<bool> {
    match raw {
        None => Ok(default_active()),
        Some(Bson::Boolean(active)) => Ok(active),
        Some(_) => Err(ApiError::invalid("active must be a boolean")),
    }
}

fn weight_value(raw: Option<Bson>) -> ApiResult<f64> {
    match raw {
        None => Ok(default_weight()),
        Some(Bson::Double(weight)) => Ok(weight),
        Some(Bson::Int32(weight)) => Ok(f64::from(weight)),
        Some(Bson::Int64(weight)) => Ok(weight as f64),
        Some(_) => Err(ApiError::invalid("weight must be a number")),
    }
}

/// Validate every element and assign ids. Any invalid element rejects the
/// whole batch.
fn normalize(payload: serde_json::Value) -> ApiResult<Vec<MessageDoc>> {
    let inputs = serde_json::from_value::<MessageBatch>(payload)
        .map_err(|_| fields_required())?
        .into_vec();

    if inputs.is_empty() {
        return Err(ApiError::invalid("At least one message is required"));
    }

    inputs
        .into_iter()
        .map(|input| {
            let (Some(user_id), Some(category), Some(text)) = (
                non_empty(input.user_id),
                non_empty(input.category),
                non_empty(input.text),
            ) else {
                return Err(fields_required());
            };

            Ok(MessageDoc {
                id: ObjectId::new(),
                user_id,
                message_id: input.message_id,
                category,
                text,
                active: active_flag(input.active)?,
                weight: weight_value(input.weight)?,
            })
        })
        .collect()
}

/// Append new ids to each author concurrently. Returns how many authors
/// matched an existing user.
async fn link_authors(store: &dyn Store, by_author: &HashMap<String, Vec<String>>) -> usize {
    let updates = by_author.iter().map(|(user_id, ids)| async move {
        match store.append_messages_created(user_id, ids).await {
            Ok(matched) => matched,
            Err(e) => {
                warn!("Failed to link messages to user '{}': {:#}", user_id, e);
                false
            }
        }
    });

    join_all(updates).await.into_iter().filter(|matched| *matched).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalize_applies_defaults() {
        let docs =
            normalize(json!({ "userId": "u1", "category": "quote", "text": "hi" })).unwrap();
        assert_eq!(docs.len(), 1);
        assert!(docs[0].active);
        assert_eq!(docs[0].weight, 1.0);
        assert!(docs[0].message_id.is_none());
    }

    #[test]
    fn normalize_keeps_explicit_values() {
        let docs = normalize(json!([{
            "userId": "u1",
            "category": "quote",
            "text": "hi",
            "active": false,
            "weight": 4,
            "messageId": "ext-7"
        }]))
        .unwrap();
        assert!(!docs[0].active);
        assert_eq!(docs[0].weight, 4.0);
        assert_eq!(docs[0].message_id, Some(Bson::String("ext-7".into())));
    }

    #[test]
    fn normalize_passes_through_non_string_message_id() {
        let docs = normalize(json!({
            "userId": "u1",
            "category": "quote",
            "text": "hi",
            "messageId": { "source": "import", "row": 12 }
        }))
        .unwrap();
        let Some(Bson::Document(meta)) = &docs[0].message_id else {
            panic!("expected embedded document, got {:?}", docs[0].message_id);
        };
        assert_eq!(meta.get_str("source").unwrap(), "import");
    }

    #[test]
    fn normalize_reports_mistyped_optional_fields() {
        let base = || json!({ "userId": "u1", "category": "quote", "text": "hi" });

        let mut body = base();
        body["weight"] = json!("3");
        assert_eq!(normalize(body).unwrap_err().to_string(), "weight must be a number");

        let mut body = base();
        body["active"] = json!("yes");
        assert_eq!(normalize(body).unwrap_err().to_string(), "active must be a boolean");
    }

    #[test]
    fn normalize_rejects_whole_batch() {
        let err = normalize(json!([
            { "userId": "u1", "category": "quote", "text": "ok" },
            { "userId": "u1", "category": "quote" }
        ]))
        .unwrap_err();
        assert_eq!(err.to_string(), "Fields required: userId, category, text");
    }

    #[test]
    fn normalize_rejects_empty_strings_and_non_objects() {
        assert!(normalize(json!({ "userId": "", "category": "c", "text": "t" })).is_err());
        assert!(normalize(json!([null])).is_err());
        assert!(normalize(json!(42)).is_err());
    }

    #[test]
    fn normalize_rejects_empty_batch() {
        let err = normalize(json!([])).unwrap_err();
        assert_eq!(err.to_string(), "At least one message is required");
    }

    #[test]
    fn normalize_assigns_distinct_ids() {
        let docs = normalize(json!([
            { "userId": "u1", "category": "c", "text": "a" },
            { "userId": "u1", "category": "c", "text": "b" }
        ]))
        .unwrap();
        assert_ne!(docs[0].id, docs[1].id);
    }
}
