use bson::Bson;
use serde::{Deserialize, Serialize};

use crate::models::{MessageDoc, ResponseKind, User};

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// -- Messages --

/// One element of a `POST /admin/messages` payload, before validation.
///
/// The optional fields stay loosely typed here; `active` and `weight` are
/// checked by the handler, `messageId` is kept as sent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageInput {
    pub user_id: Option<String>,
    pub message_id: Option<Bson>,
    pub category: Option<String>,
    pub text: Option<String>,
    pub active: Option<Bson>,
    pub weight: Option<Bson>,
}

/// The insert endpoint takes a single object or an array of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MessageBatch {
    Many(Vec<MessageInput>),
    One(MessageInput),
}

impl MessageBatch {
    pub fn into_vec(self) -> Vec<MessageInput> {
        match self {
            MessageBatch::Many(inputs) => inputs,
            MessageBatch::One(input) => vec![input],
        }
    }
}

/// Public projection of a message: the six known fields, id as hex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub category: String,
    pub text: String,
    pub active: bool,
    pub weight: f64,
}

impl From<MessageDoc> for MessageView {
    fn from(doc: MessageDoc) -> Self {
        Self {
            id: doc.id.to_hex(),
            user_id: doc.user_id,
            category: doc.category,
            text: doc.text,
            active: doc.active,
            weight: doc.weight,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: MessageView,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertMessagesResponse {
    pub inserted_count: usize,
    pub inserted_ids: Vec<String>,
    pub users_updated: usize,
}

// -- Users --

#[derive(Debug, Default, Deserialize)]
pub struct UpsertUserRequest {
    pub response: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpsertUserResponse {
    pub id: String,
    pub response: ResponseKind,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: User,
    pub messages: Vec<MessageView>,
}

// -- Health --

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub mock: bool,
}
