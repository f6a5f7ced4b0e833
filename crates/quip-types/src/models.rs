use std::fmt;

use bson::Bson;
use bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Longest user or message id accepted on any path, after trimming.
pub const MAX_ID_LEN: usize = 128;

/// How `GET /{id}` answers for a user.
///
/// Stored as a plain string, so anything can come back from the database.
/// Values outside the known set parse into `Unknown` and keep the raw
/// text for error reporting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResponseKind {
    #[default]
    Default,
    Static,
    Redirect,
    Json,
    Unknown(String),
}

impl ResponseKind {
    pub fn as_str(&self) -> &str {
        match self {
            ResponseKind::Default => "default",
            ResponseKind::Static => "static",
            ResponseKind::Redirect => "redirect",
            ResponseKind::Json => "json",
            ResponseKind::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ResponseKind::Unknown(_))
    }
}

impl From<&str> for ResponseKind {
    fn from(raw: &str) -> Self {
        match raw {
            "default" => ResponseKind::Default,
            "static" => ResponseKind::Static,
            "redirect" => ResponseKind::Redirect,
            "json" => ResponseKind::Json,
            other => ResponseKind::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ResponseKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// A null in storage means the same as a missing field.
impl<'de> Deserialize<'de> for ResponseKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(ResponseKind::from).unwrap_or_default())
    }
}

/// A user record from the `users` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub response: ResponseKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Hex ids of messages inserted for this user. Append-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages_created: Option<Vec<String>>,
}

impl User {
    pub fn new(id: impl Into<String>, response: ResponseKind) -> Self {
        Self {
            id: id.into(),
            response,
            name: None,
            messages_created: None,
        }
    }
}

/// A message document from the `messages` collection.
///
/// `weight` is persisted but selection is uniform; nothing reads it yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: String,
    /// Client-supplied correlation id, stored as sent whatever its type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<Bson>,
    pub category: String,
    pub text: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

pub fn default_active() -> bool {
    true
}

pub fn default_weight() -> f64 {
    1.0
}
