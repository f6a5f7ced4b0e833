pub mod connection;
pub mod indexes;
pub mod memory;
pub mod mongo;

use anyhow::Result;
use async_trait::async_trait;
use bson::oid::ObjectId;

use quip_types::{MessageDoc, ResponseKind, User};

pub use connection::{ConfigError, ConnectionProvider, MongoSettings};
pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Persistence seam for users and messages.
///
/// Every method is a single store round-trip. Nothing here is transactional:
/// callers combining several calls get best-effort consistency.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user(&self, id: &str) -> Result<Option<User>>;

    /// Set `id` and `response`, creating the user when absent. Other fields
    /// of an existing record are left alone.
    async fn upsert_user_response(&self, id: &str, response: &ResponseKind) -> Result<()>;

    /// Append to a user's `messagesCreated`. Never creates the user.
    /// Returns whether a user matched.
    async fn append_messages_created(&self, user_id: &str, message_ids: &[String]) -> Result<bool>;

    /// Insert documents whose ids were assigned by the caller.
    /// Returns the number inserted.
    async fn insert_messages(&self, docs: Vec<MessageDoc>) -> Result<usize>;

    async fn find_message(&self, id: ObjectId) -> Result<Option<MessageDoc>>;

    /// Batched lookup by id. Result order is unspecified.
    async fn find_messages(&self, ids: &[ObjectId]) -> Result<Vec<MessageDoc>>;

    /// One message drawn uniformly at random among the user's active
    /// messages, optionally restricted to a category.
    async fn sample_message(&self, user_id: &str, category: Option<&str>)
    -> Result<Option<MessageDoc>>;

    /// True for the in-memory store.
    fn is_mock(&self) -> bool {
        false
    }
}
