//! In-process store used when `MONGO_MOCK` is set, and by tests.
//!
//! Mirrors the MongoDB semantics the handlers depend on: upserts keyed on
//! `id`, `$push` that never creates, uniform random sampling over active
//! messages.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use bson::oid::ObjectId;
use rand::seq::IndexedRandom;

use quip_types::{MessageDoc, ResponseKind, User};

use crate::Store;

#[derive(Default)]
struct Collections {
    users: HashMap<String, User>,
    messages: Vec<MessageDoc>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message_count(&self) -> usize {
        self.read().map(|c| c.messages.len()).unwrap_or(0)
    }

    pub fn user_count(&self) -> usize {
        self.read().map(|c| c.users.len()).unwrap_or(0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Collections>> {
        self.inner
            .read()
            .map_err(|e| anyhow!("Store lock poisoned: {}", e))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Collections>> {
        self.inner
            .write()
            .map_err(|e| anyhow!("Store lock poisoned: {}", e))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user(&self, id: &str) -> Result<Option<User>> {
        Ok(self.read()?.users.get(id).cloned())
    }

    async fn upsert_user_response(&self, id: &str, response: &ResponseKind) -> Result<()> {
        self.write()?
            .users
            .entry(id.to_string())
            .and_modify(|user| user.response = response.clone())
            .or_insert_with(|| User::new(id, response.clone()));
        Ok(())
    }

    async fn append_messages_created(&self, user_id: &str, message_ids: &[String]) -> Result<bool> {
        let mut collections = self.write()?;
        let Some(user) = collections.users.get_mut(user_id) else {
            return Ok(false);
        };
        user.messages_created
            .get_or_insert_with(Vec::new)
            .extend_from_slice(message_ids);
        Ok(true)
    }

    async fn insert_messages(&self, docs: Vec<MessageDoc>) -> Result<usize> {
        let count = docs.len();
        self.write()?.messages.extend(docs);
        Ok(count)
    }

    async fn find_message(&self, id: ObjectId) -> Result<Option<MessageDoc>> {
        Ok(self.read()?.messages.iter().find(|m| m.id == id).cloned())
    }

    async fn find_messages(&self, ids: &[ObjectId]) -> Result<Vec<MessageDoc>> {
        Ok(self
            .read()?
            .messages
            .iter()
            .filter(|m| ids.contains(&m.id))
            .cloned()
            .collect())
    }

    async fn sample_message(
        &self,
        user_id: &str,
        category: Option<&str>,
    ) -> Result<Option<MessageDoc>> {
        let collections = self.read()?;
        let candidates: Vec<&MessageDoc> = collections
            .messages
            .iter()
            .filter(|m| m.user_id == user_id && m.active)
            .filter(|m| category.is_none_or(|c| m.category == c))
            .collect();

        Ok(candidates.choose(&mut rand::rng()).map(|m| (*m).clone()))
    }

    fn is_mock(&self) -> bool {
        true
    }
}
