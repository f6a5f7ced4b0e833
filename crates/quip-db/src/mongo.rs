use anyhow::Result;
use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Document, doc};
use futures_util::TryStreamExt;
use mongodb::Collection;

use quip_types::{MessageDoc, ResponseKind, User};

use crate::Store;
use crate::connection::{ConnectionProvider, MongoSettings};

pub const USERS: &str = "users";
pub const MESSAGES: &str = "messages";

/// Only these fields ever leave the messages collection.
fn message_projection() -> Document {
    doc! { "_id": 1, "userId": 1, "category": 1, "text": 1, "active": 1, "weight": 1 }
}

/// `$match` stage for random selection. Documents without `active` count as active.
fn sample_filter(user_id: &str, category: Option<&str>) -> Document {
    let mut filter = doc! { "userId": user_id, "active": { "$ne": false } };
    if let Some(category) = category {
        filter.insert("category", category);
    }
    filter
}

pub struct MongoStore {
    provider: ConnectionProvider,
}

impl MongoStore {
    pub fn new(settings: MongoSettings) -> Self {
        Self {
            provider: ConnectionProvider::new(settings),
        }
    }

    async fn users(&self) -> Result<Collection<User>> {
        Ok(self.provider.acquire().await?.collection(USERS))
    }

    async fn messages(&self) -> Result<Collection<MessageDoc>> {
        Ok(self.provider.acquire().await?.collection(MESSAGES))
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn find_user(&self, id: &str) -> Result<Option<User>> {
        let user = self
            .users()
            .await?
            .find_one(doc! { "id": id })
            .projection(doc! { "_id": 0 })
            .await?;
        Ok(user)
    }

    async fn upsert_user_response(&self, id: &str, response: &ResponseKind) -> Result<()> {
        self.users()
            .await?
            .update_one(
                doc! { "id": id },
                doc! { "$set": { "id": id, "response": response.as_str() } },
            )
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn append_messages_created(&self, user_id: &str, message_ids: &[String]) -> Result<bool> {
        let result = self
            .users()
            .await?
            .update_one(
                doc! { "id": user_id },
                doc! { "$push": { "messagesCreated": { "$each": message_ids.to_vec() } } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn insert_messages(&self, docs: Vec<MessageDoc>) -> Result<usize> {
        let result = self.messages().await?.insert_many(&docs).await?;
        Ok(result.inserted_ids.len())
    }

    async fn find_message(&self, id: ObjectId) -> Result<Option<MessageDoc>> {
        let message = self
            .messages()
            .await?
            .find_one(doc! { "_id": id })
            .projection(message_projection())
            .await?;
        Ok(message)
    }

    async fn find_messages(&self, ids: &[ObjectId]) -> Result<Vec<MessageDoc>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let cursor = self
            .messages()
            .await?
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .projection(message_projection())
            .await?;
        let messages: Vec<MessageDoc> = cursor.try_collect().await?;
        Ok(messages)
    }

    async fn sample_message(
        &self,
        user_id: &str,
        category: Option<&str>,
    ) -> Result<Option<MessageDoc>> {
        let pipeline = vec![
            doc! { "$match": sample_filter(user_id, category) },
            doc! { "$sample": { "size": 1 } },
            doc! { "$project": message_projection() },
        ];

        let mut cursor = self.messages().await?.aggregate(pipeline).await?;
        match cursor.try_next().await? {
            Some(doc) => Ok(Some(bson::from_document(doc)?)),
            None => Ok(None),
        }
    }
}
