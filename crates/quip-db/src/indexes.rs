use anyhow::Result;
use bson::{Document, doc};
use mongodb::options::IndexOptions;
use mongodb::{Database, IndexModel};
use tracing::info;

use crate::mongo::{MESSAGES, USERS};

/// Create the indexes the handlers rely on. Idempotent.
pub async fn ensure(db: &Database) -> Result<()> {
    // Upserts key on `id`; a unique index keeps it a single record.
    let user_id = IndexModel::builder()
        .keys(doc! { "id": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build();
    db.collection::<Document>(USERS).create_index(user_id).await?;

    // Random selection matches on userId and, optionally, category.
    let by_owner = IndexModel::builder()
        .keys(doc! { "userId": 1, "category": 1 })
        .build();
    db.collection::<Document>(MESSAGES).create_index(by_owner).await?;

    info!("MongoDB indexes ensured");
    Ok(())
}
