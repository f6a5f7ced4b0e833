use std::time::Duration;

use anyhow::Result;
use bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::indexes;

/// Kept small: each process serves one invocation at a time.
const MAX_POOL_SIZE: u32 = 3;

/// A downed backend fails within this window instead of hanging.
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
}

/// Connection settings for the MongoDB store.
#[derive(Debug, Clone)]
pub struct MongoSettings {
    pub uri: String,
    pub database: String,
}

impl MongoSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read `MONGO_URI` and `DB_NAME` through `lookup`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        Ok(Self {
            uri: read("MONGO_URI")?,
            database: read("DB_NAME")?,
        })
    }
}

/// Process-wide database handle, created on first use and reused after.
///
/// Concurrent first callers share a single connection attempt. A failed
/// attempt leaves the provider empty so the next call tries again.
pub struct ConnectionProvider {
    settings: MongoSettings,
    db: OnceCell<Database>,
}

impl ConnectionProvider {
    pub fn new(settings: MongoSettings) -> Self {
        Self {
            settings,
            db: OnceCell::new(),
        }
    }

    pub async fn acquire(&self) -> Result<&Database> {
        self.db.get_or_try_init(|| connect(&self.settings)).await
    }

    pub fn is_connected(&self) -> bool {
        self.db.initialized()
    }
}

async fn connect(settings: &MongoSettings) -> Result<Database> {
    let mut options = ClientOptions::parse(&settings.uri).await?;
    options.max_pool_size = Some(MAX_POOL_SIZE);
    options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);
    options.app_name = Some("quip".to_string());

    let client = Client::with_options(options)?;
    let db = client.database(&settings.database);

    // The driver connects lazily; ping so an unreachable server fails here.
    db.run_command(doc! { "ping": 1 }).await?;

    if let Err(e) = indexes::ensure(&db).await {
        warn!("Failed to ensure indexes on {}: {:#}", settings.database, e);
    }

    info!("Connected to MongoDB database {}", settings.database);
    Ok(db)
}
