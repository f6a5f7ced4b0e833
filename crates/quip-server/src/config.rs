use quip_db::MongoSettings;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Store(#[from] quip_db::ConfigError),

    #[error("PORT must be a port number, got '{0}'")]
    InvalidPort(String),
}

#[derive(Debug)]
pub enum StoreConfig {
    /// In-memory store, selected by `MONGO_MOCK`.
    Mock,
    Mongo(MongoSettings),
}

#[derive(Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub admin_key: Option<String>,
    pub store: StoreConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mock = lookup("MONGO_MOCK").is_some_and(|v| matches!(v.trim(), "true" | "1"));
        let store = if mock {
            StoreConfig::Mock
        } else {
            StoreConfig::Mongo(MongoSettings::from_lookup(&lookup)?)
        };

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: lookup("QUIP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            admin_key: lookup("ADMIN_API_KEY").filter(|k| !k.is_empty()),
            store,
        })
    }
}
