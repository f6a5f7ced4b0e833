mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::info;

use quip_api::AppStateInner;
use quip_db::{MemoryStore, MongoStore, Store};

use crate::config::{Config, StoreConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "quip=debug,quip_api=debug,quip_db=debug,tower_http=debug".into()
                }),
        )
        .init();

    // Missing store settings stop us here, before the listener is bound.
    let config = Config::from_env()?;

    info!(
        "Admin API key set? {}",
        if config.admin_key.is_some() { "yes" } else { "no" }
    );

    // The MongoDB connection itself is made on the first request.
    let store: Arc<dyn Store> = match config.store {
        StoreConfig::Mock => {
            info!("Using in-memory mock store");
            Arc::new(MemoryStore::new())
        }
        StoreConfig::Mongo(settings) => {
            info!("Using MongoDB database {}", settings.database);
            Arc::new(MongoStore::new(settings))
        }
    };

    let state = AppStateInner::new(store, config.admin_key);
    let app = quip_api::router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Quip server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
