use std::sync::Arc;

use quip_db::Store;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Arc<dyn Store>,
    /// Admin secret. When unset every admin route answers 401.
    pub admin_key: Option<String>,
}

impl AppStateInner {
    pub fn new(store: Arc<dyn Store>, admin_key: Option<String>) -> AppState {
        Arc::new(Self { store, admin_key })
    }
}
