//! HTTP surface: handlers, admin-key middleware and the router.

pub mod entry;
pub mod error;
pub mod extract;
pub mod health;
pub mod messages;
pub mod middleware;
pub mod state;
pub mod users;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::cors::CorsLayer;

pub use error::{ApiError, ApiResult};
pub use state::{AppState, AppStateInner};

/// Build the full route table. Admin routes sit behind `require_admin`;
/// every response carries permissive CORS headers.
pub fn router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/admin/messages", post(messages::insert_messages))
        .route("/admin/users/{id}", put(users::upsert_user))
        .route("/admin/users/", put(extract::missing_user_id))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_admin,
        ));

    let public_routes = Router::new()
        .route("/health", get(health::health))
        .route("/messages/{id}", get(messages::get_message))
        .route("/messages/", get(extract::missing_message_id))
        .route("/profile/{id}", get(users::get_profile))
        .route("/profile/", get(extract::missing_user_id))
        .route("/{id}", get(entry::get_entry))
        .route("/", get(extract::missing_user_id));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
