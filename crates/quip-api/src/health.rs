use axum::{Json, extract::State};

use quip_types::api::HealthResponse;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        mock: state.store.is_mock(),
    })
}
