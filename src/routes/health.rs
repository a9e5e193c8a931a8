use axum::{extract::State, routing::get, Json, Router};

use crate::{routes::structs::HealthResponse, state::AppState};

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = if state.store.is_connected().await {
        "connected"
    } else {
        "idle"
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        service: "gdg-chapter-api".to_string(),
        database: database.to_string(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
