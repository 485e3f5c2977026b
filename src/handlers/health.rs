use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::app::AppState;

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.services.health_check().await;

    if health.is_healthy() {
        (StatusCode::OK, Json(json!({ "status": "ok", "version": crate::VERSION })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable", "issues": health.get_issues() })),
        )
    }
}
