//! HTTP application wiring
//!
//! Shared state, the router and graceful shutdown.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers::{assignments, health};
use crate::middleware::{cors_layer, logging};
use crate::services::ServiceFactory;

#[derive(Clone)]
pub struct AppState {
    pub services: ServiceFactory,
}

impl AppState {
    pub fn new(services: ServiceFactory) -> Self {
        Self { services }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/api/v1/secret-santa/generate",
            post(assignments::generate_assignments).options(assignments::preflight),
        )
        .route(
            "/api/v1/secret-santa/events/{event_id}/assignments",
            get(assignments::list_assignments).options(assignments::preflight),
        )
        .route(
            "/api/v1/secret-santa/events/{event_id}/my-assignment",
            get(assignments::my_assignment).options(assignments::preflight),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(logging::make_span)
                .on_request(logging::on_request)
                .on_response(logging::on_response)
                .on_failure(logging::on_failure),
        )
        .layer(cors_layer())
        .with_state(state)
}

/// Resolves on Ctrl-C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
