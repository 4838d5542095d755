//! Health check endpoint.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    /// Which document store backs the resolver.
    store: &'static str,
    /// Family name of the registered card font.
    font: String,
}

/// Public health check endpoint.
///
/// Assets are registered before the server binds, so reaching this handler
/// means the service can render.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "ogp-card",
        version: env!("CARGO_PKG_VERSION"),
        store: state.store.backend(),
        font: state.assets.family().to_string(),
    })
}
