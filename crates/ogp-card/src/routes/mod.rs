//! Route definitions for the card service.
//!
//! ## Routes
//!
//! - `GET /health` - Health check (JSON)
//! - `GET /robots.txt` - Crawler instructions
//! - `GET /api/{resource}/{id}/ogp` - Card image (PNG)

mod health;
mod ogp;

use axum::Router;
use axum::response::IntoResponse;
use axum::routing::get;

use crate::state::AppState;

/// Build the complete card service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/robots.txt", get(robots_txt))
        .route("/api/{resource}/{id}/ogp", get(ogp::ogp_image_handler))
        .with_state(state)
}

/// Serve robots.txt allowing all crawlers.
///
/// Link-unfurl bots must be able to fetch the card images.
async fn robots_txt() -> impl IntoResponse {
    (
        [("content-type", "text/plain; charset=utf-8")],
        "User-agent: *\nAllow: /\n",
    )
}
