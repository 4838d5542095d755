//! Card image endpoint.
//!
//! `GET /api/{resource}/{id}/ogp` resolves the identifier, lays out the text
//! and answers with the PNG. Resolution failures return an empty error
//! response before any canvas is created.

use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::error::OgpError;
use crate::render::assets::Assets;
use crate::render::{self, RenderedImage};
use crate::resolve::{self, Resource, TextContent};
use crate::state::AppState;

/// Handle a request for a card image.
///
/// Route: `GET /api/{resource}/{id}/ogp`
pub async fn ogp_image_handler(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<Response, OgpError> {
    card_response(&state, &resource, &id, |assets, content| {
        render::render_card(assets, &content)
    })
    .await
}

/// Resolve, then hand the content to `render` on the blocking pool.
///
/// `render` only runs once resolution has succeeded.
async fn card_response<R>(
    state: &AppState,
    resource: &str,
    id: &str,
    render: R,
) -> Result<Response, OgpError>
where
    R: FnOnce(&'static Assets, TextContent) -> Result<RenderedImage, OgpError> + Send + 'static,
{
    let resource = Resource::from_segment(resource)
        .ok_or_else(|| OgpError::NotFound(format!("no cards for resource '{resource}'")))?;

    tracing::debug!(resource = ?resource, id = %id, "resolving card content");
    let content = resolve::resolve(state.store.as_ref(), resource, id).await?;

    let assets = state.assets;
    let image = tokio::task::spawn_blocking(move || render(assets, content))
        .await
        .map_err(|e| OgpError::Render(format!("render task failed: {e}")))??;

    tracing::debug!(id = %id, bytes = image.bytes.len(), "card rendered");

    Ok(png_response(image))
}

/// Build an HTTP response with PNG content, explicit length and cache headers.
fn png_response(image: RenderedImage) -> Response {
    let headers = [
        (
            header::CONTENT_TYPE,
            HeaderValue::from_static(RenderedImage::CONTENT_TYPE),
        ),
        (header::CONTENT_LENGTH, HeaderValue::from(image.bytes.len())),
        (
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=3600, s-maxage=86400"),
        ),
    ];

    (StatusCode::OK, headers, image.bytes).into_response()
}
