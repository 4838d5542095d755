//! Error types for the card service.
//!
//! Request errors are rendered as bare status codes with an empty body:
//! callers of this endpoint are link-unfurl crawlers that only ever want an
//! image, so there is nothing useful to put in an error page.

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::store::StoreError;

/// Errors that abort a single card request.
#[derive(Debug, thiserror::Error)]
pub enum OgpError {
    /// The identifier did not resolve through one or both lookups.
    #[error("not found: {0}")]
    NotFound(String),

    /// The document store errored or timed out.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// Drawing or PNG encoding failed.
    #[error("render failed: {0}")]
    Render(String),
}

impl IntoResponse for OgpError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(msg) => {
                tracing::debug!(reason = %msg, "card content not found");
                StatusCode::NOT_FOUND
            }
            Self::StoreUnavailable(err) => {
                tracing::error!(error = %err, "document store unavailable");
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Render(msg) => {
                tracing::error!(error = %msg, "card render failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        status.into_response()
    }
}

/// Startup failures while loading the background template or the font.
///
/// These are fatal: the assets ship with the service, so a failure here means
/// the deployment is misconfigured.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// An asset file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The background template is not a decodable PNG.
    #[error("invalid background image: {0}")]
    Background(String),

    /// The background template has the wrong pixel size.
    #[error("background must be {expected_width}x{expected_height}, got {width}x{height}")]
    Dimensions {
        expected_width: u32,
        expected_height: u32,
        width: u32,
        height: u32,
    },

    /// The font file could not be parsed.
    #[error("invalid font: {0}")]
    Font(String),
}
