//! ogp-card - social-preview images for short user-submitted text.
//!
//! This crate serves link-unfurl (Open Graph) card images: a fixed 600x315
//! background with the question text wrapped and centered on top. It is
//! designed to be placed behind a CDN, like any other image endpoint.
//!
//! # Architecture
//!
//! - **Store**: Reads `answers` and `questions` documents (Firestore REST or in-memory)
//! - **Resolve**: Maps `{resource}/{id}` to the card text through the store
//! - **Layout**: Greedy per-character line breaking by measured width, anchored centering
//! - **Render**: Composes lines over the background with resvg and encodes a PNG
//!
//! # URL Pattern
//!
//! ```text
//! GET /api/{resource}/{id}/ogp
//! ```
//!
//! Supported resources:
//! - `answers` - Card shows the question the answer replies to
//! - `questions` - Card shows the question itself

pub mod config;
pub mod error;
pub mod layout;
pub mod render;
pub mod resolve;
pub mod routes;
pub mod state;
pub mod store;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use routes::router;
pub use state::AppState;
