//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::render::assets::Assets;
use crate::store::Store;

/// Shared application state available to all request handlers.
///
/// Nothing here is mutated by requests: each render works on its own canvas.
#[derive(Clone)]
pub struct AppState {
    /// Document store the resolver reads from.
    pub store: Arc<Store>,

    /// Background and font, registered once at startup.
    pub assets: &'static Assets,
}

impl AppState {
    pub fn new(store: Store, assets: &'static Assets) -> Self {
        tracing::info!(
            store = store.backend(),
            font = %assets.family(),
            "application state initialized"
        );

        Self {
            store: Arc::new(store),
            assets,
        }
    }
}
