//! Fixtures shared by unit tests.
//!
//! Rendering tests use DejaVu Sans Mono from `fixtures/fonts`, so they behave
//! the same on every machine regardless of installed fonts.

use std::sync::OnceLock;

use resvg::tiny_skia::{Color, Pixmap};

use crate::render::assets::{Assets, CARD_HEIGHT, CARD_WIDTH};

/// Bundled test font (DejaVu Sans Mono, see `DejaVuSansMono.LICENSE`).
pub const TEST_FONT: &[u8] = include_bytes!("../../../fixtures/fonts/DejaVuSansMono.ttf");

/// Solid light-gray PNG of the given size.
pub fn background_png(width: u32, height: u32) -> Vec<u8> {
    let mut pixmap = Pixmap::new(width, height).expect("non-zero size");
    pixmap.fill(Color::from_rgba8(250, 250, 250, 255));
    pixmap.encode_png().expect("encode test background")
}

/// Card assets built from [`background_png`] and [`TEST_FONT`].
pub fn assets() -> &'static Assets {
    static ASSETS: OnceLock<Assets> = OnceLock::new();
    ASSETS.get_or_init(|| {
        Assets::from_bytes(&background_png(CARD_WIDTH, CARD_HEIGHT), TEST_FONT.to_vec())
            .expect("bundled test assets load")
    })
}
