//! Background template and font, loaded once per process.
//!
//! [`init`] is called from `main` before the server starts. It is safe to
//! call more than once and from several threads: the first successful call
//! loads and registers the assets, later calls return the same instance.

use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use resvg::tiny_skia::Pixmap;
use resvg::usvg::fontdb;

use crate::error::AssetError;

/// Card width in pixels.
pub const CARD_WIDTH: u32 = 600;

/// Card height in pixels.
pub const CARD_HEIGHT: u32 = 315;

/// Logical name the card font is known by in logs and configuration.
pub const FONT_ALIAS: &str = "ipagp";

static ASSETS: OnceLock<Assets> = OnceLock::new();
static INIT_LOCK: Mutex<()> = Mutex::new(());

/// Decoded background plus the registered card font.
pub struct Assets {
    background: Pixmap,
    font_data: Vec<u8>,
    fontdb: Arc<fontdb::Database>,
    family: String,
}

impl std::fmt::Debug for Assets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assets")
            .field("width", &self.background.width())
            .field("height", &self.background.height())
            .field("font_bytes", &self.font_data.len())
            .field("family", &self.family)
            .finish()
    }
}

impl Assets {
    /// Read and validate both asset files.
    pub fn load(background_path: &Path, font_path: &Path) -> Result<Self, AssetError> {
        let background = read(background_path)?;
        let font = read(font_path)?;
        Self::from_bytes(&background, font)
    }

    /// Validate in-memory assets: a `CARD_WIDTH`x`CARD_HEIGHT` PNG and a
    /// TTF/OTF font.
    pub fn from_bytes(background_png: &[u8], font_data: Vec<u8>) -> Result<Self, AssetError> {
        let background = Pixmap::decode_png(background_png)
            .map_err(|e| AssetError::Background(e.to_string()))?;

        if background.width() != CARD_WIDTH || background.height() != CARD_HEIGHT {
            return Err(AssetError::Dimensions {
                expected_width: CARD_WIDTH,
                expected_height: CARD_HEIGHT,
                width: background.width(),
                height: background.height(),
            });
        }

        ttf_parser::Face::parse(&font_data, 0).map_err(|e| AssetError::Font(e.to_string()))?;

        let mut db = fontdb::Database::new();
        db.load_font_data(font_data.clone());

        let family = db
            .faces()
            .next()
            .and_then(|face| face.families.first())
            .map(|(name, _)| name.clone())
            .ok_or_else(|| AssetError::Font("font has no family name".to_string()))?;

        Ok(Self {
            background,
            font_data,
            fontdb: Arc::new(db),
            family,
        })
    }

    /// The decoded background. Each render paints onto its own copy.
    pub fn background(&self) -> &Pixmap {
        &self.background
    }

    /// Raw font file bytes, for glyph metrics.
    pub fn font_data(&self) -> &[u8] {
        &self.font_data
    }

    /// Font database holding only the card font.
    pub fn fontdb(&self) -> Arc<fontdb::Database> {
        Arc::clone(&self.fontdb)
    }

    /// Family name the font registered under.
    pub fn family(&self) -> &str {
        &self.family
    }
}

fn read(path: &Path) -> Result<Vec<u8>, AssetError> {
    std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and register the process-wide assets, once.
pub fn init(background_path: &Path, font_path: &Path) -> Result<&'static Assets, AssetError> {
    if let Some(assets) = ASSETS.get() {
        return Ok(assets);
    }

    let _guard = INIT_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(assets) = ASSETS.get() {
        return Ok(assets);
    }

    let assets = Assets::load(background_path, font_path)?;
    tracing::info!(
        background = %background_path.display(),
        font = %font_path.display(),
        alias = FONT_ALIAS,
        family = %assets.family,
        "card assets registered"
    );

    Ok(ASSETS.get_or_init(|| assets))
}
