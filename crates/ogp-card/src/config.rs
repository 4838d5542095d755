//! Application configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080").
    pub bind_addr: String,

    /// Firestore REST base URL (or emulator URL).
    pub store_url: String,

    /// Firestore project ID.
    pub store_project: String,

    /// Optional bearer token for the store.
    pub store_token: Option<String>,

    /// Per-request timeout for store lookups.
    pub store_timeout: Duration,

    /// Path to the 600x315 background template PNG.
    pub background_path: PathBuf,

    /// Path to the card font (TTF/OTF).
    pub font_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `OGP_BIND_ADDR`: Server bind address (default: "0.0.0.0:8080")
    /// - `OGP_STORE_URL`: Store base URL (default: "https://firestore.googleapis.com/v1")
    /// - `OGP_STORE_PROJECT`: Project ID (default: "demo-project")
    /// - `OGP_STORE_TOKEN`: Bearer token sent with store requests
    /// - `OGP_STORE_TIMEOUT_MS`: Store request timeout (default: 3000)
    /// - `OGP_BACKGROUND_PATH`: Background PNG (default: "assets/ogp_background.png")
    /// - `OGP_FONT_PATH`: Font file (default: "assets/fonts/ipagp.ttf")
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("OGP_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let store_url = std::env::var("OGP_STORE_URL")
            .unwrap_or_else(|_| "https://firestore.googleapis.com/v1".to_string())
            .trim_end_matches('/')
            .to_string();

        let store_project =
            std::env::var("OGP_STORE_PROJECT").unwrap_or_else(|_| "demo-project".to_string());

        let store_token = std::env::var("OGP_STORE_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        let store_timeout = match std::env::var("OGP_STORE_TIMEOUT_MS") {
            Ok(raw) => {
                let ms: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("OGP_STORE_TIMEOUT_MS is not a number: {raw}"))?;
                anyhow::ensure!(ms > 0, "OGP_STORE_TIMEOUT_MS must be positive");
                Duration::from_millis(ms)
            }
            Err(_) => Duration::from_millis(3000),
        };

        let background_path = std::env::var("OGP_BACKGROUND_PATH")
            .unwrap_or_else(|_| "assets/ogp_background.png".to_string())
            .into();

        let font_path = std::env::var("OGP_FONT_PATH")
            .unwrap_or_else(|_| "assets/fonts/ipagp.ttf".to_string())
            .into();

        let config = Self {
            bind_addr,
            store_url,
            store_project,
            store_token,
            store_timeout,
            background_path,
            font_path,
        };

        tracing::info!(
            bind_addr = %config.bind_addr,
            store_url = %config.store_url,
            store_project = %config.store_project,
            store_auth = config.store_token.is_some(),
            store_timeout_ms = config.store_timeout.as_millis() as u64,
            background = %config.background_path.display(),
            font = %config.font_path.display(),
            "card configuration loaded"
        );

        Ok(config)
    }
}
