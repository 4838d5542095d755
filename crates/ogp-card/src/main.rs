//! ogp-card - HTTP server for social-preview card images.
//!
//! Serves PNG cards for answers and questions, designed to be placed behind
//! a CDN for edge caching.

use std::path::PathBuf;

use axum::http::Request;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use ogp_card::render::assets;
use ogp_card::store::{FirestoreStore, MemoryStore, Store};
use ogp_card::{AppState, Config, router};

/// ogp-card - social-preview card images.
#[derive(Parser, Debug)]
#[command(name = "ogp-card")]
#[command(about = "Social-preview card image server", long_about = None)]
struct Args {
    /// Path to .env file (optional).
    #[arg(long, env = "DOTENV_PATH", default_value = ".env")]
    dotenv: String,

    /// Serve documents from a JSON fixture file instead of Firestore.
    #[arg(long)]
    fixtures: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load .env file if it exists
    if std::path::Path::new(&args.dotenv).exists() {
        dotenvy::from_path(&args.dotenv)?;
        eprintln!("Loaded environment from {}", args.dotenv);
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let bind_addr = config.bind_addr.clone();

    // Register background and font before accepting traffic
    let assets = assets::init(&config.background_path, &config.font_path)?;

    // Pick the document store
    let store = match &args.fixtures {
        Some(path) => Store::Memory(MemoryStore::from_fixture_file(path)?),
        None => Store::Firestore(FirestoreStore::new(&config)?),
    };

    // Create application state
    let state = AppState::new(store, assets);

    // Build router with middleware
    let app = router(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::span!(
                    Level::INFO,
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "starting card server");

    axum::serve(listener, app).await?;

    Ok(())
}
