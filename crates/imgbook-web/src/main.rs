//! imgbook Web - upload images, view them, export them as a PDF.

mod helpers;
mod routes;
mod state;
mod templates;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use clap::Parser;
use imgbook_core::AppConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tower_sessions::{MemoryStore, SessionManagerLayer};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "imgbook-web")]
#[command(author, version, about = "imgbook Web Server", long_about = None)]
struct Args {
    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind to
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Config file path (defaults to the XDG config dir, then ./config.toml)
    #[arg(long, env = "IMGBOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Image store directory (overrides config)
    #[arg(long, env = "IMGBOOK_IMAGE_DIR")]
    image_dir: Option<PathBuf>,

    /// PDF store directory (overrides config)
    #[arg(long, env = "IMGBOOK_PDF_DIR")]
    pdf_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let default_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AppConfig::load(),
    };
    if let Some(dir) = args.image_dir {
        config.image_dir = dir;
    }
    if let Some(dir) = args.pdf_dir {
        config.pdf_dir = dir;
    }

    // Create application state (creates the image directory - fails fast)
    let state =
        Arc::new(AppState::new(&config).context("Failed to initialize application state")?);

    // Cookie-backed sessions; each client's image list lives under one key
    let session_layer = SessionManagerLayer::new(MemoryStore::default()).with_secure(false);

    let app = Router::new()
        // Pages
        .route("/", get(routes::index))
        // Upload / export / reset pipeline
        .route("/upload", post(routes::upload_images))
        .route("/pdf", post(routes::export_pdf))
        .route("/pdf/{name}", get(routes::download_pdf))
        .route("/new", get(routes::reset))
        // Uploaded images for the gallery view
        .nest_service("/images", ServeDir::new(state.images.dir().to_path_buf()))
        // Middleware
        .layer(session_layer)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
