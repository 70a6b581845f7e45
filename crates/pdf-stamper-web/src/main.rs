//! PDF Stamper Web - Upload page that merges two PDFs and labels the second.

mod helpers;
mod routes;
mod state;
mod templates;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use clap::Parser;
use pdf_stamper_core::AppConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter, prelude::*};

use state::AppState;

/// Upload limit for both files together
const BODY_LIMIT: usize = 100 * 1024 * 1024;

#[derive(Parser, Debug)]
#[command(name = "pdf-stamper-web")]
#[command(author, version, about = "PDF Stamper Web Server", long_about = None)]
struct Args {
    /// Host to bind to
    #[arg(long, env = "PDF_STAMPER_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to bind to
    #[arg(short, long, env = "PDF_STAMPER_PORT", default_value = "3000")]
    port: u16,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Build the application router.
fn app(state: Arc<AppState>) -> Router {
    Router::new()
        // Pages
        .route("/", get(routes::index))
        // API endpoints
        .route("/api/merge", post(routes::merge_pdfs))
        .route("/api/label", get(routes::preview_label))
        // Middleware
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, max-age=0"),
        ))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
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

    let config = match &args.config {
        Some(path) => AppConfig::from_file(path).context("Failed to load config file")?,
        None => AppConfig::load(),
    };

    let state = Arc::new(AppState::new(config).context("Failed to initialize application state")?);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
