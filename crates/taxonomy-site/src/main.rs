//! Taxonomy Site - HTTP server for the browsable content-format taxonomy.

use axum::http::{Request, header};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use taxonomy_site::{AppState, Config, Taxonomy, app};

/// Taxonomy Site - browsable taxonomy of content formats with example previews.
#[derive(Parser, Debug)]
#[command(name = "taxonomy-site")]
#[command(about = "Server for a two-level taxonomy with example link previews", long_about = None)]
struct Args {
    /// Path to .env file (optional).
    #[arg(long, env = "DOTENV_PATH", default_value = ".env")]
    dotenv: String,
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

    // Load the taxonomy
    let taxonomy = match &config.taxonomy_path {
        Some(path) => std::sync::Arc::new(Taxonomy::load(path)?),
        None => Taxonomy::bundled(),
    };

    // Create application state
    let state = AppState::new(config, taxonomy)?;

    // Build app with middleware
    let app = app(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let host = request
                    .headers()
                    .get(header::HOST)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default();
                tracing::span!(
                    Level::INFO,
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    host = %host,
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
    tracing::info!(addr = %bind_addr, "starting taxonomy server");

    axum::serve(listener, app).await?;

    Ok(())
}
