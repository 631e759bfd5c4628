//! Route definitions for the taxonomy site.
//!
//! ## Routes
//!
//! - `GET /` - Home page
//! - `GET /health` - Health check (JSON)
//! - `GET /robots.txt` - Crawler instructions
//! - `GET /taxonomy` - Taxonomy page (`?open=&sub=` carry disclosure state)
//! - `GET /taxonomy.json` - The taxonomy document as JSON
//!
//! Anything else gets an HTML 404.

mod health;
mod home;
pub mod json;
pub mod taxonomy;

use std::sync::Arc;

use axum::Router;
use axum::http::Uri;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;

use crate::error::SiteError;
use crate::host_router::rewrite_host;
use crate::state::AppState;

/// Path of the taxonomy page.
pub const TAXONOMY_PATH: &str = "/taxonomy";

/// Build the routed service without host rewriting.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::home_page))
        .route("/health", get(health::health_check))
        .route("/robots.txt", get(robots_txt))
        .route(TAXONOMY_PATH, get(taxonomy::taxonomy_page))
        .route("/taxonomy.json", get(json::taxonomy_json))
        .fallback(not_found)
        .with_state(state)
}

/// Build the complete application: [`router`] behind the host rewrite.
///
/// The rewrite middleware wraps the whole routed service so it runs before a
/// route is matched.
pub fn app(state: AppState) -> Router {
    let host_routes = Arc::clone(&state.config.host_routes);

    Router::new()
        .fallback_service(router(state))
        .layer(middleware::from_fn_with_state(host_routes, rewrite_host))
}

/// Serve robots.txt allowing all crawlers.
async fn robots_txt() -> impl IntoResponse {
    (
        [("content-type", "text/plain; charset=utf-8")],
        "User-agent: *\nAllow: /\n",
    )
}

async fn not_found(uri: Uri) -> SiteError {
    SiteError::NotFound(uri.path().to_string())
}
