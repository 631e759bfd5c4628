//! Taxonomy page route handler.
//!
//! Handles `GET /taxonomy`. Disclosure state arrives as `?open=&sub=`; a
//! request with neither parameter starts from the configured default policy.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use super::TAXONOMY_PATH;
use crate::expansion::ExpansionState;
use crate::render;
use crate::state::AppState;
use crate::view::TaxonomyView;

/// Explicit expansion state from the query string.
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    /// Comma-separated expanded topic indices.
    pub open: Option<String>,
    /// Comma-separated expanded `topic-subtype` pairs.
    pub sub: Option<String>,
}

impl ViewQuery {
    fn expansion(&self, state: &AppState) -> ExpansionState {
        if self.open.is_none() && self.sub.is_none() {
            return ExpansionState::initial(state.config.default_expansion, &state.taxonomy);
        }

        ExpansionState::from_query(
            self.open.as_deref().unwrap_or_default(),
            self.sub.as_deref().unwrap_or_default(),
            &state.taxonomy,
        )
    }
}

/// Render the taxonomy page.
///
/// Previews for every visible example are looked up before rendering. If the
/// client goes away, the handler future is dropped along with the view, which
/// aborts whatever lookups are still running.
pub async fn taxonomy_page(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Response {
    let mut view = TaxonomyView::new(Arc::clone(&state.taxonomy), query.expansion(&state));

    let visible = view.visible_examples().len();
    if visible > 0 {
        tracing::debug!(examples = visible, "loading example previews");
        view.load_previews(&state.resolver).await;
    }

    let html = render::render_page(&state, &view, TAXONOMY_PATH).into_string();
    build_response(&html)
}

/// Build an HTTP response with HTML content and security/cache headers.
fn build_response(html: &str) -> Response {
    let mut headers = HeaderMap::new();

    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );

    // Security headers
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(render::components::CSP_HEADER),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));

    // ETag (xxHash of content)
    let hash = xxhash_rust::xxh3::xxh3_64(html.as_bytes());
    let etag = format!("\"{}\"", hex_fmt::HexFmt(&hash.to_be_bytes()));
    if let Ok(val) = HeaderValue::from_str(&etag) {
        headers.insert(header::ETAG, val);
    }

    // Cache-Control
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=60, s-maxage=300, stale-while-revalidate=60"),
    );

    (StatusCode::OK, headers, html.to_string()).into_response()
}
