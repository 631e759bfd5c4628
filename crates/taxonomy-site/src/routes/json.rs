//! JSON endpoint for the taxonomy document.
//!
//! Serves the display-ordered taxonomy at `GET /taxonomy.json`:
//!
//! ```json
//! [
//!   { "key": "1", "label": "Explainers", "subtypes": [
//!       { "label": "*Visual* essays", "examples": ["https://..."] }
//!   ] }
//! ]
//! ```
//!
//! Labels are returned raw, emphasis markers included.

use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::error::SiteError;
use crate::state::AppState;

/// Serve the taxonomy as pretty-printed JSON.
pub async fn taxonomy_json(State(state): State<AppState>) -> Result<Response, SiteError> {
    let json_string = serde_json::to_string_pretty(state.taxonomy.as_ref())
        .map_err(|e| SiteError::Internal(e.into()))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=60, s-maxage=3600, stale-while-revalidate=600"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );

    Ok((StatusCode::OK, headers, json_string).into_response())
}
