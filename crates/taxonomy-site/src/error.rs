//! Error types for the taxonomy site.
//!
//! Errors are rendered as simple HTML error pages rather than JSON,
//! since this is a user-facing HTML service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use maud::{DOCTYPE, html};

/// Site error type.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// No page exists at the requested path.
    #[error("not found: {0}")]
    NotFound(String),

    /// Internal server error (serialization, rendering, etc.).
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        let (status, title, message) = match &self {
            Self::NotFound(path) => (
                StatusCode::NOT_FOUND,
                "Not Found",
                format!("There is no page at {path}."),
            ),
            Self::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Error",
                    "An internal error occurred. Please try again later.".to_string(),
                )
            }
        };

        let markup = html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    title { (title) }
                    meta name="robots" content="noindex";
                    style { (maud::PreEscaped(crate::render::components::ERROR_CSS)) }
                }
                body {
                    main class="error-page" {
                        h1 { (title) }
                        p { (message) }
                        a href="/taxonomy" { "Back to the taxonomy" }
                    }
                }
            }
        };

        (status, markup).into_response()
    }
}
