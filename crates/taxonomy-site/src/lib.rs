//! Taxonomy Site - a browsable two-level taxonomy of content formats.
//!
//! Topics open to reveal subtypes; subtypes open to reveal example links.
//! Example links are decorated with metadata (title, thumbnail) fetched from
//! an oEmbed-style endpoint, and fall back to plain links when that fails.
//!
//! # Architecture
//!
//! - **Taxonomy**: the bundled (or configured) JSON document, ordered by numeric key
//! - **Expansion**: per-topic and per-subtype disclosure flags, carried in the query string
//! - **Preview**: concurrent metadata lookups whose late results are dropped once
//!   their slot is gone
//! - **Render**: server-side HTML via maud (compile-time templates, no JavaScript)
//! - **Host router**: subdomain requests rewritten onto the taxonomy page before routing
//!
//! # URL Pattern
//!
//! ```text
//! GET /taxonomy?open=0,2&sub=0-1,2-0
//! ```
//!
//! `open` lists expanded topic indices and `sub` lists expanded
//! `topic-subtype` pairs, both in display order.
//!
//! # Security
//!
//! - All dynamic content is HTML-escaped by maud
//! - URLs are validated (HTTPS/HTTP only) before use in attributes
//! - Strict Content-Security-Policy: no JavaScript execution
//! - X-Frame-Options: DENY prevents clickjacking

pub mod config;
pub mod emphasis;
pub mod error;
pub mod expansion;
pub mod host_router;
pub mod preview;
pub mod render;
pub mod routes;
pub mod state;
pub mod taxonomy;
pub mod view;

pub use config::Config;
pub use routes::{app, router};
pub use state::AppState;
pub use taxonomy::Taxonomy;
