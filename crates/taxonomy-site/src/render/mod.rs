//! HTML rendering for the taxonomy site.
//!
//! All rendering uses [maud](https://maud.lambda.xyz/) for compile-time HTML
//! generation with automatic XSS protection (all dynamic values are escaped).

pub mod components;
pub mod example;
pub mod taxonomy;

use maud::Markup;

use crate::state::AppState;
use crate::view::TaxonomyView;

/// Render the taxonomy page for a view served at `page_path`.
pub fn render_page(state: &AppState, view: &TaxonomyView, page_path: &str) -> Markup {
    taxonomy::render(
        view,
        page_path,
        &state.config.base_url,
        &state.config.site_name,
    )
}
