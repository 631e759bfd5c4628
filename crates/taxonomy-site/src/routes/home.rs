//! Home page: a short landing page pointing at the taxonomy.

use axum::extract::State;
use axum::response::IntoResponse;
use maud::{DOCTYPE, PreEscaped, html};

use super::TAXONOMY_PATH;
use crate::emphasis;
use crate::render::components::PAGE_CSS;
use crate::state::AppState;

/// Render the home page.
pub async fn home_page(State(state): State<AppState>) -> impl IntoResponse {
    let site_name = &state.config.site_name;
    let topics = state.taxonomy.topics();

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (site_name) }
                meta name="description" content="A browsable taxonomy of content formats with example links.";
                meta property="og:title" content=(site_name);
                meta property="og:type" content="website";
                style { (PreEscaped(PAGE_CSS)) }
                style { (PreEscaped(HOME_CSS)) }
            }
            body {
                main class="home" {
                    h1 class="home-title" { (site_name) }
                    p class="home-tagline" {
                        (topics.len()) " topics, broken into subtypes, each with example links."
                    }

                    @if !topics.is_empty() {
                        ul class="home-topics" {
                            @for topic in topics {
                                li { (emphasis::render(&topic.label)) }
                            }
                        }
                    }

                    a class="home-cta" href=(TAXONOMY_PATH) { "Browse the taxonomy" }
                }
                footer class="footer" {
                    a href="/taxonomy.json" { "Raw JSON" }
                }
            }
        }
    }
}

/// Additional CSS for the home page only.
const HOME_CSS: &str = r#"
.home{display:flex;flex-direction:column;align-items:center;justify-content:center;min-height:60vh;text-align:center;padding:2rem 1rem}
.home-title{font-size:3rem;font-weight:800;letter-spacing:-.04em;color:var(--fg)}
.home-tagline{font-size:1.1rem;color:var(--fg2);margin-top:.5rem;max-width:420px}
.home-topics{list-style:none;margin-top:2rem;display:flex;flex-wrap:wrap;justify-content:center;gap:.5rem}
.home-topics li{padding:.35rem .75rem;border-radius:6px;border:1px solid var(--border);font-size:.9rem;color:var(--fg2)}
.home-cta{margin-top:2rem;font-size:1rem;color:var(--accent);text-decoration:none;font-weight:600}
.home-cta:hover{text-decoration:underline}
"#;
