//! Taxonomy page renderer.
//!
//! Two-level disclosure list: topics open to show subtypes, subtypes open to
//! show example links. Each disclosure control links to the same page with
//! that one flag flipped, anchored back to the control.

use maud::{Markup, PreEscaped, html};

use super::components::{ICON_CARET, OpenGraphData, page_shell};
use super::example;
use crate::emphasis;
use crate::expansion::SubtypeKey;
use crate::preview::ExampleKey;
use crate::taxonomy::{Subtype, Topic};
use crate::view::TaxonomyView;

/// Render the taxonomy page for `view`, served at `page_path`.
pub fn render(view: &TaxonomyView, page_path: &str, base_url: &str, site_name: &str) -> Markup {
    let topic_count = view.topics().len();
    let title = format!("{site_name} - Taxonomy");
    let description = format!("Browse {topic_count} topics, their subtypes, and example links.");
    let canonical = format!("{base_url}{page_path}");

    let og = OpenGraphData {
        title: &title,
        description: &description,
        og_type: "website",
    };

    let body = html! {
        h1 class="page-title" { (site_name) }
        p class="page-lede" { (description) }

        @if view.topics().is_empty() {
            p class="empty" { "No topics" }
        } @else {
            ul class="topics" {
                @for (t, topic) in view.topics().iter().enumerate() {
                    (topic_item(view, page_path, t, topic))
                }
            }
        }
    };

    page_shell(&title, &description, &canonical, og, body, site_name)
}

fn topic_item(view: &TaxonomyView, page_path: &str, t: usize, topic: &Topic) -> Markup {
    let expanded = view.is_topic_expanded(t);
    let anchor = format!("topic-{t}");
    let href = format!(
        "{page_path}{}#{anchor}",
        view.expansion().toggled_topic_query(t)
    );

    html! {
        li class="topic" id=(anchor) {
            a class="disclosure" href=(href) aria-expanded=(aria(expanded)) {
                (PreEscaped(ICON_CARET))
                span class="label" { (emphasis::render(&topic.label)) }
                span class="count" { "(" (topic.subtypes.len()) ")" }
            }
            @if expanded {
                @if topic.subtypes.is_empty() {
                    p class="empty" { "No subtypes" }
                } @else {
                    ul class="subtypes" {
                        @for (s, subtype) in topic.subtypes.iter().enumerate() {
                            (subtype_item(view, page_path, SubtypeKey::new(t, s), subtype))
                        }
                    }
                }
            }
        }
    }
}

fn subtype_item(view: &TaxonomyView, page_path: &str, key: SubtypeKey, subtype: &Subtype) -> Markup {
    let expanded = view.is_subtype_expanded(key);
    let anchor = format!("subtype-{key}");
    let href = format!(
        "{page_path}{}#{anchor}",
        view.expansion().toggled_subtype_query(key)
    );

    html! {
        li class="subtype" id=(anchor) {
            a class="disclosure" href=(href) aria-expanded=(aria(expanded)) {
                (PreEscaped(ICON_CARET))
                span class="label" { (emphasis::render(&subtype.label)) }
                span class="count" { "(" (subtype.examples.len()) ")" }
            }
            @if expanded {
                @if subtype.examples.is_empty() {
                    p class="empty" { "No examples" }
                } @else {
                    ul class="examples" {
                        @for (e, url) in subtype.examples.iter().enumerate() {
                            li class="example" {
                                (example::render(url, view.preview(ExampleKey::new(key.topic, key.subtype, e))))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn aria(expanded: bool) -> &'static str {
    if expanded { "true" } else { "false" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::expansion::{ExpansionPolicy, ExpansionState};
    use crate::taxonomy::Taxonomy;

    fn sample() -> Arc<Taxonomy> {
        Arc::new(
            Taxonomy::from_json(
                r#"{
                    "2": { "type": "Second *topic*", "subtypes": [] },
                    "1": { "type": "First", "subtypes": [
                        { "type": "With *examples*", "examples": ["https://a.example/1"] },
                        { "type": "Bare" }
                    ] }
                }"#,
            )
            .unwrap(),
        )
    }

    fn html_for(policy: ExpansionPolicy) -> String {
        let taxonomy = sample();
        let expansion = ExpansionState::initial(policy, &taxonomy);
        let view = TaxonomyView::new(taxonomy, expansion);
        render(&view, "/taxonomy", "http://localhost:8082", "Taxonomy").into_string()
    }

    #[test]
    fn topics_render_in_numeric_order() {
        let html = html_for(ExpansionPolicy::Collapsed);
        let first = html.find("First").unwrap();
        let second = html.find("Second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn collapsed_topics_hide_subtypes() {
        let html = html_for(ExpansionPolicy::Collapsed);
        assert!(!html.contains("class=\"subtypes\""));
        assert!(!html.contains("No subtypes"));
        assert!(html.contains(r#"aria-expanded="false""#));
    }

    #[test]
    fn labels_are_emphasized() {
        let html = html_for(ExpansionPolicy::Collapsed);
        assert!(html.contains("Second <em>topic</em>"));
    }

    #[test]
    fn empty_topic_shows_indicator() {
        let html = html_for(ExpansionPolicy::Expanded);
        assert!(html.contains("No subtypes"));
    }

    #[test]
    fn empty_subtype_shows_indicator() {
        let html = html_for(ExpansionPolicy::Expanded);
        assert!(html.contains("No examples"));
        assert!(html.contains("With <em>examples</em>"));
    }

    #[test]
    fn expanded_subtype_lists_examples_as_new_tab_links() {
        let html = html_for(ExpansionPolicy::Expanded);
        assert!(html.contains(r#"href="https://a.example/1""#));
        assert!(html.contains(r#"target="_blank""#));
    }

    #[test]
    fn first_topic_policy_hides_examples() {
        let html = html_for(ExpansionPolicy::FirstTopic);
        assert!(html.contains("class=\"subtypes\""));
        assert!(!html.contains("https://a.example/1"));
        assert!(!html.contains("No examples"));
    }

    #[test]
    fn disclosure_links_carry_toggled_state() {
        let html = html_for(ExpansionPolicy::FirstTopic);
        // Collapsing topic 0 from the first-topic state.
        assert!(html.contains(r#"href="/taxonomy?open=&amp;sub=#topic-0""#));
        // Opening subtype 0-0 keeps topic 0 open.
        assert!(html.contains(r#"href="/taxonomy?open=0&amp;sub=0-0#subtype-0-0""#));
    }

    #[test]
    fn empty_taxonomy_shows_indicator() {
        let taxonomy = Arc::new(Taxonomy::default());
        let view = TaxonomyView::new(taxonomy, ExpansionState::default());
        let html = render(&view, "/taxonomy", "", "Taxonomy").into_string();
        assert!(html.contains("No topics"));
    }
}
