//! Inline `*emphasis*` for taxonomy labels.
//!
//! A `*` opens a span and the next `*` closes it; pairs are consumed left to
//! right and never share a delimiter. An empty pair (`**`) and a trailing
//! unmatched `*` stay in the output as literal text.

use std::sync::LazyLock;

use maud::{Markup, html};
use regex::Regex;

/// Matches one delimiter pair: an opening `*` up to the next `*`.
static EMPHASIS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*]*)\*").expect("emphasis regex should compile"));

/// A piece of formatted label text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Plain(String),
    Emphasized(String),
}

/// Split text into plain and emphasized segments, in order.
///
/// Adjacent plain text is merged, so unmatched delimiters never split a
/// plain run. Empty input yields no segments.
pub fn parse(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut plain = String::new();
    let mut cursor = 0;

    for caps in EMPHASIS_REGEX.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };

        plain.push_str(&text[cursor..whole.start()]);
        cursor = whole.end();

        if inner.is_empty() {
            plain.push_str(whole.as_str());
            continue;
        }

        if !plain.is_empty() {
            segments.push(Segment::Plain(std::mem::take(&mut plain)));
        }
        segments.push(Segment::Emphasized(inner.as_str().to_string()));
    }

    plain.push_str(&text[cursor..]);
    if !plain.is_empty() {
        segments.push(Segment::Plain(plain));
    }

    segments
}

/// Render a label with emphasized spans wrapped in `<em>`.
pub fn render(text: &str) -> Markup {
    let segments = parse(text);

    html! {
        @for segment in &segments {
            @match segment {
                Segment::Plain(t) => { (t) }
                Segment::Emphasized(t) => { em { (t) } }
            }
        }
    }
}
