//! The taxonomy document: topics, their subtypes, and example links.
//!
//! The document is a JSON object keyed by numeric strings. The keys only
//! decide display order; once loaded, topics are addressed by position.
//!
//! ```json
//! {
//!   "1": { "type": "Explainers", "subtypes": [ { "type": "Visual essays", "examples": ["https://..."] } ] },
//!   "10": { "type": "Experimental formats" }
//! }
//! ```
//!
//! Missing `subtypes` / `examples` arrays are read as empty.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Taxonomy document compiled into the binary.
const BUNDLED_JSON: &str = include_str!("../data/taxonomy.json");

static BUNDLED: LazyLock<Arc<Taxonomy>> = LazyLock::new(|| {
    Arc::new(Taxonomy::from_json(BUNDLED_JSON).expect("bundled taxonomy.json should parse"))
});

/// A topic with its ordered subtypes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topic {
    /// Source key from the document (sort key only).
    pub key: String,
    /// Display label (may contain `*emphasis*`).
    pub label: String,
    /// Subtypes in document order.
    pub subtypes: Vec<Subtype>,
}

/// A subtype with its ordered example URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subtype {
    /// Display label (may contain `*emphasis*`).
    pub label: String,
    /// Example URLs in document order.
    pub examples: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawTopic {
    #[serde(rename = "type", default)]
    label: String,
    #[serde(default)]
    subtypes: Vec<RawSubtype>,
}

#[derive(Debug, Deserialize)]
struct RawSubtype {
    #[serde(rename = "type", default)]
    label: String,
    #[serde(default)]
    examples: Vec<String>,
}

/// The read-only, display-ordered taxonomy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Taxonomy {
    topics: Vec<Topic>,
}

impl Taxonomy {
    /// Parse a taxonomy document and derive its display order.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, RawTopic> = serde_json::from_str(json)?;

        let mut topics: Vec<Topic> = raw
            .into_iter()
            .map(|(key, topic)| Topic {
                key,
                label: topic.label,
                subtypes: topic
                    .subtypes
                    .into_iter()
                    .map(|s| Subtype {
                        label: s.label,
                        examples: s.examples,
                    })
                    .collect(),
            })
            .collect();

        topics.sort_by(|a, b| compare_keys(&a.key, &b.key));

        Ok(Self { topics })
    }

    /// The document bundled at build time.
    pub fn bundled() -> Arc<Self> {
        Arc::clone(&BUNDLED)
    }

    /// Load a taxonomy document from disk (startup override).
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read taxonomy from {}", path.display()))?;
        let taxonomy = Self::from_json(&json)
            .with_context(|| format!("failed to parse taxonomy at {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            topics = taxonomy.len(),
            "taxonomy loaded from file"
        );

        Ok(taxonomy)
    }

    /// Topics in display order.
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn topic(&self, index: usize) -> Option<&Topic> {
        self.topics.get(index)
    }

    pub fn subtype(&self, topic: usize, subtype: usize) -> Option<&Subtype> {
        self.topic(topic).and_then(|t| t.subtypes.get(subtype))
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

/// Finite numeric value of a key (`"-1"`, `"1.5"`, `"10"`).
fn numeric_key(key: &str) -> Option<f64> {
    key.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Numeric keys ascend; non-numeric keys follow in string order.
fn compare_keys(a: &str, b: &str) -> Ordering {
    match (numeric_key(a), numeric_key(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}
