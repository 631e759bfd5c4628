//! The taxonomy page model.
//!
//! A [`TaxonomyView`] owns the disclosure flags and the preview slots of one
//! page render. Example lists (and their lookups) exist only while both the
//! topic and the subtype are expanded; collapsing either discards the slots
//! underneath it.

use std::sync::Arc;

use crate::expansion::{ExpansionState, SubtypeKey};
use crate::preview::{ExampleKey, PreviewBoard, PreviewResolver, PreviewResult};
use crate::taxonomy::{Taxonomy, Topic};

static NO_SLOT: PreviewResult = PreviewResult::Pending;

/// Interactive state of the taxonomy page.
#[derive(Debug)]
pub struct TaxonomyView {
    taxonomy: Arc<Taxonomy>,
    expansion: ExpansionState,
    previews: PreviewBoard,
}

impl TaxonomyView {
    pub fn new(taxonomy: Arc<Taxonomy>, expansion: ExpansionState) -> Self {
        Self {
            taxonomy,
            expansion,
            previews: PreviewBoard::new(),
        }
    }

    /// Topics in display order.
    pub fn topics(&self) -> &[Topic] {
        self.taxonomy.topics()
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn is_topic_expanded(&self, topic: usize) -> bool {
        self.expansion.is_topic_expanded(topic)
    }

    pub fn is_subtype_expanded(&self, key: SubtypeKey) -> bool {
        self.expansion.is_subtype_expanded(key)
    }

    /// Flip a topic. Collapsing it drops the previews of its subtypes.
    ///
    /// In-process counterpart of following a disclosure link built by
    /// [`ExpansionState::toggled_topic_query`].
    pub fn toggle_topic(&mut self, topic: usize) -> bool {
        let expanded = self.expansion.toggle_topic(topic);
        if !expanded {
            self.previews.discard_topic(topic);
        }
        expanded
    }

    /// Flip a subtype. Collapsing it drops its previews.
    ///
    /// In-process counterpart of following a disclosure link built by
    /// [`ExpansionState::toggled_subtype_query`].
    pub fn toggle_subtype(&mut self, key: SubtypeKey) -> bool {
        let expanded = self.expansion.toggle_subtype(key);
        if !expanded {
            self.previews.discard_subtype(key);
        }
        expanded
    }

    /// Every example currently on screen, with its URL.
    pub fn visible_examples(&self) -> Vec<(ExampleKey, &str)> {
        let mut visible = Vec::new();

        for (t, topic) in self.topics().iter().enumerate() {
            if !self.is_topic_expanded(t) {
                continue;
            }
            for (s, subtype) in topic.subtypes.iter().enumerate() {
                if !self.is_subtype_expanded(SubtypeKey::new(t, s)) {
                    continue;
                }
                for (e, url) in subtype.examples.iter().enumerate() {
                    visible.push((ExampleKey::new(t, s, e), url.as_str()));
                }
            }
        }

        visible
    }

    /// Start lookups for visible examples without a slot, then wait for them.
    pub async fn load_previews<R: PreviewResolver>(&mut self, resolver: &R) {
        let pending: Vec<(ExampleKey, String)> = self
            .visible_examples()
            .into_iter()
            .filter(|(key, _)| !self.previews.contains(*key))
            .map(|(key, url)| (key, url.to_string()))
            .collect();

        if pending.is_empty() {
            return;
        }

        tracing::debug!(count = pending.len(), "resolving link previews");

        for (key, url) in &pending {
            self.previews.watch(*key, url, resolver);
        }

        self.previews.settle().await;
    }

    /// Preview state of one example. Examples without a slot read as pending.
    pub fn preview(&self, key: ExampleKey) -> &PreviewResult {
        self.previews.get(key).unwrap_or(&NO_SLOT)
    }
}
