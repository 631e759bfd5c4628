//! Expand/collapse flags for the taxonomy disclosure list.
//!
//! Topics are keyed by display index; subtypes by a [`SubtypeKey`] written as
//! `"{topic}-{subtype}"`. Flags that were never set read as collapsed.
//!
//! The state travels in the page query string so every disclosure control is
//! a plain link:
//!
//! ```text
//! /taxonomy?open=0,2&sub=0-1,2-0
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::taxonomy::Taxonomy;

/// Composite key of a subtype within its topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubtypeKey {
    pub topic: usize,
    pub subtype: usize,
}

impl SubtypeKey {
    pub fn new(topic: usize, subtype: usize) -> Self {
        Self { topic, subtype }
    }
}

impl fmt::Display for SubtypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.topic, self.subtype)
    }
}

impl FromStr for SubtypeKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (topic, subtype) = s.split_once('-').ok_or(())?;
        Ok(Self {
            topic: topic.trim().parse().map_err(|_| ())?,
            subtype: subtype.trim().parse().map_err(|_| ())?,
        })
    }
}

/// How disclosure flags start out on a fresh page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpansionPolicy {
    /// Everything collapsed.
    Collapsed,
    /// Every topic and subtype expanded.
    Expanded,
    /// First topic expanded, all subtypes collapsed.
    #[default]
    FirstTopic,
}

impl FromStr for ExpansionPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "collapsed" | "all-collapsed" => Ok(Self::Collapsed),
            "expanded" | "all-expanded" => Ok(Self::Expanded),
            "first-topic" | "first" => Ok(Self::FirstTopic),
            other => anyhow::bail!(
                "unknown expansion policy '{other}' (expected collapsed, expanded or first-topic)"
            ),
        }
    }
}

impl fmt::Display for ExpansionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Collapsed => "collapsed",
            Self::Expanded => "expanded",
            Self::FirstTopic => "first-topic",
        })
    }
}

/// Disclosure flags for one view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    topics: BTreeMap<usize, bool>,
    subtypes: BTreeMap<SubtypeKey, bool>,
}

impl ExpansionState {
    /// Initial flags for `taxonomy` under `policy`.
    pub fn initial(policy: ExpansionPolicy, taxonomy: &Taxonomy) -> Self {
        let mut state = Self::default();

        match policy {
            ExpansionPolicy::Collapsed => {}
            ExpansionPolicy::Expanded => {
                for (t, topic) in taxonomy.topics().iter().enumerate() {
                    state.topics.insert(t, true);
                    for s in 0..topic.subtypes.len() {
                        state.subtypes.insert(SubtypeKey::new(t, s), true);
                    }
                }
            }
            ExpansionPolicy::FirstTopic => {
                if !taxonomy.is_empty() {
                    state.topics.insert(0, true);
                }
            }
        }

        state
    }

    /// Explicit flags from the `open` and `sub` query parameters.
    ///
    /// Both are comma-separated lists of expanded entries. Malformed tokens
    /// and indices outside `taxonomy` are ignored.
    pub fn from_query(open: &str, sub: &str, taxonomy: &Taxonomy) -> Self {
        let mut state = Self::default();

        for token in tokens(open) {
            if let Ok(t) = token.parse::<usize>()
                && t < taxonomy.len()
            {
                state.topics.insert(t, true);
            }
        }

        for token in tokens(sub) {
            if let Ok(key) = token.parse::<SubtypeKey>()
                && taxonomy.subtype(key.topic, key.subtype).is_some()
            {
                state.subtypes.insert(key, true);
            }
        }

        state
    }

    /// Encode the expanded entries as `(open, sub)` query values.
    pub fn to_query(&self) -> (String, String) {
        let open = self
            .topics
            .iter()
            .filter(|(_, expanded)| **expanded)
            .map(|(t, _)| t.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let sub = self
            .subtypes
            .iter()
            .filter(|(_, expanded)| **expanded)
            .map(|(key, _)| key.to_string())
            .collect::<Vec<_>>()
            .join(",");

        (open, sub)
    }

    /// Query string (`?open=..&sub=..`) for this state.
    pub fn query_string(&self) -> String {
        let (open, sub) = self.to_query();
        format!("?open={open}&sub={sub}")
    }

    /// Query string of this state with one topic flipped.
    pub fn toggled_topic_query(&self, topic: usize) -> String {
        let mut next = self.clone();
        next.toggle_topic(topic);
        next.query_string()
    }

    /// Query string of this state with one subtype flipped.
    pub fn toggled_subtype_query(&self, key: SubtypeKey) -> String {
        let mut next = self.clone();
        next.toggle_subtype(key);
        next.query_string()
    }

    /// Flip one topic. Subtype flags are untouched.
    pub fn toggle_topic(&mut self, topic: usize) -> bool {
        let flag = self.topics.entry(topic).or_insert(false);
        *flag = !*flag;
        *flag
    }

    /// Flip one subtype.
    pub fn toggle_subtype(&mut self, key: SubtypeKey) -> bool {
        let flag = self.subtypes.entry(key).or_insert(false);
        *flag = !*flag;
        *flag
    }

    pub fn is_topic_expanded(&self, topic: usize) -> bool {
        self.topics.get(&topic).copied().unwrap_or(false)
    }

    pub fn is_subtype_expanded(&self, key: SubtypeKey) -> bool {
        self.subtypes.get(&key).copied().unwrap_or(false)
    }
}

fn tokens(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|t| !t.is_empty())
}
