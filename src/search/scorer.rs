//! Relevance weights for search hits.

use serde::{Deserialize, Serialize};

use crate::types::Priority;

/// Weights added to a hit's score.
///
/// Defaults match the documentation site's own search widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorerWeights {
    /// Full name or last segment equals the query term.
    #[serde(default = "default_obj_name_match")]
    pub obj_name_match: i64,

    /// Last segment contains the query term.
    #[serde(default = "default_obj_partial_match")]
    pub obj_partial_match: i64,

    #[serde(default = "default_prio_important")]
    pub prio_important: i64,

    #[serde(default = "default_prio_default")]
    pub prio_default: i64,

    #[serde(default = "default_prio_unimportant")]
    pub prio_unimportant: i64,

    /// Priorities outside 0..=2.
    #[serde(default)]
    pub prio_other: i64,

    /// Term found in a document title.
    #[serde(default = "default_title")]
    pub title: i64,

    /// Term found in a document body.
    #[serde(default = "default_term")]
    pub term: i64,
}

fn default_obj_name_match() -> i64 { 11 }
fn default_obj_partial_match() -> i64 { 6 }
fn default_prio_important() -> i64 { 15 }
fn default_prio_default() -> i64 { 5 }
fn default_prio_unimportant() -> i64 { -5 }
fn default_title() -> i64 { 15 }
fn default_term() -> i64 { 5 }

impl Default for ScorerWeights {
    fn default() -> Self {
        Self {
            obj_name_match: default_obj_name_match(),
            obj_partial_match: default_obj_partial_match(),
            prio_important: default_prio_important(),
            prio_default: default_prio_default(),
            prio_unimportant: default_prio_unimportant(),
            prio_other: 0,
            title: default_title(),
            term: default_term(),
        }
    }
}

impl ScorerWeights {
    pub fn obj_prio(&self, priority: Priority) -> i64 {
        match priority {
            Priority::Important => self.prio_important,
            Priority::Default => self.prio_default,
            Priority::Unimportant => self.prio_unimportant,
            Priority::Hidden | Priority::Other(_) => self.prio_other,
        }
    }
}
