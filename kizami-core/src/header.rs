//! Header tracking across fragment sequences
//!
//! Some structural context, such as a markdown table header, applies to text
//! well past the fragment it occurs in. The tracker watches the fragment
//! stream for configured start/end patterns and reports which headers are
//! currently open so the merge stage can re-inject them at chunk boundaries.
//!
//! Tracker state is scoped to a single `split_text` call; the façade
//! constructs a fresh tracker per call and hands it to the merger by
//! exclusive reference.

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;

use crate::error::Result;

/// A start/end pattern pair describing one sticky header class
#[derive(Debug, Clone)]
pub struct HeaderRule {
    /// Matches a fragment that opens the header; the whole match becomes the
    /// header text
    pub start: Regex,
    /// Matches a fragment that closes the header
    pub end: Regex,
    /// Higher priority renders first in the active-header text
    pub priority: i32,
}

impl HeaderRule {
    /// Built-in rules: a markdown table header (header row plus separator
    /// row) that stays active until a blank or non-table line appears.
    ///
    /// The patterns deliberately avoid the multi-line flag: `^` and `$` must
    /// anchor to the whole fragment, not to individual lines inside it.
    pub fn default_rules() -> Result<Vec<HeaderRule>> {
        Ok(vec![HeaderRule {
            start: Regex::new(
                r"(?i)^\s*(?:\|[^|\n]*)+\r?\n\s*(?:\|\s*:?-{3,}:?\s*)+\|?\r?\n$",
            )?,
            end: Regex::new(r"(?i)^\s*$|^\s*[^|\s].*$")?,
            priority: 15,
        }])
    }
}

/// Stateful matcher for sticky structural headers
#[derive(Debug)]
pub struct HeaderTracker<'a> {
    rules: &'a [HeaderRule],
    active: BTreeMap<i32, String>,
    ended: BTreeSet<i32>,
}

impl<'a> HeaderTracker<'a> {
    /// Create a tracker over the given rules with no headers open
    pub fn new(rules: &'a [HeaderRule]) -> Self {
        Self {
            rules,
            active: BTreeMap::new(),
            ended: BTreeSet::new(),
        }
    }

    /// Advance the state machine with the next fragment, returning headers
    /// newly opened by this fragment as `(priority, text)` pairs.
    ///
    /// End patterns are checked before start patterns, and a closed header is
    /// marked ended so it cannot reopen inside the same structural block; the
    /// ended markers reset once every header has closed.
    pub fn update(&mut self, fragment: &str) -> Vec<(i32, String)> {
        let closed: Vec<i32> = self
            .active
            .keys()
            .copied()
            .filter(|priority| {
                self.rules
                    .iter()
                    .find(|rule| rule.priority == *priority)
                    .is_some_and(|rule| rule.end.is_match(fragment))
            })
            .collect();
        for priority in closed {
            self.active.remove(&priority);
            self.ended.insert(priority);
        }

        let mut opened = Vec::new();
        for rule in self.rules {
            if self.active.contains_key(&rule.priority) || self.ended.contains(&rule.priority) {
                continue;
            }
            if let Some(m) = rule.start.find(fragment) {
                self.active.insert(rule.priority, m.as_str().to_string());
                opened.push((rule.priority, m.as_str().to_string()));
            }
        }

        if self.active.is_empty() {
            self.ended.clear();
        }

        opened
    }

    /// All currently open header texts joined with newlines, highest
    /// priority first; empty when nothing is open
    pub fn active_headers(&self) -> String {
        if self.active.is_empty() {
            return String::new();
        }
        self.active
            .values()
            .rev()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
