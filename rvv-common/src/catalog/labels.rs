//! Code → human-readable label dictionaries

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One named label dictionary (e.g. `yes_no`, `ems_presence_select`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSet {
    pub name: String,
    pub labels: BTreeMap<String, String>,
}

impl LabelSet {
    /// True when every code in `allowed` has a label here
    pub fn covers(&self, allowed: &[String]) -> bool {
        allowed.iter().all(|code| self.labels.contains_key(code))
    }

    pub fn label(&self, code: &str) -> Option<&str> {
        self.labels.get(code).map(String::as_str)
    }

    pub fn codes(&self) -> Vec<String> {
        self.labels.keys().cloned().collect()
    }
}

/// Find the label for `value` among the dictionaries that cover `allowed`
///
/// Dictionaries are tried in declaration order; the first one that covers the
/// allowed codes and has a non-empty label for `value` wins.
pub fn find_label<'a>(sets: &'a [LabelSet], allowed: &[String], value: &str) -> Option<&'a str> {
    if allowed.is_empty() {
        return None;
    }
    sets.iter()
        .filter(|set| set.covers(allowed))
        .find_map(|set| set.label(value).filter(|label| !label.is_empty()))
}
