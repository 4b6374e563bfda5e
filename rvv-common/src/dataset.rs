//! Per-entity disclosure dataset
//!
//! A dataset is what the CSV ingest step hands to the validation engine: for one
//! reporting entity, the raw value and the declared status of every metric row.
//! The engine only reads it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Value of the STATUS column for one metric row
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Provided,
    NotApplicable,
    NotAvailable,
    /// Anything else, kept verbatim for the error note
    Other(String),
}

impl Status {
    /// Parse the STATUS column text (already trimmed by the ingest step)
    pub fn parse(text: &str) -> Self {
        match text {
            "provided" => Status::Provided,
            "not_applicable" => Status::NotApplicable,
            "not_available" => Status::NotAvailable,
            other => Status::Other(other.to_string()),
        }
    }

    /// Reporter-declared exemption (`not_applicable` or `not_available`)
    pub fn is_exempt(&self) -> bool {
        matches!(self, Status::NotApplicable | Status::NotAvailable)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Status::Provided => "provided",
            Status::NotApplicable => "not_applicable",
            Status::NotAvailable => "not_available",
            Status::Other(text) => text,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One metric row of a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub raw_value: String,
    pub status: Status,
}

/// Metric id → (raw value, status) for one reporting entity
///
/// Keeps the order in which ids were first seen. Re-inserting an id replaces its
/// value and status but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    order: Vec<String>,
    entries: HashMap<String, DatasetEntry>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a metric row
    pub fn insert(&mut self, metric_id: impl Into<String>, raw_value: impl Into<String>, status: Status) {
        let metric_id = metric_id.into();
        let entry = DatasetEntry {
            raw_value: raw_value.into(),
            status,
        };
        if self.entries.insert(metric_id.clone(), entry).is_none() {
            self.order.push(metric_id);
        }
    }

    /// Builder-style insert used by tests and fixtures
    pub fn with(mut self, metric_id: &str, raw_value: &str, status: &str) -> Self {
        self.insert(metric_id, raw_value, Status::parse(status));
        self
    }

    pub fn contains(&self, metric_id: &str) -> bool {
        self.entries.contains_key(metric_id)
    }

    pub fn entry(&self, metric_id: &str) -> Option<&DatasetEntry> {
        self.entries.get(metric_id)
    }

    /// Raw value of a metric, `None` when the id is absent
    pub fn value(&self, metric_id: &str) -> Option<&str> {
        self.entries.get(metric_id).map(|e| e.raw_value.as_str())
    }

    /// Raw value when present and non-empty
    pub fn non_empty_value(&self, metric_id: &str) -> Option<&str> {
        self.value(metric_id).filter(|v| !v.is_empty())
    }

    pub fn status(&self, metric_id: &str) -> Option<&Status> {
        self.entries.get(metric_id).map(|e| &e.status)
    }

    /// True when the id is present and flagged not_applicable / not_available
    pub fn is_exempt(&self, metric_id: &str) -> bool {
        self.status(metric_id).is_some_and(Status::is_exempt)
    }

    /// Metric ids in first-seen order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
