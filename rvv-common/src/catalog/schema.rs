//! Per-metric schema entries

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Semantic type declared for a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricType {
    Integer,
    Float,
    String,
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MetricType::Integer => "integer",
            MetricType::Float => "float",
            MetricType::String => "string",
        };
        f.write_str(name)
    }
}

/// Schema entry for one metric id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSpec {
    #[serde(rename = "type")]
    pub metric_type: MetricType,

    /// Permitted codes; filled from `options` at load time when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,

    /// Name of the label dictionary the codes come from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    /// Display unit; `"currency"` is replaced by the entity's currency code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl MetricSpec {
    pub fn new(metric_type: MetricType) -> Self {
        Self {
            metric_type,
            allowed: None,
            options: None,
            min: None,
            max: None,
            unit: None,
        }
    }
}

/// Metric id → schema entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    entries: BTreeMap<String, MetricSpec>,
}

impl Schema {
    pub fn get(&self, metric_id: &str) -> Option<&MetricSpec> {
        self.entries.get(metric_id)
    }

    pub fn contains(&self, metric_id: &str) -> bool {
        self.entries.contains_key(metric_id)
    }

    pub fn insert(&mut self, metric_id: impl Into<String>, spec: MetricSpec) {
        self.entries.insert(metric_id.into(), spec);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MetricSpec)> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut MetricSpec)> {
        self.entries.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
