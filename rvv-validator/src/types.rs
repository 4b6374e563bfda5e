//! Result types shared by the validation pipeline
//!
//! A run sorts every metric of the universe into exactly one [`Bucket`]. Unknown
//! metric ids and sum-check warnings are reported next to the buckets; they never
//! displace a metric from its bucket.

use crate::coercion::TypedValue;
use rvv_common::ReportKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mutually exclusive outcome of one universe metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Valid,
    Error,
    Blank,
    Missing,
    RecommendedButMissing,
}

impl Bucket {
    pub const ALL: [Bucket; 5] = [
        Bucket::Valid,
        Bucket::Error,
        Bucket::Blank,
        Bucket::Missing,
        Bucket::RecommendedButMissing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Valid => "valid",
            Bucket::Error => "error",
            Bucket::Blank => "blank",
            Bucket::Missing => "missing",
            Bucket::RecommendedButMissing => "recommended_but_missing",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reported line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    pub compound_id: String,

    /// Typed value for valid lines, raw text otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_value: Option<TypedValue>,

    /// Human-readable value with unit (valid lines only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpreted_value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirement_level: Option<String>,

    /// Reason, error detail or warning text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl LineRecord {
    pub fn new(compound_id: impl Into<String>) -> Self {
        Self {
            compound_id: compound_id.into(),
            raw_value: None,
            interpreted_value: None,
            requirement_level: None,
            note: None,
        }
    }

    pub fn with_raw(mut self, raw_value: TypedValue) -> Self {
        self.raw_value = Some(raw_value);
        self
    }

    pub fn with_raw_text(self, raw: &str) -> Self {
        self.with_raw(TypedValue::Text(raw.to_string()))
    }

    pub fn with_interpreted(mut self, value: impl Into<String>) -> Self {
        self.interpreted_value = Some(value.into());
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.requirement_level = Some(level.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Number of records per bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCounts {
    pub valid: usize,
    pub error: usize,
    pub blank: usize,
    pub missing: usize,
    pub recommended_but_missing: usize,
    pub unknown: usize,
    pub warning: usize,
}

/// Bucket contents in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketContents {
    pub valid: Vec<LineRecord>,
    pub error: Vec<LineRecord>,
    pub blank: Vec<LineRecord>,
    pub missing: Vec<LineRecord>,
    pub recommended_but_missing: Vec<LineRecord>,
    pub unknown: Vec<LineRecord>,
    pub warning: Vec<LineRecord>,
}

impl BucketContents {
    pub fn counts(&self) -> BucketCounts {
        BucketCounts {
            valid: self.valid.len(),
            error: self.error.len(),
            blank: self.blank.len(),
            missing: self.missing.len(),
            recommended_but_missing: self.recommended_but_missing.len(),
            unknown: self.unknown.len(),
            warning: self.warning.len(),
        }
    }

    /// Records of one exclusive bucket
    pub fn bucket(&self, bucket: Bucket) -> &[LineRecord] {
        match bucket {
            Bucket::Valid => &self.valid,
            Bucket::Error => &self.error,
            Bucket::Blank => &self.blank,
            Bucket::Missing => &self.missing,
            Bucket::RecommendedButMissing => &self.recommended_but_missing,
        }
    }

    /// Exclusive bucket holding `compound_id`, if any
    pub fn bucket_of(&self, compound_id: &str) -> Option<Bucket> {
        Bucket::ALL.into_iter().find(|bucket| {
            self.bucket(*bucket)
                .iter()
                .any(|line| line.compound_id == compound_id)
        })
    }

    /// Record of `compound_id` in its exclusive bucket
    pub fn find(&self, compound_id: &str) -> Option<&LineRecord> {
        Bucket::ALL
            .into_iter()
            .flat_map(|bucket| self.bucket(bucket).iter())
            .find(|line| line.compound_id == compound_id)
    }
}

/// Completion figures for one requirement tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TierCompletion {
    /// Metrics in the tier after escalation
    pub total: usize,
    /// Tier metrics neither missing nor in error
    pub met: usize,
    /// `met / total` in percent, two decimals; 0 for an empty tier
    pub percent: f64,
    /// Missing or erroneous metrics (cumulative over mandatory tiers)
    pub missing: usize,
}

/// Completion block of a summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum Completion {
    Tiered {
        minimum: TierCompletion,
        intermediate: TierCompletion,
        full: TierCompletion,
        optional: TierCompletion,
    },
    RequiredSet {
        required: usize,
        provided: usize,
        percent_completion: f64,
    },
}

impl Completion {
    /// Headline percentages for text output
    pub fn display_string(&self) -> String {
        match self {
            Completion::Tiered {
                minimum,
                intermediate,
                full,
                ..
            } => format!(
                "minimum {:.2}%, intermediate {:.2}%, full {:.2}%",
                minimum.percent, intermediate.percent, full.percent
            ),
            Completion::RequiredSet {
                percent_completion, ..
            } => format!("completion {:.2}%", percent_completion),
        }
    }
}

/// Final, read-only result of validating one dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub entity_name: String,
    pub report_kind: ReportKind,
    pub catalog_version: String,
    pub counts: BucketCounts,
    pub valid_lines: usize,
    /// Error plus missing records
    pub invalid_lines: usize,
    pub completion: Completion,
    pub lines: BucketContents,
}
