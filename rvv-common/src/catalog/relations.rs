//! Cross-field relation rules
//!
//! Rules are evaluated in declaration order after every metric has been classified.
//! Each variant carries only the fields its evaluation needs; the `kind` tag in the
//! catalog file selects the variant.

use serde::{Deserialize, Serialize};

/// `condition_id == condition_value` makes every dependent strongly recommended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalRequirement {
    pub condition_id: String,
    pub condition_value: String,
    pub dependent_ids: Vec<String>,
}

/// Any non-empty component makes the total strongly recommended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsetTotal {
    pub condition_ids: Vec<String>,
    pub total_field: String,
}

/// `trigger_field == trigger_value` forbids `"yes"` on every conflicting field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub trigger_field: String,
    pub trigger_value: String,
    pub conflicting_fields: Vec<String>,
}

/// The total should match the sum of its present components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SumCheck {
    pub total_field: String,
    pub component_fields: Vec<String>,
    #[serde(default = "default_tolerance_percent")]
    pub tolerance_percent: f64,
}

fn default_tolerance_percent() -> f64 {
    1.0
}

/// A relation rule of any kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RelationRule {
    ConditionalRequirement(ConditionalRequirement),
    SubsetTotal(SubsetTotal),
    Conflict(Conflict),
    SumCheck(SumCheck),
}

impl RelationRule {
    pub fn kind_name(&self) -> &'static str {
        match self {
            RelationRule::ConditionalRequirement(_) => "conditional_requirement",
            RelationRule::SubsetTotal(_) => "subset_total",
            RelationRule::Conflict(_) => "conflict",
            RelationRule::SumCheck(_) => "sum_check",
        }
    }

    /// Every metric id the rule reads or writes
    pub fn referenced_ids(&self) -> Vec<&str> {
        match self {
            RelationRule::ConditionalRequirement(rule) => std::iter::once(rule.condition_id.as_str())
                .chain(rule.dependent_ids.iter().map(String::as_str))
                .collect(),
            RelationRule::SubsetTotal(rule) => rule
                .condition_ids
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(rule.total_field.as_str()))
                .collect(),
            RelationRule::Conflict(rule) => std::iter::once(rule.trigger_field.as_str())
                .chain(rule.conflicting_fields.iter().map(String::as_str))
                .collect(),
            RelationRule::SumCheck(rule) => std::iter::once(rule.total_field.as_str())
                .chain(rule.component_fields.iter().map(String::as_str))
                .collect(),
        }
    }
}
