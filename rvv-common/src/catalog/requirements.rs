//! Requirement tiers
//!
//! Company reports use three mandatory tiers of increasing strictness (minimum,
//! intermediate, full) plus optional metrics; which mandatory tiers actually apply
//! to a company depends on its head count. Fund and GP reports use a single
//! strongly-recommended set.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Static requirement tier of a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementTier {
    Minimum,
    Intermediate,
    Full,
    Optional,
    StronglyRecommended,
    NotRequired,
}

impl RequirementTier {
    /// Label shown next to a metric that is absent from the import file
    pub fn missing_label(&self) -> &'static str {
        match self {
            RequirementTier::Optional => "Value not required (optional)",
            other => other.label(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RequirementTier::Minimum => "Minimum",
            RequirementTier::Intermediate => "Intermediate",
            RequirementTier::Full => "Full",
            RequirementTier::Optional => "Value not required",
            RequirementTier::StronglyRecommended => "Strongly recommended",
            RequirementTier::NotRequired => "Value not required",
        }
    }

    /// Tiers that carry a completion obligation
    pub fn is_mandatory(&self) -> bool {
        matches!(
            self,
            RequirementTier::Minimum
                | RequirementTier::Intermediate
                | RequirementTier::Full
                | RequirementTier::StronglyRecommended
        )
    }
}

impl fmt::Display for RequirementTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tier lists for company reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TieredRequirements {
    #[serde(default)]
    pub minimum: Vec<String>,
    #[serde(default)]
    pub intermediate: Vec<String>,
    #[serde(default)]
    pub full: Vec<String>,
    #[serde(default)]
    pub optional: Vec<String>,

    /// Metric carrying the end-of-year FTE count
    #[serde(default = "default_fte_metric")]
    pub fte_metric: String,

    /// FTE count from which intermediate metrics become strongly recommended
    #[serde(default = "default_intermediate_fte_threshold")]
    pub intermediate_fte_threshold: f64,

    /// FTE count from which full metrics become strongly recommended
    #[serde(default = "default_full_fte_threshold")]
    pub full_fte_threshold: f64,
}

fn default_fte_metric() -> String {
    "total_ftes_end_of_report_year".to_string()
}

fn default_intermediate_fte_threshold() -> f64 {
    15.0
}

fn default_full_fte_threshold() -> f64 {
    250.0
}

impl TieredRequirements {
    /// Tier lists in nesting order, optional last
    pub fn lists(&self) -> [(RequirementTier, &Vec<String>); 4] {
        [
            (RequirementTier::Minimum, &self.minimum),
            (RequirementTier::Intermediate, &self.intermediate),
            (RequirementTier::Full, &self.full),
            (RequirementTier::Optional, &self.optional),
        ]
    }
}

/// Required id list for fund and GP reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequiredSet {
    #[serde(default)]
    pub required: Vec<String>,
}

/// How a report kind assigns requirement tiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum RequirementModel {
    Tiered(TieredRequirements),
    RequiredSet(RequiredSet),
}

impl RequirementModel {
    /// Static tier of a metric id
    ///
    /// For the tiered model the first list containing the id wins, in the order
    /// minimum, intermediate, full; anything else is optional.
    pub fn tier_of(&self, metric_id: &str) -> RequirementTier {
        match self {
            RequirementModel::Tiered(tiers) => {
                let mandatory = [
                    (RequirementTier::Minimum, &tiers.minimum),
                    (RequirementTier::Intermediate, &tiers.intermediate),
                    (RequirementTier::Full, &tiers.full),
                ];
                mandatory
                    .into_iter()
                    .find(|(_, ids)| ids.iter().any(|id| id == metric_id))
                    .map(|(tier, _)| tier)
                    .unwrap_or(RequirementTier::Optional)
            }
            RequirementModel::RequiredSet(set) => {
                if set.required.iter().any(|id| id == metric_id) {
                    RequirementTier::StronglyRecommended
                } else {
                    RequirementTier::NotRequired
                }
            }
        }
    }

    /// All ids named by any tier list
    pub fn listed_ids(&self) -> Vec<&str> {
        match self {
            RequirementModel::Tiered(tiers) => tiers
                .lists()
                .into_iter()
                .flat_map(|(_, ids)| ids.iter().map(String::as_str))
                .collect(),
            RequirementModel::RequiredSet(set) => set.required.iter().map(String::as_str).collect(),
        }
    }
}
