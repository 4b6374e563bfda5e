//! Effective requirement lists for one run
//!
//! Starts as a copy of the catalog's static lists. Conditional rules that fire add
//! their dependents, so completion is measured against what was actually required
//! of this entity.

use rvv_common::catalog::{RequirementModel, RequirementTier};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum EffectiveRequirements {
    Tiered {
        minimum: Vec<String>,
        intermediate: Vec<String>,
        full: Vec<String>,
        optional: Vec<String>,
    },
    RequiredSet {
        required: Vec<String>,
    },
}

impl EffectiveRequirements {
    pub fn from_model(model: &RequirementModel) -> Self {
        match model {
            RequirementModel::Tiered(tiers) => EffectiveRequirements::Tiered {
                minimum: dedup(&tiers.minimum),
                intermediate: dedup(&tiers.intermediate),
                full: dedup(&tiers.full),
                optional: dedup(&tiers.optional),
            },
            RequirementModel::RequiredSet(set) => EffectiveRequirements::RequiredSet {
                required: dedup(&set.required),
            },
        }
    }

    /// Record that `dependent_id` became required because `condition_id` fired
    ///
    /// Tiered: the dependent joins every mandatory tier list that holds the
    /// condition. Required set: the dependent always joins the set.
    pub fn escalate(&mut self, condition_id: &str, dependent_id: &str) {
        match self {
            EffectiveRequirements::Tiered {
                minimum,
                intermediate,
                full,
                ..
            } => {
                for (tier, ids) in [
                    (RequirementTier::Minimum, minimum),
                    (RequirementTier::Intermediate, intermediate),
                    (RequirementTier::Full, full),
                ] {
                    if contains(ids, condition_id) && push_unique(ids, dependent_id) {
                        debug!(dependent_id, condition_id, tier = %tier, "Escalated requirement");
                    }
                }
            }
            EffectiveRequirements::RequiredSet { required } => {
                if push_unique(required, dependent_id) {
                    debug!(dependent_id, condition_id, "Added to required set");
                }
            }
        }
    }

    /// Ids of one tier; empty when the model has no such tier
    pub fn tier(&self, tier: RequirementTier) -> &[String] {
        match (self, tier) {
            (EffectiveRequirements::Tiered { minimum, .. }, RequirementTier::Minimum) => minimum,
            (EffectiveRequirements::Tiered { intermediate, .. }, RequirementTier::Intermediate) => {
                intermediate
            }
            (EffectiveRequirements::Tiered { full, .. }, RequirementTier::Full) => full,
            (EffectiveRequirements::Tiered { optional, .. }, RequirementTier::Optional) => optional,
            (EffectiveRequirements::RequiredSet { required }, RequirementTier::StronglyRecommended) => {
                required
            }
            _ => &[],
        }
    }
}

fn contains(ids: &[String], id: &str) -> bool {
    ids.iter().any(|candidate| candidate == id)
}

fn push_unique(ids: &mut Vec<String>, id: &str) -> bool {
    if contains(ids, id) {
        false
    } else {
        ids.push(id.to_string());
        true
    }
}

fn dedup(ids: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        push_unique(&mut out, id);
    }
    out
}
