//! Report aggregator
//!
//! Turns the final bucket state of a run into a [`Summary`]: entity name, counts and
//! completion percentages against the effective requirement lists.

use crate::buckets::BucketIndex;
use crate::requirements::EffectiveRequirements;
use crate::types::{Bucket, Completion, LineRecord, Summary, TierCompletion};
use rvv_common::catalog::RequirementTier;
use rvv_common::{Catalog, Dataset};
use std::collections::HashSet;

/// Round to two decimals, as percentages are reported
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round2(part as f64 / whole as f64 * 100.0)
    }
}

/// Completion of each tier list
///
/// A tier metric is met unless it is missing or in error. Missing counts are
/// cumulative over the mandatory tiers up to and including the tier; the optional
/// tier counts only its own metrics.
pub fn tiered_completion(requirements: &EffectiveRequirements, buckets: &BucketIndex) -> Completion {
    let unmet: HashSet<&str> = buckets
        .ids_in(Bucket::Missing)
        .into_iter()
        .chain(buckets.ids_in(Bucket::Error))
        .collect();

    let mut cumulative: HashSet<&str> = HashSet::new();
    let mut tier_completion = |tier: RequirementTier| {
        let ids = requirements.tier(tier);
        let unmet_here: Vec<&str> = ids
            .iter()
            .map(String::as_str)
            .filter(|id| unmet.contains(id))
            .collect();
        let missing = if tier.is_mandatory() {
            cumulative.extend(unmet_here.iter().copied());
            cumulative.len()
        } else {
            unmet_here.len()
        };
        let met = ids.len() - unmet_here.len();
        TierCompletion {
            total: ids.len(),
            met,
            percent: percent(met, ids.len()),
            missing,
        }
    };

    let minimum = tier_completion(RequirementTier::Minimum);
    let intermediate = tier_completion(RequirementTier::Intermediate);
    let full = tier_completion(RequirementTier::Full);
    let optional = tier_completion(RequirementTier::Optional);
    Completion::Tiered {
        minimum,
        intermediate,
        full,
        optional,
    }
}

/// Share of the required set that ended up valid
pub fn required_set_completion(requirements: &EffectiveRequirements, buckets: &BucketIndex) -> Completion {
    let required = requirements.tier(RequirementTier::StronglyRecommended);
    let provided = required
        .iter()
        .filter(|id| buckets.bucket_of(id) == Some(Bucket::Valid))
        .count();
    Completion::RequiredSet {
        required: required.len(),
        provided,
        percent_completion: percent(provided, required.len()),
    }
}

/// Dataset ids the catalog has no schema entry for
pub fn unknown_lines(catalog: &Catalog, dataset: &Dataset) -> Vec<LineRecord> {
    dataset
        .ids()
        .filter(|id| !catalog.metrics.contains(id))
        .map(|id| {
            LineRecord::new(id)
                .with_raw_text(dataset.value(id).unwrap_or_default())
                .with_note("Unknown compound ID")
        })
        .collect()
}

/// Assemble the summary of one run
pub fn summarize(
    catalog: &Catalog,
    dataset: &Dataset,
    buckets: BucketIndex,
    requirements: &EffectiveRequirements,
    warnings: Vec<LineRecord>,
) -> Summary {
    let completion = match requirements {
        EffectiveRequirements::Tiered { .. } => tiered_completion(requirements, &buckets),
        EffectiveRequirements::RequiredSet { .. } => required_set_completion(requirements, &buckets),
    };

    let entity_name = dataset
        .non_empty_value(&catalog.entity_name_metric)
        .unwrap_or_else(|| catalog.entity_name_fallback())
        .to_string();

    let mut lines = buckets.into_contents();
    lines.unknown = unknown_lines(catalog, dataset);
    lines.warning = warnings;
    let counts = lines.counts();

    Summary {
        entity_name,
        report_kind: catalog.kind,
        catalog_version: catalog.version.clone(),
        counts,
        valid_lines: counts.valid,
        invalid_lines: counts.error + counts.missing,
        completion,
        lines,
    }
}
