//! Validation orchestrator
//!
//! One run = classify every universe metric, apply the relation rules, aggregate.
//! The run reads the catalog and dataset only, so any number of runs may share one
//! catalog across threads.

use crate::aggregator;
use crate::buckets::BucketIndex;
use crate::classifier::Classifier;
use crate::relations::{RelationEvaluator, RuleState};
use crate::requirements::EffectiveRequirements;
use crate::types::Summary;
use rvv_common::{Catalog, Dataset};
use tracing::{debug, info};

/// Validate one entity's dataset against a catalog
///
/// Never fails: every problem with a value ends up as a record in the summary.
pub fn validate(dataset: &Dataset, catalog: &Catalog) -> Summary {
    let classifier = Classifier::new(catalog, dataset);
    let mut buckets = BucketIndex::new();
    for metric_id in &catalog.universe {
        let (bucket, record) = classifier.classify(metric_id);
        buckets.place(bucket, record);
    }
    debug!(
        kind = %catalog.kind,
        classified = buckets.len(),
        fte = ?classifier.fte(),
        "Classification complete"
    );

    let mut requirements = EffectiveRequirements::from_model(&catalog.requirements);
    let mut warnings = Vec::new();
    let evaluator = RelationEvaluator::new(catalog, dataset);
    evaluator.evaluate_all(&mut RuleState {
        buckets: &mut buckets,
        requirements: &mut requirements,
        warnings: &mut warnings,
    });

    let summary = aggregator::summarize(catalog, dataset, buckets, &requirements, warnings);
    info!(
        entity = %summary.entity_name,
        kind = %catalog.kind,
        valid = summary.valid_lines,
        invalid = summary.invalid_lines,
        completion = %summary.completion.display_string(),
        "Validated"
    );
    summary
}
