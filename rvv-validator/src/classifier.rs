//! Metric classifier
//!
//! Decides the initial bucket of a single universe metric from its dataset row, its
//! schema entry and its static requirement tier. Cross-field rules run afterwards
//! and may move the metric again.
//!
//! # Precedence
//! 1. Absent from the dataset → missing
//! 2. Marked not_applicable / not_available → blank, or recommended-but-missing when
//!    the metric is required of this entity (see [`Classifier`])
//! 3. Provided with an empty value → error
//! 4. Provided with a value → valid when it passes the schema, error otherwise
//! 5. Any other status → error

use crate::coercion::{check, coerce_for, describe_errors, TypedValue};
use crate::interpreter::Interpreter;
use crate::types::{Bucket, LineRecord};
use rvv_common::catalog::{RequirementModel, RequirementTier, TieredRequirements};
use rvv_common::{Catalog, Dataset, Status};
use tracing::{debug, warn};

pub const REASON_NOT_IN_FILE: &str = "Not in import file at all";
pub const REASON_NOT_APPLICABLE: &str = "Marked as not applicable in import file";
pub const REASON_NOT_AVAILABLE: &str = "Marked as not available in import file";
pub const REASON_BLANK_PROVIDED: &str = "Value is blank but marked as 'provided'.";

const EXEMPT_MINIMUM: &str =
    "Status is 'not_applicable' or 'not_available', but this is a 'minimum' metric.";
const EXEMPT_INTERMEDIATE: &str = "Status is 'not_applicable' or 'not_available', but this is an 'intermediate' metric for companies with FTE higher than 15.";
const EXEMPT_FULL: &str = "Status is 'not_applicable' or 'not_available', but all metrics are strongly recommended for companies with FTE higher than 250.";
const EXEMPT_STRONGLY_RECOMMENDED: &str =
    "Status is 'not_applicable' or 'not_available', but this is a strongly recommended metric.";

/// What is known about the entity's head count
///
/// Only company reports use it. The FTE metric may be absent, blank or unparseable;
/// none of these is a fault, they make the requirement level unknown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FteContext {
    Known(f64),
    Blank,
    Absent,
    NotNumeric,
}

impl FteContext {
    pub fn from_dataset(dataset: &Dataset, catalog: &Catalog, tiers: &TieredRequirements) -> Self {
        let metric = tiers.fte_metric.as_str();
        let context = match dataset.value(metric) {
            None => FteContext::Absent,
            Some("") => FteContext::Blank,
            Some(raw) => match coerce_for(catalog.spec(metric), raw).as_number() {
                Some(ftes) => FteContext::Known(ftes),
                None => FteContext::NotNumeric,
            },
        };
        if context == FteContext::Absent {
            warn!(
                fte_metric = metric,
                "FTE metric not in import file; exempt intermediate/full metrics get an unknown requirement level"
            );
        }
        context
    }

    pub fn known(&self) -> Option<f64> {
        match self {
            FteContext::Known(ftes) => Some(*ftes),
            _ => None,
        }
    }
}

/// Initial classification of universe metrics for one dataset
pub struct Classifier<'a> {
    catalog: &'a Catalog,
    dataset: &'a Dataset,
    interpreter: Interpreter<'a>,
    fte: Option<FteContext>,
}

impl<'a> Classifier<'a> {
    pub fn new(catalog: &'a Catalog, dataset: &'a Dataset) -> Self {
        let fte = match &catalog.requirements {
            RequirementModel::Tiered(tiers) => Some(FteContext::from_dataset(dataset, catalog, tiers)),
            RequirementModel::RequiredSet(_) => None,
        };
        Self {
            catalog,
            dataset,
            interpreter: Interpreter::new(catalog, dataset),
            fte,
        }
    }

    pub fn fte(&self) -> Option<FteContext> {
        self.fte
    }

    /// Bucket and record for one universe metric
    pub fn classify(&self, metric_id: &str) -> (Bucket, LineRecord) {
        let tier = self.catalog.tier_of(metric_id);

        let Some(entry) = self.dataset.entry(metric_id) else {
            return (
                Bucket::Missing,
                LineRecord::new(metric_id)
                    .with_level(tier.missing_label())
                    .with_note(REASON_NOT_IN_FILE),
            );
        };

        let raw = entry.raw_value.as_str();
        let (bucket, record) = match &entry.status {
            Status::NotApplicable | Status::NotAvailable => {
                self.classify_exempt(metric_id, tier, &entry.status)
            }
            Status::Provided if raw.is_empty() => (
                Bucket::Error,
                LineRecord::new(metric_id)
                    .with_raw_text(raw)
                    .with_level(tier.label())
                    .with_note(REASON_BLANK_PROVIDED),
            ),
            Status::Provided => self.classify_value(metric_id, tier, raw),
            Status::Other(status) => (
                Bucket::Error,
                LineRecord::new(metric_id)
                    .with_raw_text(raw)
                    .with_level(tier.label())
                    .with_note(format!("Unknown value in 'STATUS' column: {}.", status)),
            ),
        };

        debug!(metric_id, bucket = %bucket, "Classified");
        (bucket, record)
    }

    fn classify_value(&self, metric_id: &str, tier: RequirementTier, raw: &str) -> (Bucket, LineRecord) {
        let spec = self.catalog.spec(metric_id);
        let typed = coerce_for(spec, raw);

        let outcome = match spec {
            Some(spec) => check(spec, &typed),
            None => Ok(()),
        };

        match outcome {
            Ok(()) => (
                Bucket::Valid,
                LineRecord::new(metric_id)
                    .with_raw(typed)
                    .with_interpreted(self.interpreter.interpret(metric_id, raw))
                    .with_level(tier.label()),
            ),
            Err(errors) => (
                Bucket::Error,
                LineRecord::new(metric_id)
                    .with_raw(TypedValue::Text(raw.to_string()))
                    .with_level(tier.label())
                    .with_note(describe_errors(metric_id, &errors)),
            ),
        }
    }

    fn classify_exempt(&self, metric_id: &str, tier: RequirementTier, status: &Status) -> (Bucket, LineRecord) {
        let reason = if *status == Status::NotApplicable {
            REASON_NOT_APPLICABLE
        } else {
            REASON_NOT_AVAILABLE
        };
        let record = LineRecord::new(metric_id).with_level(tier.label());

        match self.escalation(tier) {
            Some(note) => (Bucket::RecommendedButMissing, record.with_note(note)),
            None => (Bucket::Blank, record.with_note(reason)),
        }
    }

    /// Why an exempt metric is still required of this entity, if it is
    fn escalation(&self, tier: RequirementTier) -> Option<String> {
        match tier {
            RequirementTier::Minimum => Some(EXEMPT_MINIMUM.to_string()),
            RequirementTier::StronglyRecommended => Some(EXEMPT_STRONGLY_RECOMMENDED.to_string()),
            RequirementTier::Intermediate | RequirementTier::Full => {
                let RequirementModel::Tiered(tiers) = &self.catalog.requirements else {
                    return None;
                };
                let Some(ftes) = self.fte.and_then(|fte| fte.known()) else {
                    return Some(format!(
                        "Status is 'not_applicable' or 'not_available'. Unknown level of requirement for this company since {} is not provided.",
                        tiers.fte_metric
                    ));
                };
                if tier == RequirementTier::Intermediate && ftes >= tiers.intermediate_fte_threshold {
                    Some(EXEMPT_INTERMEDIATE.to_string())
                } else if tier == RequirementTier::Full && ftes >= tiers.full_fte_threshold {
                    Some(EXEMPT_FULL.to_string())
                } else {
                    None
                }
            }
            RequirementTier::Optional | RequirementTier::NotRequired => None,
        }
    }
}
