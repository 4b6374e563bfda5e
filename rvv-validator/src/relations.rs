//! Relation evaluator
//!
//! Applies the catalog's cross-field rules once, in declaration order, after every
//! universe metric has been classified. A rule may move metrics between buckets;
//! later rules see those moves. Rule conditions are read from the dataset, not from
//! the buckets.

use crate::buckets::BucketIndex;
use crate::classifier::REASON_NOT_IN_FILE;
use crate::coercion::coerce_for;
use crate::requirements::EffectiveRequirements;
use crate::types::{Bucket, LineRecord};
use rvv_common::catalog::{ConditionalRequirement, Conflict, RelationRule, SubsetTotal, SumCheck};
use rvv_common::{Catalog, Dataset};
use tracing::debug;

pub const REASON_VALUE_BLANK: &str = "Value is blank";
pub const REASON_EXEMPT: &str = "Marked as not_applicable or not_available";

/// Mutable state a rule works on
pub struct RuleState<'s> {
    pub buckets: &'s mut BucketIndex,
    pub requirements: &'s mut EffectiveRequirements,
    pub warnings: &'s mut Vec<LineRecord>,
}

pub struct RelationEvaluator<'a> {
    catalog: &'a Catalog,
    dataset: &'a Dataset,
}

impl<'a> RelationEvaluator<'a> {
    pub fn new(catalog: &'a Catalog, dataset: &'a Dataset) -> Self {
        Self { catalog, dataset }
    }

    /// Apply every catalog rule in order
    pub fn evaluate_all(&self, state: &mut RuleState<'_>) {
        for rule in &self.catalog.relations {
            self.apply(rule, state);
        }
    }

    /// Apply one rule
    pub fn apply(&self, rule: &RelationRule, state: &mut RuleState<'_>) {
        match rule {
            RelationRule::ConditionalRequirement(rule) => self.conditional(rule, state),
            RelationRule::SubsetTotal(rule) => self.subset_total(rule, state),
            RelationRule::Conflict(rule) => self.conflict(rule, state),
            RelationRule::SumCheck(rule) => self.sum_check(rule, state),
        }
    }

    fn conditional(&self, rule: &ConditionalRequirement, state: &mut RuleState<'_>) {
        if self.dataset.value(&rule.condition_id) != Some(rule.condition_value.as_str()) {
            return;
        }

        let level = format!(
            "Strongly recommended because '{}' is '{}'",
            rule.condition_id, rule.condition_value
        );
        debug!(
            condition_id = %rule.condition_id,
            dependents = rule.dependent_ids.len(),
            "Conditional requirement triggered"
        );

        for dependent_id in &rule.dependent_ids {
            if !self.require_present(dependent_id, &level, state) {
                // Present with a value: only the valid record learns why it is required
                if state.buckets.bucket_of(dependent_id) == Some(Bucket::Valid) {
                    if let Some(record) = state.buckets.record_mut(dependent_id) {
                        record.requirement_level = Some(level.clone());
                    }
                }
            }
            state.requirements.escalate(&rule.condition_id, dependent_id);
        }
    }

    fn subset_total(&self, rule: &SubsetTotal, state: &mut RuleState<'_>) {
        let triggered = rule
            .condition_ids
            .iter()
            .any(|id| self.dataset.non_empty_value(id).is_some());
        if !triggered {
            return;
        }

        let level = format!(
            "Strongly recommended because at least one value is provided for {}",
            rule.condition_ids.join(", ")
        );
        debug!(total_field = %rule.total_field, "Subset total triggered");
        self.require_present(&rule.total_field, &level, state);
    }

    /// Escalate a now-required metric that has no usable value
    ///
    /// Returns false when the metric has a value and was left alone.
    fn require_present(&self, metric_id: &str, level: &str, state: &mut RuleState<'_>) -> bool {
        let Some(entry) = self.dataset.entry(metric_id) else {
            state.buckets.place(
                Bucket::Missing,
                LineRecord::new(metric_id)
                    .with_level(level)
                    .with_note(REASON_NOT_IN_FILE),
            );
            return true;
        };

        if entry.status.is_exempt() {
            state.buckets.place(
                Bucket::RecommendedButMissing,
                LineRecord::new(metric_id)
                    .with_level(level)
                    .with_note(REASON_EXEMPT),
            );
            true
        } else if entry.raw_value.is_empty() {
            state.buckets.place(
                Bucket::Missing,
                LineRecord::new(metric_id)
                    .with_level(level)
                    .with_note(REASON_VALUE_BLANK),
            );
            true
        } else {
            false
        }
    }

    fn conflict(&self, rule: &Conflict, state: &mut RuleState<'_>) {
        if self.dataset.value(&rule.trigger_field) != Some(rule.trigger_value.as_str()) {
            return;
        }

        for field in &rule.conflicting_fields {
            if self.dataset.value(field) != Some("yes") {
                continue;
            }
            let level = state
                .buckets
                .record(field)
                .and_then(|record| record.requirement_level.clone());
            let mut record = LineRecord::new(field.as_str())
                .with_raw_text("yes")
                .with_note(format!(
                    "Conflict: '{field}' is 'yes' but '{trigger}' is also '{value}'. If '{trigger}' is '{value}', then '{field}' should be 'no'.",
                    field = field,
                    trigger = rule.trigger_field,
                    value = rule.trigger_value,
                ));
            record.requirement_level = level;

            let previous = state.buckets.place(Bucket::Error, record);
            debug!(field = %field, trigger = %rule.trigger_field, ?previous, "Conflict");
        }
    }

    fn sum_check(&self, rule: &SumCheck, state: &mut RuleState<'_>) {
        let Some(total_raw) = self.dataset.non_empty_value(&rule.total_field) else {
            return;
        };
        let total = coerce_for(self.catalog.spec(&rule.total_field), total_raw);
        let Some(total_value) = total.as_number() else {
            return;
        };

        let mut sum = 0.0;
        let mut all_integer = true;
        let mut found: Vec<&str> = Vec::new();
        for field in &rule.component_fields {
            let Some(raw) = self.dataset.non_empty_value(field) else {
                continue;
            };
            let value = coerce_for(self.catalog.spec(field), raw);
            if let Some(number) = value.as_number() {
                sum += number;
                all_integer &= value.is_integer();
                found.push(field);
            }
        }
        if found.is_empty() {
            return;
        }

        if !is_mismatch(total_value, sum, rule.tolerance_percent) {
            return;
        }

        let shown_sum = if all_integer {
            format!("{}", sum as i64)
        } else {
            format!("{:?}", sum)
        };
        let note = format!(
            "Sum mismatch: '{}' is {}, but sum of [{}] is {}. Difference exceeds {}% tolerance.",
            rule.total_field,
            total,
            found.join(", "),
            shown_sum,
            rule.tolerance_percent
        );
        debug!(total_field = %rule.total_field, total_value, sum, "Sum mismatch");
        state.warnings.push(
            LineRecord::new(rule.total_field.as_str())
                .with_raw_text(total_raw)
                .with_note(note),
        );
    }
}

/// Tolerance test of a sum check
///
/// A zero total only matches a zero sum; otherwise the difference may be up to
/// `tolerance_percent` of the total.
pub fn is_mismatch(total: f64, sum: f64, tolerance_percent: f64) -> bool {
    if total == 0.0 {
        sum != 0.0
    } else {
        let tolerance = total.abs() * (tolerance_percent / 100.0);
        (total - sum).abs() > tolerance
    }
}
