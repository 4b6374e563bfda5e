//! End-to-end tests of the validation pipeline
//!
//! classify → relate → aggregate against the fixture catalogs and the built-in ones.

mod helpers;

use helpers::*;
use proptest::prelude::*;
use rvv_common::catalog::{ConditionalRequirement, RelationRule, RequirementModel, SumCheck};
use rvv_common::{Catalog, Dataset, ReportKind};
use rvv_validator::classifier::{REASON_BLANK_PROVIDED, REASON_NOT_IN_FILE};
use rvv_validator::relations::{is_mismatch, REASON_EXEMPT, REASON_VALUE_BLANK};
use rvv_validator::types::{Bucket, Completion, Summary, TierCompletion};
use rvv_validator::validate;

fn tiers(summary: &Summary) -> (TierCompletion, TierCompletion, TierCompletion, TierCompletion) {
    match summary.completion {
        Completion::Tiered {
            minimum,
            intermediate,
            full,
            optional,
        } => (minimum, intermediate, full, optional),
        ref other => panic!("tiered completion expected, got {:?}", other),
    }
}

fn required_set(summary: &Summary) -> (usize, usize, f64) {
    match summary.completion {
        Completion::RequiredSet {
            required,
            provided,
            percent_completion,
        } => (required, provided, percent_completion),
        ref other => panic!("required-set completion expected, got {:?}", other),
    }
}

// =============================================================================
// Company (tiered) fixture
// =============================================================================

#[test]
fn test_complete_company_is_fully_valid() {
    let catalog = company_catalog();
    let summary = validate(&complete_company(), &catalog);

    assert_exclusive(&catalog, &summary);
    assert_eq!(summary.entity_name, "Acme Ltd");
    assert_eq!(summary.report_kind, ReportKind::Company);
    assert_eq!(summary.catalog_version, "fixture");
    assert_eq!(summary.counts.valid, 13);
    assert_eq!(summary.counts.blank, 4);
    assert_eq!(summary.counts.warning, 0);
    assert_eq!(summary.valid_lines, 13);
    assert_eq!(summary.invalid_lines, 0);

    let (minimum, intermediate, full, optional) = tiers(&summary);
    assert_eq!(minimum, TierCompletion { total: 8, met: 8, percent: 100.0, missing: 0 });
    assert_eq!(intermediate.percent, 100.0);
    assert_eq!(full.percent, 100.0);
    assert_eq!(optional.percent, 100.0);
}

#[test]
fn test_valid_values_carry_label_and_unit() {
    let catalog = company_catalog();
    let summary = validate(&complete_company(), &catalog);

    let interpreted = |id: &str| {
        summary
            .lines
            .find(id)
            .and_then(|record| record.interpreted_value.clone())
            .unwrap()
    };
    assert_eq!(interpreted("gross_revenue"), "100 EUR");
    assert_eq!(interpreted("total_ftes"), "20 FTEs");
    assert_eq!(interpreted("energy_total"), "50 MWh");
    assert_eq!(interpreted("listed"), "No");
    assert_eq!(interpreted("currency"), "Euro");
    assert_eq!(interpreted("company_name"), "Acme Ltd");
}

#[test]
fn test_currency_unit_dropped_without_currency() {
    let catalog = company_catalog();
    let summary = validate(&company_with(&[], &["currency"]), &catalog);

    let record = summary.lines.find("gross_revenue").unwrap();
    assert_eq!(summary.lines.bucket_of("gross_revenue"), Some(Bucket::Valid));
    assert_eq!(record.interpreted_value.as_deref(), Some("100"));
    assert_eq!(summary.lines.bucket_of("currency"), Some(Bucket::Missing));
}

#[test]
fn test_pipeline_is_idempotent() {
    let catalog = company_catalog();
    let dataset = company_with(
        &[("tobacco", "yes", "provided"), ("responsibility_none", "yes", "provided")],
        &["tobacco_share"],
    );
    assert_eq!(validate(&dataset, &catalog), validate(&dataset, &catalog));
}

#[test]
fn test_blank_provided_value_is_error() {
    let catalog = company_catalog();
    let summary = validate(&company_with(&[("listed", "", "provided")], &[]), &catalog);

    assert_eq!(summary.lines.bucket_of("listed"), Some(Bucket::Error));
    let record = summary.lines.find("listed").unwrap();
    assert_eq!(record.note.as_deref(), Some(REASON_BLANK_PROVIDED));
    assert_eq!(record.requirement_level.as_deref(), Some("Minimum"));
}

#[test]
fn test_schema_violations_are_errors() {
    let catalog = company_catalog();
    let dataset = company_with(
        &[
            ("listed", "maybe", "provided"),
            ("gross_revenue", "lots", "provided"),
            ("energy_total", "-5", "provided"),
        ],
        &[],
    );
    let summary = validate(&dataset, &catalog);
    assert_exclusive(&catalog, &summary);

    let note = |id: &str| summary.lines.find(id).and_then(|r| r.note.clone()).unwrap();
    assert!(note("listed").contains("unallowed value maybe"));
    assert!(note("gross_revenue").contains("must be of float type"));
    assert!(note("energy_total").contains("min value is 0"));
    assert_eq!(summary.counts.error, 3);
    assert_eq!(summary.invalid_lines, 3);
}

#[test]
fn test_unknown_status_is_error() {
    let catalog = company_catalog();
    let summary = validate(&company_with(&[("policy_a", "yes", "pending")], &[]), &catalog);

    assert_eq!(summary.lines.bucket_of("policy_a"), Some(Bucket::Error));
    let note = summary.lines.find("policy_a").and_then(|r| r.note.clone()).unwrap();
    assert_eq!(note, "Unknown value in 'STATUS' column: pending.");
}

#[test]
fn test_absent_metric_is_missing() {
    let catalog = company_catalog();
    let summary = validate(&company_with(&[], &["board_report", "notes"]), &catalog);

    assert_eq!(summary.lines.bucket_of("board_report"), Some(Bucket::Missing));
    assert_eq!(summary.lines.bucket_of("notes"), Some(Bucket::Missing));
    let notes = summary.lines.find("notes").unwrap();
    assert_eq!(notes.note.as_deref(), Some(REASON_NOT_IN_FILE));
    assert_eq!(notes.requirement_level.as_deref(), Some("Value not required (optional)"));

    let (minimum, _, full, optional) = tiers(&summary);
    assert_eq!(minimum.missing, 0);
    assert_eq!(full, TierCompletion { total: 2, met: 1, percent: 50.0, missing: 1 });
    assert_eq!(optional.missing, 1);
    assert_eq!(optional.percent, 75.0);
}

#[test]
fn test_entity_name_falls_back() {
    let catalog = company_catalog();
    let summary = validate(&company_with(&[("company_name", "", "not_applicable")], &[]), &catalog);
    assert_eq!(summary.entity_name, "Unknown Company");
    // Minimum metrics are never exempt
    assert_eq!(
        summary.lines.bucket_of("company_name"),
        Some(Bucket::RecommendedButMissing)
    );

    // Present but blank names fall back as well
    let summary = validate(&company_with(&[("company_name", "", "provided")], &[]), &catalog);
    assert_eq!(summary.entity_name, "Unknown Company");
    let summary = validate(&company_with(&[], &["company_name"]), &catalog);
    assert_eq!(summary.entity_name, "Unknown Company");
}

#[test]
fn test_unknown_ids_are_reported_separately() {
    let catalog = company_catalog();
    let dataset = complete_company().with("mystery_metric", "42", "provided");
    let summary = validate(&dataset, &catalog);

    assert_exclusive(&catalog, &summary);
    assert_eq!(summary.counts.unknown, 1);
    assert_eq!(summary.lines.unknown[0].compound_id, "mystery_metric");
    assert_eq!(summary.lines.unknown[0].note.as_deref(), Some("Unknown compound ID"));
    assert_eq!(summary.lines.bucket_of("mystery_metric"), None);
    let (minimum, ..) = tiers(&summary);
    assert_eq!(minimum.total, 8);
}

// =============================================================================
// FTE-dependent requirement levels
// =============================================================================

#[test]
fn test_intermediate_exempt_escalates_above_threshold() {
    let catalog = company_catalog();

    let big = company_with(&[("policy_a", "", "not_available"), ("total_ftes", "20", "provided")], &[]);
    let summary = validate(&big, &catalog);
    assert_eq!(
        summary.lines.bucket_of("policy_a"),
        Some(Bucket::RecommendedButMissing)
    );

    let small = company_with(&[("policy_a", "", "not_available"), ("total_ftes", "10", "provided")], &[]);
    let summary = validate(&small, &catalog);
    assert_eq!(summary.lines.bucket_of("policy_a"), Some(Bucket::Blank));
    assert_eq!(
        summary.lines.find("policy_a").and_then(|r| r.note.as_deref()),
        Some("Marked as not available in import file")
    );
}

#[test]
fn test_full_exempt_escalates_above_full_threshold() {
    let catalog = company_catalog();

    let mid = company_with(&[("board_report", "", "not_applicable")], &[]);
    assert_eq!(
        validate(&mid, &catalog).lines.bucket_of("board_report"),
        Some(Bucket::Blank)
    );

    let large = company_with(
        &[("board_report", "", "not_applicable"), ("total_ftes", "300", "provided")],
        &[],
    );
    assert_eq!(
        validate(&large, &catalog).lines.bucket_of("board_report"),
        Some(Bucket::RecommendedButMissing)
    );
}

#[test]
fn test_unknown_fte_makes_exempt_metrics_recommended() {
    let catalog = company_catalog();
    for dataset in [
        company_with(&[("policy_a", "", "not_available")], &["total_ftes"]),
        company_with(&[("policy_a", "", "not_available"), ("total_ftes", "", "not_available")], &[]),
        company_with(&[("policy_a", "", "not_available"), ("total_ftes", "many", "provided")], &[]),
    ] {
        let summary = validate(&dataset, &catalog);
        assert_exclusive(&catalog, &summary);
        assert_eq!(
            summary.lines.bucket_of("policy_a"),
            Some(Bucket::RecommendedButMissing)
        );
        let note = summary.lines.find("policy_a").and_then(|r| r.note.clone()).unwrap();
        assert!(note.contains("Unknown level of requirement"), "{}", note);
        assert!(note.contains("total_ftes"));
    }
}

// =============================================================================
// Relation rules
// =============================================================================

#[test]
fn test_conditional_requirement_marks_dependent_missing() {
    let catalog = company_catalog();
    let dataset = company_with(&[("tobacco", "yes", "provided")], &["tobacco_share"]);
    let summary = validate(&dataset, &catalog);

    assert_exclusive(&catalog, &summary);
    assert_eq!(summary.lines.bucket_of("tobacco_share"), Some(Bucket::Missing));
    let record = summary.lines.find("tobacco_share").unwrap();
    assert!(record.requirement_level.as_deref().unwrap().contains("'tobacco' is 'yes'"));
    assert_eq!(record.note.as_deref(), Some(REASON_NOT_IN_FILE));

    // The dependent joins the tier of its condition
    let (minimum, ..) = tiers(&summary);
    assert_eq!(minimum.total, 9);
    assert_eq!(minimum.met, 8);
    assert_eq!(minimum.percent, 88.89);
    assert_eq!(minimum.missing, 1);
}

#[test]
fn test_conditional_requirement_exempt_dependent() {
    let catalog = company_catalog();
    let summary = validate(&company_with(&[("tobacco", "yes", "provided")], &[]), &catalog);

    assert_eq!(
        summary.lines.bucket_of("tobacco_share"),
        Some(Bucket::RecommendedButMissing)
    );
    assert_eq!(
        summary.lines.find("tobacco_share").and_then(|r| r.note.as_deref()),
        Some(REASON_EXEMPT)
    );
}

#[test]
fn test_conditional_requirement_moves_blank_dependent_out_of_error() {
    let catalog = company_catalog();
    let dataset = company_with(
        &[("tobacco", "yes", "provided"), ("tobacco_share", "", "provided")],
        &[],
    );
    let summary = validate(&dataset, &catalog);

    assert_exclusive(&catalog, &summary);
    assert_eq!(summary.lines.bucket_of("tobacco_share"), Some(Bucket::Missing));
    assert!(summary.lines.error.iter().all(|r| r.compound_id != "tobacco_share"));
    assert_eq!(summary.counts.error, 0);

    let record = summary.lines.find("tobacco_share").unwrap();
    assert_eq!(record.note.as_deref(), Some(REASON_VALUE_BLANK));
    assert_eq!(
        record.requirement_level.as_deref(),
        Some("Strongly recommended because 'tobacco' is 'yes'")
    );
}

#[test]
fn test_conditional_requirement_annotates_valid_dependent() {
    let catalog = company_catalog();
    let dataset = company_with(
        &[("tobacco", "yes", "provided"), ("tobacco_share", "12.5", "provided")],
        &[],
    );
    let summary = validate(&dataset, &catalog);

    assert_eq!(summary.lines.bucket_of("tobacco_share"), Some(Bucket::Valid));
    let record = summary.lines.find("tobacco_share").unwrap();
    assert_eq!(record.interpreted_value.as_deref(), Some("12.5 %"));
    assert_eq!(
        record.requirement_level.as_deref(),
        Some("Strongly recommended because 'tobacco' is 'yes'")
    );
}

#[test]
fn test_conditional_requirement_not_triggered() {
    let catalog = company_catalog();
    let summary = validate(&company_with(&[("tobacco", "no", "provided")], &["tobacco_share"]), &catalog);

    let record = summary.lines.find("tobacco_share").unwrap();
    assert_eq!(summary.lines.bucket_of("tobacco_share"), Some(Bucket::Missing));
    assert_eq!(record.requirement_level.as_deref(), Some("Value not required (optional)"));
    let (minimum, ..) = tiers(&summary);
    assert_eq!(minimum.total, 8);
}

#[test]
fn test_subset_total_requires_total() {
    let catalog = company_catalog();
    let dataset = company_with(&[("energy_renewable", "20", "provided")], &["energy_total"]);
    let summary = validate(&dataset, &catalog);

    assert_eq!(summary.lines.bucket_of("energy_total"), Some(Bucket::Missing));
    assert_eq!(
        summary.lines.find("energy_total").and_then(|r| r.requirement_level.as_deref()),
        Some("Strongly recommended because at least one value is provided for energy_renewable")
    );

    // Exempt total: blank below the full threshold, escalated by the component
    let dataset = company_with(
        &[("energy_renewable", "20", "provided"), ("energy_total", "", "not_applicable")],
        &[],
    );
    let summary = validate(&dataset, &catalog);
    assert_eq!(
        summary.lines.bucket_of("energy_total"),
        Some(Bucket::RecommendedButMissing)
    );
}

#[test]
fn test_subset_total_moves_blank_total_out_of_error() {
    let catalog = company_catalog();
    let dataset = company_with(
        &[("energy_renewable", "20", "provided"), ("energy_total", "", "provided")],
        &[],
    );
    let summary = validate(&dataset, &catalog);

    assert_exclusive(&catalog, &summary);
    assert_eq!(summary.lines.bucket_of("energy_total"), Some(Bucket::Missing));
    assert!(summary.lines.error.iter().all(|r| r.compound_id != "energy_total"));
    assert_eq!(summary.counts.error, 0);

    let record = summary.lines.find("energy_total").unwrap();
    assert_eq!(record.note.as_deref(), Some(REASON_VALUE_BLANK));
    assert_eq!(
        record.requirement_level.as_deref(),
        Some("Strongly recommended because at least one value is provided for energy_renewable")
    );
}

#[test]
fn test_conflict_forces_error() {
    let catalog = company_catalog();
    let dataset = company_with(&[("responsibility_none", "yes", "provided")], &[]);
    let summary = validate(&dataset, &catalog);

    assert_exclusive(&catalog, &summary);
    assert_eq!(summary.lines.bucket_of("responsibility_cfo"), Some(Bucket::Error));
    assert!(summary.lines.valid.iter().all(|r| r.compound_id != "responsibility_cfo"));
    assert_eq!(summary.lines.bucket_of("responsibility_none"), Some(Bucket::Valid));

    let record = summary.lines.find("responsibility_cfo").unwrap();
    assert!(record.note.as_deref().unwrap().starts_with("Conflict: 'responsibility_cfo' is 'yes'"));
    assert_eq!(record.requirement_level.as_deref(), Some("Minimum"));

    let (minimum, ..) = tiers(&summary);
    assert_eq!(minimum.met, 7);
    assert_eq!(minimum.percent, 87.5);
}

#[test]
fn test_conflict_ignores_no() {
    let catalog = company_catalog();
    let dataset = company_with(
        &[("responsibility_none", "yes", "provided"), ("responsibility_cfo", "no", "provided")],
        &[],
    );
    let summary = validate(&dataset, &catalog);
    assert_eq!(summary.lines.bucket_of("responsibility_cfo"), Some(Bucket::Valid));
}

#[test]
fn test_sum_check_tolerance_boundary() {
    let catalog = company_catalog();

    let at_boundary = company_with(&[("revenue_non_eu", "45", "provided")], &[]);
    let summary = validate(&at_boundary, &catalog);
    assert!(summary.lines.warning.is_empty());

    let beyond = company_with(&[("revenue_non_eu", "46", "provided")], &[]);
    let summary = validate(&beyond, &catalog);
    assert_eq!(summary.counts.warning, 1);
    let warning = &summary.lines.warning[0];
    assert_eq!(warning.compound_id, "gross_revenue");
    let note = warning.note.as_deref().unwrap();
    assert!(note.starts_with("Sum mismatch: 'gross_revenue'"), "{}", note);
    assert!(note.contains("[revenue_eu, revenue_non_eu]"));
    assert!(note.ends_with("Difference exceeds 5% tolerance."));

    // A warning never moves the total out of valid
    assert_eq!(summary.lines.bucket_of("gross_revenue"), Some(Bucket::Valid));
    assert_eq!(summary.invalid_lines, 0);
}

#[test]
fn test_sum_check_uses_present_components_only() {
    let catalog = company_catalog();
    let dataset = company_with(&[("revenue_non_eu", "", "not_available")], &[]);
    let summary = validate(&dataset, &catalog);

    let note = summary.lines.warning[0].note.clone().unwrap();
    assert!(note.contains("[revenue_eu]"), "{}", note);
}

#[test]
fn test_sum_check_silent_without_components() {
    let catalog = company_catalog();
    let dataset = company_with(&[], &["revenue_eu", "revenue_non_eu"]);
    assert!(validate(&dataset, &catalog).lines.warning.is_empty());
}

#[test]
fn test_rules_apply_in_declaration_order() {
    let responsibility_rule = RelationRule::ConditionalRequirement(ConditionalRequirement {
        condition_id: "responsibility_none".into(),
        condition_value: "yes".into(),
        dependent_ids: vec!["responsibility_cfo".into()],
    });
    let dataset = company_with(&[("responsibility_none", "yes", "provided")], &[]);

    // Requirement first: the valid CFO line is annotated, then moved to error with its level
    let mut requirement_first = company_catalog();
    requirement_first.relations.insert(0, responsibility_rule.clone());
    let summary = validate(&dataset, &requirement_first);
    assert_eq!(summary.lines.bucket_of("responsibility_cfo"), Some(Bucket::Error));
    assert_eq!(
        summary.lines.find("responsibility_cfo").and_then(|r| r.requirement_level.as_deref()),
        Some("Strongly recommended because 'responsibility_none' is 'yes'")
    );

    // Conflict first: the requirement no longer sees a valid line to annotate
    let mut conflict_first = company_catalog();
    conflict_first.relations.push(responsibility_rule);
    let summary = validate(&dataset, &conflict_first);
    assert_eq!(summary.lines.bucket_of("responsibility_cfo"), Some(Bucket::Error));
    assert_eq!(
        summary.lines.find("responsibility_cfo").and_then(|r| r.requirement_level.as_deref()),
        Some("Minimum")
    );
}

#[test]
fn test_escalated_total_leaves_sum_check_silent() {
    let mut catalog = company_catalog();
    catalog.relations.push(RelationRule::SumCheck(SumCheck {
        total_field: "energy_total".into(),
        component_fields: vec!["energy_renewable".into()],
        tolerance_percent: 1.0,
    }));
    let dataset = company_with(
        &[("energy_renewable", "20", "provided"), ("energy_total", "", "not_applicable")],
        &[],
    );
    let summary = validate(&dataset, &catalog);

    assert_eq!(
        summary.lines.bucket_of("energy_total"),
        Some(Bucket::RecommendedButMissing)
    );
    assert!(summary.lines.warning.is_empty());

    // With a reported total the same rule fires
    let dataset = dataset.with("energy_total", "50", "provided");
    let summary = validate(&dataset, &catalog);
    assert_eq!(summary.counts.warning, 1);
    assert_eq!(summary.lines.warning[0].compound_id, "energy_total");
}

// =============================================================================
// Fund / GP (required set)
// =============================================================================

fn complete_fund() -> Dataset {
    dataset(&[
        ("fund_name", "Alpha Fund I", "provided"),
        ("vintage", "2015", "provided"),
        ("fund_size", "1000", "provided"),
        ("adhere_to_ungc", "yes", "provided"),
        ("article", "8", "provided"),
        ("website", "", "not_available"),
    ])
}

#[test]
fn test_fund_completion_ratio() {
    let catalog = fund_catalog();
    let dataset = dataset(&[
        ("fund_name", "Alpha Fund I", "provided"),
        ("vintage", "2015", "provided"),
        ("fund_size", "1000", "provided"),
        ("adhere_to_ungc", "maybe", "provided"),
    ]);
    let summary = validate(&dataset, &catalog);

    assert_exclusive(&catalog, &summary);
    assert_eq!(required_set(&summary), (5, 3, 60.0));
    assert_eq!(summary.entity_name, "Alpha Fund I");
    assert_eq!(
        summary.lines.find("fund_size").and_then(|r| r.interpreted_value.as_deref()),
        Some("1000 EUR")
    );
}

#[test]
fn test_fund_exempt_metrics() {
    let catalog = fund_catalog();
    let dataset = complete_fund().with("vintage", "", "not_available");
    let summary = validate(&dataset, &catalog);

    assert_eq!(
        summary.lines.bucket_of("vintage"),
        Some(Bucket::RecommendedButMissing)
    );
    assert_eq!(summary.lines.bucket_of("website"), Some(Bucket::Blank));
    assert_eq!(required_set(&summary), (5, 4, 80.0));
}

#[test]
fn test_fund_conditional_extends_required_set() {
    let catalog = fund_catalog();
    let dataset = complete_fund().with("adhere_to_ungc", "no", "provided");
    let summary = validate(&dataset, &catalog);

    assert_eq!(
        summary.lines.bucket_of("no_ungc_explanation"),
        Some(Bucket::Missing)
    );
    assert_eq!(required_set(&summary), (6, 5, 83.33));

    let dataset = dataset.with("no_ungc_explanation", "Policy under review", "provided");
    assert_eq!(required_set(&validate(&dataset, &catalog)), (6, 6, 100.0));
}

#[test]
fn test_fund_integer_type() {
    let catalog = fund_catalog();
    let summary = validate(&complete_fund().with("vintage", "2015.5", "provided"), &catalog);
    assert_eq!(summary.lines.bucket_of("vintage"), Some(Bucket::Error));
    assert!(summary
        .lines
        .find("vintage")
        .and_then(|r| r.note.as_deref())
        .unwrap()
        .contains("must be of integer type"));
}

// =============================================================================
// Built-in catalogs
// =============================================================================

#[test]
fn test_builtin_gp_with_empty_dataset() {
    let catalog = Catalog::builtin(ReportKind::Gp).unwrap();
    let summary = validate(&Dataset::new(), &catalog);

    assert_exclusive(&catalog, &summary);
    assert_eq!(summary.entity_name, "Unknown GP");
    assert_eq!(summary.counts.missing, catalog.universe.len());

    let RequirementModel::RequiredSet(required) = &catalog.requirements else {
        panic!("GP catalog uses a required set");
    };
    assert_eq!(required_set(&summary), (required.required.len(), 0, 0.0));
}

#[test]
fn test_builtin_company_tobacco_requirement() {
    let catalog = Catalog::builtin(ReportKind::Company).unwrap();
    let dataset = Dataset::new()
        .with("company_name", "Acme Ltd", "provided")
        .with("total_ftes_end_of_report_year", "20", "provided")
        .with("tobacco_activities", "yes", "provided");
    let summary = validate(&dataset, &catalog);

    assert_exclusive(&catalog, &summary);
    assert_eq!(
        summary.lines.bucket_of("percentage_turnover_tobacco_activities"),
        Some(Bucket::Missing)
    );
    let record = summary
        .lines
        .find("percentage_turnover_tobacco_activities")
        .unwrap();
    assert!(record
        .requirement_level
        .as_deref()
        .unwrap()
        .contains("tobacco_activities"));
}

#[test]
fn test_builtin_company_responsibility_conflict() {
    let catalog = Catalog::builtin(ReportKind::Company).unwrap();
    let dataset = Dataset::new()
        .with("sustainability_responsibility_none", "yes", "provided")
        .with("sustainability_responsibility_cfo", "yes", "provided");
    let summary = validate(&dataset, &catalog);

    assert_exclusive(&catalog, &summary);
    assert_eq!(
        summary.lines.bucket_of("sustainability_responsibility_cfo"),
        Some(Bucket::Error)
    );
}

#[test]
fn test_builtin_company_fte_escalation() {
    let catalog = Catalog::builtin(ReportKind::Company).unwrap();
    let bucket_with_ftes = |ftes: &str| {
        let dataset = Dataset::new()
            .with("total_ftes_end_of_report_year", ftes, "provided")
            .with("primary_country_of_operations", "", "not_available");
        validate(&dataset, &catalog)
            .lines
            .bucket_of("primary_country_of_operations")
    };
    assert_eq!(bucket_with_ftes("20"), Some(Bucket::RecommendedButMissing));
    assert_eq!(bucket_with_ftes("10"), Some(Bucket::Blank));
}

#[test]
fn test_builtin_company_emissions_sum_check() {
    let catalog = Catalog::builtin(ReportKind::Company).unwrap();
    let emissions = |scope_3: &str| {
        Dataset::new()
            .with("total_ghg_emissions", "100", "provided")
            .with("total_scope_1_emissions", "50", "provided")
            .with("total_scope_2_emissions", "30", "provided")
            .with("total_scope_3_emissions", scope_3, "provided")
    };

    let warnings = |dataset: Dataset| validate(&dataset, &catalog).lines.warning;
    assert!(warnings(emissions("25")).is_empty());
    let fired = warnings(emissions("26"));
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].compound_id, "total_ghg_emissions");
}

// =============================================================================
// Properties
// =============================================================================

const CHOICES: [(&str, &str); 7] = [
    ("", ""),
    ("yes", "provided"),
    ("42", "provided"),
    ("", "provided"),
    ("", "not_applicable"),
    ("", "not_available"),
    ("1", "unsure"),
];

proptest! {
    #[test]
    fn prop_every_universe_metric_in_one_bucket(
        picks in proptest::collection::vec(0..CHOICES.len(), 17),
        with_unknown in any::<bool>(),
    ) {
        let catalog = company_catalog();
        let mut dataset = Dataset::new();
        for (metric_id, pick) in catalog.universe.iter().zip(picks) {
            // Choice 0 leaves the metric out of the file
            if pick == 0 {
                continue;
            }
            let (value, status) = CHOICES[pick];
            dataset = dataset.with(metric_id, value, status);
        }
        if with_unknown {
            dataset = dataset.with("not_in_catalog", "1", "provided");
        }

        let summary = validate(&dataset, &catalog);
        assert_exclusive(&catalog, &summary);
        let c = summary.counts;
        prop_assert_eq!(
            c.valid + c.error + c.blank + c.missing + c.recommended_but_missing,
            catalog.universe.len()
        );
        prop_assert_eq!(c.unknown, usize::from(with_unknown));
        prop_assert_eq!(summary.invalid_lines, c.error + c.missing);
        prop_assert_eq!(&summary, &validate(&dataset, &catalog));
    }

    #[test]
    fn prop_within_tolerance_never_mismatches(
        total in 1.0f64..1_000_000.0,
        tolerance in 0.5f64..50.0,
        share in 0.0f64..0.99,
        above in any::<bool>(),
    ) {
        let delta = total * tolerance / 100.0 * share;
        let sum = if above { total + delta } else { total - delta };
        prop_assert!(!is_mismatch(total, sum, tolerance));
    }

    #[test]
    fn prop_beyond_tolerance_always_mismatches(
        total in 1.0f64..1_000_000.0,
        tolerance in 0.1f64..50.0,
        factor in 1.01f64..3.0,
    ) {
        let sum = total + total * tolerance / 100.0 * factor;
        prop_assert!(is_mismatch(total, sum, tolerance));
    }
}
