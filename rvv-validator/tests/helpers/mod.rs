//! Test Helper Utilities
//!
//! Shared fixtures for the rvv-validator integration tests: small catalogs with every
//! rule kind, dataset builders and CSV import writers.

#![allow(dead_code)]

use rvv_common::{Catalog, Dataset};
use rvv_validator::types::{Bucket, Summary};
use std::path::{Path, PathBuf};

/// Tiered company catalog: 8 minimum, 3 intermediate, 2 full, 4 optional metrics
pub const COMPANY_FIXTURE: &str = r#"
kind = "company"
version = "fixture"
entity_name_metric = "company_name"
currency_metric = "currency"
universe = [
    "company_name", "currency", "total_ftes", "gross_revenue", "listed",
    "responsibility_cfo", "responsibility_none", "tobacco",
    "policy_a", "revenue_eu", "revenue_non_eu",
    "board_report", "energy_total",
    "listed_ticker", "tobacco_share", "energy_renewable", "notes",
]

[requirements]
model = "tiered"
fte_metric = "total_ftes"
intermediate_fte_threshold = 15.0
full_fte_threshold = 250.0
minimum = [
    "company_name", "currency", "total_ftes", "gross_revenue", "listed",
    "responsibility_cfo", "responsibility_none", "tobacco",
]
intermediate = ["policy_a", "revenue_eu", "revenue_non_eu"]
full = ["board_report", "energy_total"]
optional = ["listed_ticker", "tobacco_share", "energy_renewable", "notes"]

[metrics.company_name]
type = "string"

[metrics.currency]
type = "string"
options = "currency_code"

[metrics.total_ftes]
type = "float"
min = 0.0
unit = "FTEs"

[metrics.gross_revenue]
type = "float"
min = 0.0
unit = "currency"

[metrics.listed]
type = "string"
options = "yes_no"

[metrics.responsibility_cfo]
type = "string"
options = "yes_no"

[metrics.responsibility_none]
type = "string"
options = "yes_no"

[metrics.tobacco]
type = "string"
options = "yes_no"

[metrics.policy_a]
type = "string"
options = "yes_no"

[metrics.revenue_eu]
type = "float"
min = 0.0
unit = "currency"

[metrics.revenue_non_eu]
type = "float"
min = 0.0
unit = "currency"

[metrics.board_report]
type = "string"
options = "yes_no"

[metrics.energy_total]
type = "float"
min = 0.0
unit = "MWh"

[metrics.listed_ticker]
type = "string"

[metrics.tobacco_share]
type = "float"
min = 0.0
max = 100.0
unit = "%"

[metrics.energy_renewable]
type = "float"
min = 0.0
unit = "MWh"

[metrics.notes]
type = "string"

[[options]]
name = "yes_no"
[options.labels]
yes = "Yes"
no = "No"

[[options]]
name = "currency_code"
[options.labels]
EUR = "Euro"
USD = "US dollar"

[[relations]]
kind = "conditional_requirement"
condition_id = "tobacco"
condition_value = "yes"
dependent_ids = ["tobacco_share"]

[[relations]]
kind = "conditional_requirement"
condition_id = "listed"
condition_value = "yes"
dependent_ids = ["listed_ticker"]

[[relations]]
kind = "subset_total"
condition_ids = ["energy_renewable"]
total_field = "energy_total"

[[relations]]
kind = "conflict"
trigger_field = "responsibility_none"
trigger_value = "yes"
conflicting_fields = ["responsibility_cfo"]

[[relations]]
kind = "sum_check"
total_field = "gross_revenue"
component_fields = ["revenue_eu", "revenue_non_eu"]
tolerance_percent = 5.0

[export]
sheet = "Fixture"
first_column = 3
[export.rows]
company_name = [1]
gross_revenue = [2, 5]
listed = [3]
"#;

/// Fund catalog with a five-metric required set
pub const FUND_FIXTURE: &str = r#"
kind = "fund"
version = "fixture"
entity_name_metric = "fund_name"
universe = ["fund_name", "vintage", "fund_size", "adhere_to_ungc", "article", "no_ungc_explanation", "website"]

[requirements]
model = "required_set"
required = ["fund_name", "vintage", "fund_size", "adhere_to_ungc", "article"]

[metrics.fund_name]
type = "string"

[metrics.vintage]
type = "integer"
min = 1990.0
max = 2100.0

[metrics.fund_size]
type = "float"
min = 0.0
unit = "EUR"

[metrics.adhere_to_ungc]
type = "string"
options = "yes_no"

[metrics.article]
type = "string"
allowed = ["6", "8", "9"]

[metrics.no_ungc_explanation]
type = "string"

[metrics.website]
type = "string"

[[options]]
name = "yes_no"
[options.labels]
yes = "Yes"
no = "No"

[[relations]]
kind = "conditional_requirement"
condition_id = "adhere_to_ungc"
condition_value = "no"
dependent_ids = ["no_ungc_explanation"]
"#;

pub fn company_catalog() -> Catalog {
    Catalog::from_toml_str(COMPANY_FIXTURE).expect("company fixture catalog")
}

pub fn fund_catalog() -> Catalog {
    Catalog::from_toml_str(FUND_FIXTURE).expect("fund fixture catalog")
}

/// Every fixture company metric filled in validly; optional metrics declared not applicable
pub const COMPLETE_COMPANY: &[(&str, &str, &str)] = &[
    ("company_name", "Acme Ltd", "provided"),
    ("currency", "EUR", "provided"),
    ("total_ftes", "20", "provided"),
    ("gross_revenue", "100", "provided"),
    ("listed", "no", "provided"),
    ("responsibility_cfo", "yes", "provided"),
    ("responsibility_none", "no", "provided"),
    ("tobacco", "no", "provided"),
    ("policy_a", "yes", "provided"),
    ("revenue_eu", "60", "provided"),
    ("revenue_non_eu", "40", "provided"),
    ("board_report", "yes", "provided"),
    ("energy_total", "50", "provided"),
    ("listed_ticker", "", "not_applicable"),
    ("tobacco_share", "", "not_applicable"),
    ("energy_renewable", "", "not_applicable"),
    ("notes", "", "not_applicable"),
];

pub fn dataset(rows: &[(&str, &str, &str)]) -> Dataset {
    rows.iter()
        .fold(Dataset::new(), |dataset, (id, value, status)| dataset.with(id, value, status))
}

pub fn complete_company() -> Dataset {
    dataset(COMPLETE_COMPANY)
}

/// Complete company dataset with some rows replaced and some ids left out
pub fn company_with(overrides: &[(&str, &str, &str)], removed: &[&str]) -> Dataset {
    let kept: Vec<(&str, &str, &str)> = COMPLETE_COMPANY
        .iter()
        .copied()
        .filter(|(id, _, _)| !removed.contains(id))
        .collect();
    overrides
        .iter()
        .fold(dataset(&kept), |dataset, (id, value, status)| dataset.with(id, value, status))
}

/// Exactly one exclusive bucket per universe metric
pub fn assert_exclusive(catalog: &Catalog, summary: &Summary) {
    for metric_id in &catalog.universe {
        let hits: Vec<Bucket> = Bucket::ALL
            .iter()
            .copied()
            .filter(|&bucket| {
                summary
                    .lines
                    .bucket(bucket)
                    .iter()
                    .any(|record| &record.compound_id == metric_id)
            })
            .collect();
        assert_eq!(hits.len(), 1, "{} found in {:?}", metric_id, hits);
    }
    let placed: usize = Bucket::ALL.iter().map(|&b| summary.lines.bucket(b).len()).sum();
    assert_eq!(placed, catalog.universe.len());
}

/// CSV import text for `(compound_id, value, status)` rows
pub fn import_csv(rows: &[(&str, &str, &str)]) -> String {
    let mut text = String::from("COMPOUND_ID,REPORTING_PERIOD,UNIT,VALUE,STATUS,COMMENTS\n");
    for (id, value, status) in rows {
        text.push_str(&format!("{},2025,,{},{},\n", id, value, status));
    }
    text
}

/// Write an import file into `dir`
pub fn write_import(dir: &Path, name: &str, rows: &[(&str, &str, &str)]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, import_csv(rows)).expect("write import file");
    path
}
