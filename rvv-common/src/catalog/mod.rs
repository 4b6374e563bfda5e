//! Metric catalogs
//!
//! A catalog is the complete static configuration for one report kind and one
//! reporting year: the schema, the ordered metric universe, the requirement tiers,
//! the relation rules, the label dictionaries and the export layout.
//!
//! Catalogs are plain TOML files. Three are bundled with the crate (see
//! [`Catalog::builtin`]); others can be loaded from a directory so that several
//! catalog versions can be used side by side. A catalog is validated when loaded
//! and is read-only afterwards, so one instance can be shared between threads.
//!
//! # Example
//! ```rust,ignore
//! use rvv_common::catalog::{Catalog, ReportKind};
//!
//! let catalog = Catalog::builtin(ReportKind::Gp)?;
//! assert_eq!(catalog.entity_name_fallback(), "Unknown GP");
//! ```

pub mod labels;
pub mod relations;
pub mod requirements;
pub mod schema;


pub use labels::LabelSet;
pub use relations::{ConditionalRequirement, Conflict, RelationRule, SubsetTotal, SumCheck};
pub use requirements::{RequiredSet, RequirementModel, RequirementTier, TieredRequirements};
pub use schema::{MetricSpec, MetricType, Schema};

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

const BUILTIN_COMPANY: &str = include_str!("../../catalogs/company.toml");
const BUILTIN_FUND: &str = include_str!("../../catalogs/fund.toml");
const BUILTIN_GP: &str = include_str!("../../catalogs/gp.toml");

/// Report type a catalog describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Company,
    Fund,
    Gp,
}

impl ReportKind {
    /// Catalog file stem (`company.toml`, ...)
    pub fn file_stem(&self) -> &'static str {
        match self {
            ReportKind::Company => "company",
            ReportKind::Fund => "fund",
            ReportKind::Gp => "gp",
        }
    }

    /// Entity display name used when the name metric is absent
    pub fn default_entity_name(&self) -> &'static str {
        match self {
            ReportKind::Company => "Unknown Company",
            ReportKind::Fund => "Unknown Fund",
            ReportKind::Gp => "Unknown GP",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

impl FromStr for ReportKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "company" | "portco" => Ok(ReportKind::Company),
            "fund" => Ok(ReportKind::Fund),
            "gp" => Ok(ReportKind::Gp),
            other => Err(Error::InvalidInput(format!("Unknown report kind: {}", other))),
        }
    }
}

/// Where each metric lands in the reporting template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportLayout {
    pub sheet: String,

    /// 1-based column of the first entity
    #[serde(default = "default_first_column")]
    pub first_column: u32,

    /// Metric id → 1-based template rows
    #[serde(default)]
    pub rows: BTreeMap<String, Vec<u32>>,
}

fn default_first_column() -> u32 {
    5
}

/// Static configuration for one report kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub kind: ReportKind,

    /// Reporting-year revision of the metric set (e.g. "2025")
    pub version: String,

    /// Metric holding the entity display name
    pub entity_name_metric: String,

    #[serde(default)]
    entity_name_fallback: Option<String>,

    /// Metric holding the reported currency code
    #[serde(default)]
    pub currency_metric: Option<String>,

    /// Every metric the report expects, in report order
    pub universe: Vec<String>,

    #[serde(default)]
    pub metrics: Schema,

    #[serde(default)]
    pub options: Vec<LabelSet>,

    pub requirements: RequirementModel,

    #[serde(default)]
    pub relations: Vec<RelationRule>,

    #[serde(default)]
    pub export: Option<ExportLayout>,
}

impl Catalog {
    /// Parse and validate a catalog from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut catalog: Catalog = toml::from_str(content)?;
        catalog.resolve_options()?;
        catalog.check()?;
        debug!(
            kind = %catalog.kind,
            version = %catalog.version,
            metrics = catalog.metrics.len(),
            relations = catalog.relations.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Read, parse and validate a catalog file
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Read catalog {} failed: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Bundled catalog for a report kind
    pub fn builtin(kind: ReportKind) -> Result<Self> {
        let content = match kind {
            ReportKind::Company => BUILTIN_COMPANY,
            ReportKind::Fund => BUILTIN_FUND,
            ReportKind::Gp => BUILTIN_GP,
        };
        let catalog = Self::from_toml_str(content)?;
        if catalog.kind != kind {
            return Err(Error::Internal(format!(
                "Built-in {} catalog declares kind {}",
                kind, catalog.kind
            )));
        }
        Ok(catalog)
    }

    /// Catalog for `kind` from `dir/<kind>.toml`, or the built-in one when no dir is given
    pub fn load(kind: ReportKind, dir: Option<&Path>) -> Result<Self> {
        let Some(dir) = dir else {
            return Self::builtin(kind);
        };

        let path = dir.join(format!("{}.toml", kind.file_stem()));
        if !path.exists() {
            return Err(Error::NotFound(format!("Catalog file {}", path.display())));
        }
        let catalog = Self::load_file(&path)?;
        if catalog.kind != kind {
            return Err(Error::Config(format!(
                "{} declares kind {} but was loaded as {}",
                path.display(),
                catalog.kind,
                kind
            )));
        }
        Ok(catalog)
    }

    pub fn entity_name_fallback(&self) -> &str {
        self.entity_name_fallback
            .as_deref()
            .unwrap_or_else(|| self.kind.default_entity_name())
    }

    pub fn spec(&self, metric_id: &str) -> Option<&MetricSpec> {
        self.metrics.get(metric_id)
    }

    pub fn tier_of(&self, metric_id: &str) -> RequirementTier {
        self.requirements.tier_of(metric_id)
    }

    pub fn label_set(&self, name: &str) -> Option<&LabelSet> {
        self.options.iter().find(|set| set.name == name)
    }

    pub fn unit_of(&self, metric_id: &str) -> Option<&str> {
        self.spec(metric_id).and_then(|spec| spec.unit.as_deref())
    }

    /// Fill `allowed` from the referenced label dictionary where it was omitted
    fn resolve_options(&mut self) -> Result<()> {
        let sets = self.options.clone();
        for (metric_id, spec) in self.metrics.iter_mut() {
            let Some(name) = spec.options.as_deref() else {
                continue;
            };
            let set = sets.iter().find(|set| set.name == name).ok_or_else(|| {
                Error::Config(format!(
                    "Metric '{}' references unknown options '{}'",
                    metric_id, name
                ))
            })?;
            if spec.allowed.is_none() {
                spec.allowed = Some(set.codes());
            }
        }
        Ok(())
    }

    /// Structural consistency checks run once at load time
    fn check(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for metric_id in &self.universe {
            if !seen.insert(metric_id.as_str()) {
                return Err(Error::Config(format!(
                    "Duplicate metric '{}' in {} universe",
                    metric_id, self.kind
                )));
            }
            if !self.metrics.contains(metric_id) {
                return Err(Error::Config(format!(
                    "Metric '{}' in {} universe has no schema entry",
                    metric_id, self.kind
                )));
            }
        }

        for metric_id in self.requirements.listed_ids() {
            if !seen.contains(metric_id) {
                return Err(Error::Config(format!(
                    "Requirement list names '{}' which is not in the {} universe",
                    metric_id, self.kind
                )));
            }
        }

        if let RequirementModel::Tiered(tiers) = &self.requirements {
            if !self.metrics.contains(&tiers.fte_metric) {
                return Err(Error::Config(format!(
                    "FTE metric '{}' has no schema entry",
                    tiers.fte_metric
                )));
            }
        }

        for rule in &self.relations {
            if let RelationRule::SumCheck(check) = rule {
                if check.tolerance_percent.is_nan() || check.tolerance_percent < 0.0 {
                    return Err(Error::Config(format!(
                        "Sum check on '{}' has invalid tolerance {}",
                        check.total_field, check.tolerance_percent
                    )));
                }
            }
            for metric_id in rule.referenced_ids() {
                if !self.metrics.contains(metric_id) {
                    return Err(Error::Config(format!(
                        "{} rule references unknown metric '{}'",
                        rule.kind_name(),
                        metric_id
                    )));
                }
            }
        }

        Ok(())
    }
}
