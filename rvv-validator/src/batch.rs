//! Batch runner
//!
//! Validates several import files of one report kind against one shared catalog.
//! Each file is parsed and validated on the blocking pool; a file that cannot be
//! read is rejected on its own and never stops its siblings.

use crate::error::{ValidatorError, ValidatorResult};
use crate::ingest;
use crate::orchestrator;
use crate::types::Summary;
use chrono::{DateTime, Utc};
use rvv_common::{Catalog, ReportKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Result of one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FileOutcome {
    Validated { summary: Box<Summary> },
    Rejected { message: String },
}

/// Entry for one input file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    pub file: String,
    pub entity_id: Uuid,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

impl FileReport {
    pub fn summary(&self) -> Option<&Summary> {
        match &self.outcome {
            FileOutcome::Validated { summary } => Some(summary.as_ref()),
            FileOutcome::Rejected { .. } => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self.outcome, FileOutcome::Rejected { .. })
    }
}

/// Report of a whole batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub report_kind: ReportKind,
    pub catalog_version: String,
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn summaries(&self) -> impl Iterator<Item = &Summary> {
        self.files.iter().filter_map(FileReport::summary)
    }

    pub fn rejected(&self) -> usize {
        self.files.iter().filter(|f| f.is_rejected()).count()
    }

    /// True when at least one file was given and none could be validated
    pub fn all_rejected(&self) -> bool {
        !self.files.is_empty() && self.files.iter().all(FileReport::is_rejected)
    }
}

/// Validates files against one read-only catalog
#[derive(Clone)]
pub struct BatchValidator {
    catalog: Arc<Catalog>,
}

impl BatchValidator {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Load the catalog for `kind` from `dir`, or the built-in one without a directory
    pub fn load(kind: ReportKind, dir: Option<&Path>) -> ValidatorResult<Self> {
        let catalog = Catalog::load(kind, dir)?;
        info!(
            kind = %catalog.kind,
            version = %catalog.version,
            metrics = catalog.universe.len(),
            relations = catalog.relations.len(),
            source = %dir.map(|d| d.display().to_string()).unwrap_or_else(|| "built-in".into()),
            "Catalog loaded"
        );
        Ok(Self::new(Arc::new(catalog)))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Validate one file synchronously
    pub fn validate_file(&self, path: &Path) -> ValidatorResult<Summary> {
        if !has_csv_extension(path) {
            return Err(ValidatorError::UnsupportedFile);
        }
        let dataset = ingest::read_dataset_file(path)?;
        Ok(orchestrator::validate(&dataset, &self.catalog))
    }

    /// Validate every file; reports come back in input order
    pub async fn run(&self, paths: Vec<PathBuf>) -> BatchReport {
        let batch_id = Uuid::new_v4();
        info!(%batch_id, kind = %self.catalog.kind, files = paths.len(), "Batch started");

        let handles: Vec<_> = paths
            .into_iter()
            .map(|path| {
                let validator = self.clone();
                let handle = tokio::task::spawn_blocking({
                    let path = path.clone();
                    move || validator.validate_file(&path)
                });
                (path, handle)
            })
            .collect();

        let mut files = Vec::with_capacity(handles.len());
        for (path, handle) in handles {
            let name = display_name(&path);
            let outcome = match handle.await {
                Ok(Ok(summary)) => FileOutcome::Validated {
                    summary: Box::new(summary),
                },
                Ok(Err(e)) => {
                    if e.is_input_shape() {
                        warn!(file = %name, error = %e, "File rejected");
                    } else {
                        error!(file = %name, error = %e, "File could not be validated");
                    }
                    FileOutcome::Rejected {
                        message: format!("{}: {}", name, e),
                    }
                }
                Err(e) => {
                    warn!(file = %name, error = %e, "Validation task failed");
                    FileOutcome::Rejected {
                        message: format!("{}: {}", name, e),
                    }
                }
            };
            files.push(FileReport {
                file: name,
                entity_id: Uuid::new_v4(),
                outcome,
            });
        }

        let report = BatchReport {
            batch_id,
            generated_at: Utc::now(),
            report_kind: self.catalog.kind,
            catalog_version: self.catalog.version.clone(),
            files,
        };
        info!(
            %batch_id,
            validated = report.files.len() - report.rejected(),
            rejected = report.rejected(),
            "Batch finished"
        );
        report
    }
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
