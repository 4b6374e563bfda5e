//! rvv-validator library interface
//!
//! Rule evaluation engine for company, fund and GP disclosure reports, plus the
//! collaborators around it: CSV ingest, the batch runner and the template export.
//!
//! Pipeline of one run: [`classifier`] → [`relations`] → [`aggregator`], driven by
//! [`orchestrator::validate`].

pub mod aggregator;
pub mod batch;
pub mod buckets;
pub mod classifier;
pub mod coercion;
pub mod error;
pub mod export;
pub mod ingest;
pub mod interpreter;
pub mod orchestrator;
pub mod relations;
pub mod requirements;
pub mod types;

pub use crate::batch::{BatchReport, BatchValidator, FileOutcome, FileReport};
pub use crate::error::{ValidatorError, ValidatorResult};
pub use crate::orchestrator::validate;
pub use crate::types::{Bucket, BucketCounts, Completion, LineRecord, Summary, TierCompletion};
