//! # RVV Common Library
//!
//! Shared code for the disclosure validator:
//! - Error type and result alias
//! - TOML configuration loading and catalog directory resolution
//! - Metric catalogs (schema, universe, requirement tiers, relation rules, labels)
//! - Dataset model handed over by the CSV ingest step

pub mod catalog;
pub mod config;
pub mod dataset;
pub mod error;

pub use catalog::{Catalog, ReportKind};
pub use dataset::{Dataset, Status};
pub use error::{Error, Result};
