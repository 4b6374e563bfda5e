//! CSV import format → [`Dataset`]
//!
//! One file describes one entity. The header row must be exactly
//! `COMPOUND_ID,REPORTING_PERIOD,UNIT,VALUE,STATUS,COMMENTS`; each further row is one
//! metric. Only the id, value and status columns feed the validator.

use crate::error::{ValidatorError, ValidatorResult};
use rvv_common::{Dataset, Status};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

pub const EXPECTED_HEADERS: [&str; 6] = [
    "COMPOUND_ID",
    "REPORTING_PERIOD",
    "UNIT",
    "VALUE",
    "STATUS",
    "COMMENTS",
];

const COL_COMPOUND_ID: usize = 0;
const COL_VALUE: usize = 3;
const COL_STATUS: usize = 4;

/// Parse an import file from any reader
pub fn read_dataset<R: Read>(input: R) -> ValidatorResult<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    let mut records = reader.records();

    let headers = match records.next() {
        Some(record) => record?,
        None => return Err(ValidatorError::EmptyFile),
    };
    if !headers.iter().eq(EXPECTED_HEADERS.iter().copied()) {
        return Err(ValidatorError::InvalidHeaders {
            expected: EXPECTED_HEADERS.iter().map(|h| h.to_string()).collect(),
            found: headers.iter().map(str::to_string).collect(),
        });
    }

    let mut dataset = Dataset::new();
    let mut skipped = 0usize;
    for (idx, record) in records.enumerate() {
        let row = record?;
        let line = row
            .position()
            .map(|pos| pos.line())
            .unwrap_or(idx as u64 + 2);

        if row.len() < EXPECTED_HEADERS.len() {
            warn!(line, columns = row.len(), "Skipping row with insufficient columns");
            skipped += 1;
            continue;
        }

        let compound_id = row.get(COL_COMPOUND_ID).unwrap_or_default().trim();
        let value = row.get(COL_VALUE).unwrap_or_default().trim();
        let status = row.get(COL_STATUS).unwrap_or_default().trim();
        dataset.insert(compound_id, value, Status::parse(status));
    }

    debug!(metrics = dataset.len(), skipped, "Dataset read");
    Ok(dataset)
}

/// Open and parse an import file
pub fn read_dataset_file(path: &Path) -> ValidatorResult<Dataset> {
    let file = File::open(path)?;
    read_dataset(file)
}
