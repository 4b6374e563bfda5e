//! Template export
//!
//! Fills the reporting template from validated summaries: one column per entity,
//! starting at the layout's first column, with each valid metric written into the
//! rows the layout maps it to.
//!
//! With a template workbook the cells are written into the layout's named sheet and
//! everything else in the workbook (labels, other sheets, styles) is kept. Without one
//! the sheet is emitted as a bare CSV grid.

use crate::error::{ValidatorError, ValidatorResult};
use crate::types::Summary;
use rvv_common::catalog::ExportLayout;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

/// Populated template sheet, addressed by 1-based (row, column)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateSheet {
    pub name: String,
    cells: BTreeMap<(u32, u32), String>,
}

impl TemplateSheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
        }
    }

    /// Build a sheet from summaries in batch order
    pub fn populate<'s>(layout: &ExportLayout, summaries: impl IntoIterator<Item = &'s Summary>) -> Self {
        let mut sheet = Self::new(layout.sheet.as_str());
        let mut column = layout.first_column;
        for summary in summaries {
            sheet.write_entity(layout, column, summary);
            column += 1;
        }
        info!(
            sheet = %sheet.name,
            entities = column - layout.first_column,
            cells = sheet.cells.len(),
            "Template populated"
        );
        sheet
    }

    fn write_entity(&mut self, layout: &ExportLayout, column: u32, summary: &Summary) {
        for record in &summary.lines.valid {
            let Some(rows) = layout.rows.get(&record.compound_id) else {
                warn!(
                    entity = %summary.entity_name,
                    metric = %record.compound_id,
                    "No template row for metric"
                );
                continue;
            };
            let value = record.interpreted_value.as_deref().unwrap_or_default();
            if value.is_empty() {
                debug!(entity = %summary.entity_name, metric = %record.compound_id, "Skipping empty value");
                continue;
            }
            for &row in rows {
                self.set(row, column, value);
            }
        }
    }

    pub fn set(&mut self, row: u32, column: u32, value: impl Into<String>) {
        self.cells.insert((row, column), value.into());
    }

    pub fn get(&self, row: u32, column: u32) -> Option<&str> {
        self.cells.get(&(row, column)).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Highest (row, column) holding a value
    pub fn extent(&self) -> (u32, u32) {
        self.cells
            .keys()
            .fold((0, 0), |(rows, cols), &(r, c)| (rows.max(r), cols.max(c)))
    }

    /// Write rows 1..=max row, columns 1..=max column; unset cells are empty
    pub fn write_csv<W: Write>(&self, output: W) -> ValidatorResult<()> {
        let (rows, cols) = self.extent();
        let mut writer = csv::WriterBuilder::new().flexible(false).from_writer(output);
        for row in 1..=rows {
            let record: Vec<&str> = (1..=cols)
                .map(|col| self.get(row, col).unwrap_or_default())
                .collect();
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Fill this sheet's cells into a copy of `template`, saved as `output`
    ///
    /// The template must contain a sheet with this sheet's name. Existing cells that
    /// are not part of the export keep their content.
    pub fn write_workbook(&self, template: &Path, output: &Path) -> ValidatorResult<()> {
        let mut book = umya_spreadsheet::reader::xlsx::read(template).map_err(|e| {
            ValidatorError::Template(format!("Read {} failed: {}", template.display(), e))
        })?;
        let worksheet = book.get_sheet_by_name_mut(&self.name).ok_or_else(|| {
            ValidatorError::Template(format!(
                "Sheet '{}' not found in {}",
                self.name,
                template.display()
            ))
        })?;

        for (&(row, column), value) in &self.cells {
            worksheet.get_cell_mut((column, row)).set_value(value.as_str());
        }

        umya_spreadsheet::writer::xlsx::write(&book, output).map_err(|e| {
            ValidatorError::Template(format!("Write {} failed: {}", output.display(), e))
        })?;
        info!(
            template = %template.display(),
            path = %output.display(),
            sheet = %self.name,
            cells = self.cells.len(),
            "Template workbook written"
        );
        Ok(())
    }

    pub fn write_csv_file(&self, path: &Path) -> ValidatorResult<()> {
        let file = std::fs::File::create(path)?;
        self.write_csv(file)?;
        info!(path = %path.display(), "Template written");
        Ok(())
    }
}
