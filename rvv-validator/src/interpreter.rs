//! Value interpreter: coded value → display label plus unit

use rvv_common::catalog::labels::find_label;
use rvv_common::{Catalog, Dataset};

/// Unit placeholder replaced by the entity's reported currency
pub const CURRENCY_UNIT: &str = "currency";

/// Turns raw values into the human-readable form shown in reports and exports
pub struct Interpreter<'a> {
    catalog: &'a Catalog,
    currency: Option<&'a str>,
}

impl<'a> Interpreter<'a> {
    /// Interpreter for one dataset; picks up the reported currency code
    pub fn new(catalog: &'a Catalog, dataset: &'a Dataset) -> Self {
        let currency = catalog
            .currency_metric
            .as_deref()
            .and_then(|metric| dataset.non_empty_value(metric));
        Self { catalog, currency }
    }

    /// Label for a coded value, when a label dictionary covers the metric's codes
    pub fn label(&self, metric_id: &str, value: &str) -> Option<&'a str> {
        let catalog = self.catalog;
        let allowed = catalog.spec(metric_id)?.allowed.as_deref()?;
        find_label(&catalog.options, allowed, value)
    }

    /// Display unit for a metric; `None` for a currency metric with no currency reported
    pub fn unit(&self, metric_id: &str) -> Option<&'a str> {
        let catalog = self.catalog;
        match catalog.unit_of(metric_id)? {
            CURRENCY_UNIT => self.currency,
            unit => Some(unit),
        }
    }

    /// Label (or the value itself) followed by the unit, space separated
    pub fn interpret(&self, metric_id: &str, value: &str) -> String {
        let shown = self.label(metric_id, value).unwrap_or(value);
        match self.unit(metric_id) {
            Some(unit) => format!("{} {}", shown, unit),
            None => shown.to_string(),
        }
    }
}
