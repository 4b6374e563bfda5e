//! Type coercion and schema checks
//!
//! Raw CSV values are text. A value is converted to the declared metric type only
//! when it cleanly parses as that type; anything else is kept as text and is then
//! rejected by [`check`] with a type error instead of failing the run.

use rvv_common::catalog::{MetricSpec, MetricType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw value after coercion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypedValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl TypedValue {
    /// Numeric view of the value; text is never numeric
    pub fn as_number(&self) -> Option<f64> {
        match self {
            TypedValue::Integer(i) => Some(*i as f64),
            TypedValue::Float(f) => Some(*f),
            TypedValue::Text(_) => None,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, TypedValue::Integer(_))
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Integer(i) => write!(f, "{}", i),
            // Debug keeps the trailing ".0" on whole floats
            TypedValue::Float(x) => write!(f, "{:?}", x),
            TypedValue::Text(s) => f.write_str(s),
        }
    }
}

/// Convert `raw` to the declared type
///
/// - integer: only plain non-negative digit strings; `-3` stays text
/// - float: anything that parses to a finite float
/// - string: always text
pub fn coerce(metric_type: MetricType, raw: &str) -> TypedValue {
    match metric_type {
        MetricType::Integer if is_numeral(raw) => match raw.parse::<i64>() {
            Ok(value) => TypedValue::Integer(value),
            Err(_) => TypedValue::Text(raw.to_string()),
        },
        MetricType::Float => match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => TypedValue::Float(value),
            _ => TypedValue::Text(raw.to_string()),
        },
        _ => TypedValue::Text(raw.to_string()),
    }
}

/// Coerce using the metric's schema entry; no entry means text
pub fn coerce_for(spec: Option<&MetricSpec>, raw: &str) -> TypedValue {
    match spec {
        Some(spec) => coerce(spec.metric_type, raw),
        None => TypedValue::Text(raw.to_string()),
    }
}

fn is_numeral(raw: &str) -> bool {
    !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit())
}

/// One failed schema constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    WrongType(MetricType),
    Unallowed(String),
    BelowMin(String),
    AboveMax(String),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::WrongType(t) => write!(f, "must be of {} type", t),
            FieldError::Unallowed(v) => write!(f, "unallowed value {}", v),
            FieldError::BelowMin(m) => write!(f, "min value is {}", m),
            FieldError::AboveMax(m) => write!(f, "max value is {}", m),
        }
    }
}

/// Validate a coerced value against its schema entry
///
/// A type mismatch stops further checks for the value. `allowed` applies to text,
/// `min`/`max` to numbers.
pub fn check(spec: &MetricSpec, value: &TypedValue) -> Result<(), Vec<FieldError>> {
    let type_ok = match (spec.metric_type, value) {
        (MetricType::Integer, TypedValue::Integer(_)) => true,
        // Whole numbers are acceptable floats
        (MetricType::Float, TypedValue::Float(_) | TypedValue::Integer(_)) => true,
        (MetricType::String, TypedValue::Text(_)) => true,
        _ => false,
    };
    if !type_ok {
        return Err(vec![FieldError::WrongType(spec.metric_type)]);
    }

    let mut errors = Vec::new();

    if let (Some(allowed), TypedValue::Text(text)) = (&spec.allowed, value) {
        if !allowed.iter().any(|code| code == text) {
            errors.push(FieldError::Unallowed(text.clone()));
        }
    }

    if let Some(number) = value.as_number() {
        if let Some(min) = spec.min {
            if number < min {
                errors.push(FieldError::BelowMin(format_bound(min)));
            }
        }
        if let Some(max) = spec.max {
            if number > max {
                errors.push(FieldError::AboveMax(format_bound(max)));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Render all errors of one metric as `<id>: <error>; <id>: <error>`
pub fn describe_errors(metric_id: &str, errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", metric_id, e))
        .collect::<Vec<_>>()
        .join("; ")
}

fn format_bound(bound: f64) -> String {
    if bound.fract() == 0.0 && bound.abs() < 1e15 {
        format!("{}", bound as i64)
    } else {
        format!("{}", bound)
    }
}
