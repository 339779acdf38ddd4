//! Validation for canonical metric records.
//!
//! Errors exclude a row from downstream use, warnings only flag it.
//! Validation never fails: it always returns a structured result.

use super::models::{MetricRecord, NielsenRecord};
use serde::Serialize;
use std::fmt;

/// Default upper bound for plausible daily listening, in hours.
pub const DEFAULT_TSL_WARNING_HOURS: f64 = 8.0;

/// Validation problem types
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    MissingField { field: &'static str },
    NegativeValue { field: &'static str, value: f64 },
    NotFinite { field: &'static str },
    ImplausibleTsl { tsl: f64, limit: f64 },
}

impl ValidationIssue {
    /// Warnings keep the row, everything else drops it.
    pub fn is_warning(&self) -> bool {
        matches!(self, ValidationIssue::ImplausibleTsl { .. })
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingField { field } => {
                write!(f, "Field '{}' is required but was missing", field)
            }
            ValidationIssue::NegativeValue { field, value } => {
                write!(f, "Field '{}' must be non-negative, got {}", field, value)
            }
            ValidationIssue::NotFinite { field } => {
                write!(f, "Field '{}' is not a finite number", field)
            }
            ValidationIssue::ImplausibleTsl { tsl, limit } => {
                write!(
                    f,
                    "TSL of {} hours exceeds the {} hour sanity threshold",
                    tsl, limit
                )
            }
        }
    }
}

/// Outcome of validating one record.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        let (warnings, errors): (Vec<_>, Vec<_>) =
            issues.into_iter().partition(ValidationIssue::is_warning);
        Self {
            is_valid: errors.is_empty(),
            errors: errors.iter().map(ToString::to_string).collect(),
            warnings: warnings.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationSettings {
    pub tsl_warning_hours: f64,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            tsl_warning_hours: DEFAULT_TSL_WARNING_HOURS,
        }
    }
}

/// The metric values a validator needs to see.
///
/// `None` means the source row did not carry the field at all, which is
/// different from a value that was present and zero.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricFields {
    pub cume: Option<f64>,
    pub tlh: Option<f64>,
    pub tsl: f64,
    pub require_cume: bool,
    pub require_tlh: bool,
}

impl From<&MetricRecord> for MetricFields {
    fn from(record: &MetricRecord) -> Self {
        Self {
            cume: Some(record.cume),
            tlh: Some(record.tlh),
            tsl: record.tsl,
            require_cume: true,
            require_tlh: true,
        }
    }
}

impl From<&NielsenRecord> for MetricFields {
    fn from(record: &NielsenRecord) -> Self {
        Self {
            cume: Some(record.cume),
            tlh: None,
            tsl: record.tsl,
            require_cume: true,
            require_tlh: false,
        }
    }
}

/// Collect every issue for the given fields, errors and warnings alike.
pub fn check(fields: &MetricFields, settings: &ValidationSettings) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    check_metric("cume", fields.cume, fields.require_cume, &mut issues);
    check_metric("tlh", fields.tlh, fields.require_tlh, &mut issues);

    if !fields.tsl.is_finite() {
        issues.push(ValidationIssue::NotFinite { field: "tsl" });
    } else if fields.tsl > settings.tsl_warning_hours {
        issues.push(ValidationIssue::ImplausibleTsl {
            tsl: fields.tsl,
            limit: settings.tsl_warning_hours,
        });
    }

    issues
}

fn check_metric(
    field: &'static str,
    value: Option<f64>,
    required: bool,
    issues: &mut Vec<ValidationIssue>,
) {
    match value {
        None if required => issues.push(ValidationIssue::MissingField { field }),
        None => {}
        Some(v) if !v.is_finite() => issues.push(ValidationIssue::NotFinite { field }),
        Some(v) if v < 0.0 => issues.push(ValidationIssue::NegativeValue { field, value: v }),
        Some(_) => {}
    }
}

/// Validate a set of metric fields.
pub fn validate(fields: &MetricFields, settings: &ValidationSettings) -> ValidationResult {
    ValidationResult::from_issues(check(fields, settings))
}

impl MetricRecord {
    pub fn validate(&self, settings: &ValidationSettings) -> ValidationResult {
        validate(&MetricFields::from(self), settings)
    }
}

impl NielsenRecord {
    pub fn validate(&self, settings: &ValidationSettings) -> ValidationResult {
        validate(&MetricFields::from(self), settings)
    }
}
