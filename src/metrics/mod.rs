//! Canonical audience metrics.
//!
//! Holds the vendor-neutral record model, the validator, the TSL/CUME
//! arithmetic and the period/dimension aggregator.

mod aggregate;
mod calc;
mod models;
mod validation;

pub use aggregate::{
    aggregate_by_dimension, aggregate_by_dimension_with, aggregate_by_period,
    aggregate_by_period_with, bucket_label, bucket_start, filter_by_dimension, rank_by_cume,
    summarize, AggregationPolicy, SessionsReduction, UNKNOWN_BUCKET,
};
pub use calc::{compute_average_cume, compute_tsl};
pub use models::{Dimension, MetricRecord, NielsenRecord, Period};
pub use validation::{
    check, validate, MetricFields, ValidationIssue, ValidationResult, ValidationSettings,
    DEFAULT_TSL_WARNING_HOURS,
};

use thiserror::Error;

/// Invalid names handed to the metrics API by a caller.
///
/// These are programming errors, bad data never produces them.
#[derive(Debug, Error, PartialEq)]
pub enum MetricsError {
    #[error("Unknown aggregation period: {0}")]
    UnknownPeriod(String),

    #[error("Unknown dimension: {0}")]
    UnknownDimension(String),

    #[error("Unknown sessions reduction: {0}")]
    UnknownReduction(String),

    #[error("Unknown export format: {0}")]
    UnknownFormat(String),
}
