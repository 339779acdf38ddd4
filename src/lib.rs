//! Audience Metrics Library
//!
//! Normalizes Triton and Nielsen audience exports into a common metrics
//! model and aggregates them without ever summing CUME.

pub mod config;
pub mod ingestion;
pub mod metrics;

// Re-export commonly used types for convenience
pub use ingestion::{
    detect_format, ingest, parse_nielsen, parse_triton, read_rows, IngestError, IngestOptions,
    IngestOutcome, IngestReport, RawRow, RawValue, VendorFormat,
};
pub use metrics::{
    aggregate_by_dimension, aggregate_by_period, compute_average_cume, compute_tsl, validate,
    Dimension, MetricRecord, NielsenRecord, Period, ValidationResult,
};
