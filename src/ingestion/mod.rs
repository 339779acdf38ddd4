//! Ingestion of vendor audience exports.
//!
//! Raw rows go through format detection, field resolution and validation,
//! and come out as canonical records plus a per-row report. Bad rows are
//! skipped and reported, they never abort a batch.

mod csv_source;
mod fields;
mod format;
mod nielsen;
mod raw_row;
mod report;
mod triton;

pub use csv_source::{read_rows, read_rows_from_path};
pub use fields::{
    normalize_key, parse_date, parse_hour, parse_number, resolve, resolve_date, resolve_hour,
    resolve_number, resolve_text, FieldValue,
};
pub use format::{detect_format, VendorFormat};
pub use nielsen::{parse_nielsen, NielsenAliases, NielsenParser, NIELSEN_ALIASES};
pub use raw_row::{RawRow, RawValue};
pub use report::{IngestReport, ParseOutcome, RowReport};
pub use triton::{parse_triton, TritonAliases, TritonParser, TRITON_ALIASES};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::warn;

use crate::metrics::{MetricRecord, NielsenRecord, ValidationSettings};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("No rows to ingest")]
    NoRows,

    #[error("Unrecognized export format (headers: {})", .headers.join(", "))]
    UnrecognizedFormat { headers: Vec<String> },

    #[error("CSV decoding error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parsed batch, tagged with the vendor format it was read as.
#[derive(Debug, Clone)]
pub enum IngestOutcome {
    Triton(ParseOutcome<MetricRecord>),
    Nielsen(ParseOutcome<NielsenRecord>),
}

impl IngestOutcome {
    pub fn format(&self) -> VendorFormat {
        self.report().format
    }

    pub fn report(&self) -> &IngestReport {
        match self {
            IngestOutcome::Triton(outcome) => &outcome.report,
            IngestOutcome::Nielsen(outcome) => &outcome.report,
        }
    }

    /// Canonical records for aggregation. Nielsen rows are converted with a
    /// TLH reconstructed from their vendor TSL.
    pub fn metric_records(&self) -> Vec<MetricRecord> {
        match self {
            IngestOutcome::Triton(outcome) => outcome.records.clone(),
            IngestOutcome::Nielsen(outcome) => {
                outcome.records.iter().map(MetricRecord::from).collect()
            }
        }
    }
}

/// Options for [`ingest`].
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// Skip detection and parse as this format.
    pub format: Option<VendorFormat>,
    pub validation: ValidationSettings,
    /// Date for rows without one; today when unset.
    pub fallback_date: Option<NaiveDate>,
}

/// Detect the vendor format from the first row's headers and parse the batch.
///
/// An unrecognized format is returned as an error so the caller can decide
/// whether to reject the whole upload.
pub fn ingest(rows: &[RawRow], options: &IngestOptions) -> Result<IngestOutcome, IngestError> {
    let first = rows.first().ok_or(IngestError::NoRows)?;

    let format = match options.format {
        Some(format) if format != VendorFormat::Unknown => format,
        _ => detect_format(&first.headers()),
    };

    match format {
        VendorFormat::Triton => {
            let mut parser = TritonParser::new(&options.validation);
            if let Some(date) = options.fallback_date {
                parser = parser.with_fallback_date(date);
            }
            Ok(IngestOutcome::Triton(parser.parse(rows)))
        }
        VendorFormat::Nielsen => {
            let mut parser = NielsenParser::new(&options.validation);
            if let Some(date) = options.fallback_date {
                parser = parser.with_fallback_date(date);
            }
            Ok(IngestOutcome::Nielsen(parser.parse(rows)))
        }
        VendorFormat::Unknown => {
            let headers: Vec<String> = first.headers().into_iter().map(String::from).collect();
            warn!("Could not detect export format from headers {:?}", headers);
            Err(IngestError::UnrecognizedFormat { headers })
        }
    }
}
