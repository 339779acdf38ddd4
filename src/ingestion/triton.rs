//! Triton Webcast Metrics exports.
//!
//! Triton rows are usually weekly (anchored on a `Week` column) and carry
//! CUME, TLH and AAS per station. TSL is derived here, never read.

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use super::fields::RowReader;
use super::format::VendorFormat;
use super::raw_row::RawRow;
use super::report::{IngestReport, ParseOutcome};
use crate::metrics::{
    compute_tsl, validate, MetricFields, MetricRecord, ValidationSettings,
};

/// Header spellings accepted for each canonical Triton field, in priority order.
#[derive(Debug, Clone, Copy)]
pub struct TritonAliases {
    pub cume: &'static [&'static str],
    pub tlh: &'static [&'static str],
    pub active_sessions: &'static [&'static str],
    pub date: &'static [&'static str],
    pub station: &'static [&'static str],
    pub daypart: &'static [&'static str],
    pub device: &'static [&'static str],
    pub hour: &'static [&'static str],
}

pub const TRITON_ALIASES: TritonAliases = TritonAliases {
    cume: &["CUME", "Cume", "Cumulative Audience", "Unique Listeners", "Unique Audience"],
    tlh: &["TLH", "Total Listening Hours", "Listening Hours", "Total Hours"],
    active_sessions: &[
        "AAS",
        "Active Sessions",
        "ActiveSessions",
        "Average Active Sessions",
        "Sessions",
    ],
    date: &["Week", "Week Start", "Week Of", "Date", "Start Date", "Period"],
    station: &["Station", "Station Name", "Stream", "Call Letters"],
    daypart: &["Daypart", "Day Part"],
    device: &["Device", "Device Type", "Platform", "Player"],
    hour: &["Hour", "Hour of Day"],
};

/// Parses Triton rows into canonical records.
///
/// Rows that fail validation are skipped and reported; the batch never aborts.
#[derive(Debug, Clone)]
pub struct TritonParser {
    validation: ValidationSettings,
    fallback_date: NaiveDate,
}

impl TritonParser {
    pub fn new(validation: &ValidationSettings) -> Self {
        Self {
            validation: validation.clone(),
            fallback_date: Utc::now().date_naive(),
        }
    }

    /// Date used for rows without a usable date column (today by default).
    pub fn with_fallback_date(mut self, date: NaiveDate) -> Self {
        self.fallback_date = date;
        self
    }

    pub fn parse(&self, rows: &[RawRow]) -> ParseOutcome<MetricRecord> {
        let mut records = Vec::with_capacity(rows.len());
        let mut report = IngestReport::new(VendorFormat::Triton);

        for (index, row) in rows.iter().enumerate() {
            let (record, fields, mut warnings) = self.read_row(row);
            let result = validate(&fields, &self.validation);
            warnings.extend(result.warnings);

            if result.is_valid {
                records.push(record);
            } else {
                debug!(
                    "Skipped Triton row {}: {}",
                    index + 1,
                    result.errors.join("; ")
                );
            }
            report.push_row(index, result.errors, warnings);
        }

        info!("Parsed Triton batch: {}", report);
        ParseOutcome { records, report }
    }

    fn read_row(&self, row: &RawRow) -> (MetricRecord, MetricFields, Vec<String>) {
        let aliases = &TRITON_ALIASES;
        let mut reader = RowReader::new(row);

        let cume = reader.number("cume", aliases.cume);
        let tlh = reader.number("tlh", aliases.tlh);
        let active_sessions = reader.number("active_sessions", aliases.active_sessions);
        let date = reader.date(aliases.date, self.fallback_date);
        let hour = reader.hour(aliases.hour);

        let station = reader.text(aliases.station);
        let daypart = reader.text(aliases.daypart);
        let device = reader.text(aliases.device).or_else(|| station.clone());

        let tsl = compute_tsl(tlh.or_zero(), cume.or_zero());
        let record = MetricRecord {
            cume: cume.or_zero(),
            tlh: tlh.or_zero(),
            tsl,
            active_sessions: active_sessions.or_zero(),
            date,
            daypart,
            device,
            station,
            hour,
        };
        let fields = MetricFields {
            cume: cume.presence(),
            tlh: tlh.presence(),
            tsl,
            require_cume: true,
            require_tlh: true,
        };

        (record, fields, reader.warnings)
    }
}

impl Default for TritonParser {
    fn default() -> Self {
        Self::new(&ValidationSettings::default())
    }
}

/// Parse Triton rows with default validation settings, keeping valid records.
pub fn parse_triton(rows: &[RawRow]) -> Vec<MetricRecord> {
    TritonParser::default().parse(rows).records
}
