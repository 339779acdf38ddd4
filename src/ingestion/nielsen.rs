//! Nielsen Audio exports.
//!
//! Nielsen reports AQH share and persons alongside CUME, and ships its own
//! TSL column; unlike Triton nothing is derived on the way in.

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use super::fields::RowReader;
use super::format::VendorFormat;
use super::raw_row::RawRow;
use super::report::{IngestReport, ParseOutcome};
use crate::metrics::{validate, MetricFields, MetricRecord, NielsenRecord, ValidationSettings};

#[derive(Debug, Clone, Copy)]
pub struct NielsenAliases {
    pub aqh_share: &'static [&'static str],
    pub aqh_persons: &'static [&'static str],
    pub cume: &'static [&'static str],
    pub tsl: &'static [&'static str],
    pub date: &'static [&'static str],
    pub daypart: &'static [&'static str],
    pub station: &'static [&'static str],
}

pub const NIELSEN_ALIASES: NielsenAliases = NielsenAliases {
    aqh_share: &["AQH Share", "AQHShare", "AQH Share %", "Share"],
    aqh_persons: &["AQH Persons", "AQHPersons", "AQH (00)", "AQH"],
    cume: &["CUME", "Cume Persons", "Cume", "Cumulative Audience"],
    tsl: &["TSL", "Time Spent Listening", "TSL (Hours)"],
    date: &["Date", "Survey Period", "Period", "Week", "Month"],
    daypart: &["Daypart", "Day Part"],
    station: &["Station", "Call Letters", "Market Station"],
};

#[derive(Debug, Clone)]
pub struct NielsenParser {
    validation: ValidationSettings,
    fallback_date: NaiveDate,
}

impl NielsenParser {
    pub fn new(validation: &ValidationSettings) -> Self {
        Self {
            validation: validation.clone(),
            fallback_date: Utc::now().date_naive(),
        }
    }

    pub fn with_fallback_date(mut self, date: NaiveDate) -> Self {
        self.fallback_date = date;
        self
    }

    pub fn parse(&self, rows: &[RawRow]) -> ParseOutcome<NielsenRecord> {
        let mut records = Vec::with_capacity(rows.len());
        let mut report = IngestReport::new(VendorFormat::Nielsen);

        for (index, row) in rows.iter().enumerate() {
            let (record, fields, mut warnings) = self.read_row(row);
            let result = validate(&fields, &self.validation);
            warnings.extend(result.warnings);

            if result.is_valid {
                records.push(record);
            } else {
                debug!(
                    "Skipped Nielsen row {}: {}",
                    index + 1,
                    result.errors.join("; ")
                );
            }
            report.push_row(index, result.errors, warnings);
        }

        info!("Parsed Nielsen batch: {}", report);
        ParseOutcome { records, report }
    }

    fn read_row(&self, row: &RawRow) -> (NielsenRecord, MetricFields, Vec<String>) {
        let aliases = &NIELSEN_ALIASES;
        let mut reader = RowReader::new(row);

        let aqh_share = reader.number("aqh_share", aliases.aqh_share);
        let aqh_persons = reader.number("aqh_persons", aliases.aqh_persons);
        let cume = reader.number("cume", aliases.cume);
        let tsl = reader.number("tsl", aliases.tsl);
        let date = reader.date(aliases.date, self.fallback_date);

        let record = NielsenRecord {
            aqh_share: aqh_share.or_zero(),
            aqh_persons: aqh_persons.or_zero(),
            cume: cume.or_zero(),
            tsl: tsl.or_zero(),
            date,
            daypart: reader.text(aliases.daypart),
            station: reader.text(aliases.station),
        };
        let fields = MetricFields {
            cume: cume.presence(),
            tlh: None,
            tsl: record.tsl,
            require_cume: true,
            require_tlh: false,
        };

        (record, fields, reader.warnings)
    }
}

impl Default for NielsenParser {
    fn default() -> Self {
        Self::new(&ValidationSettings::default())
    }
}

/// Parse Nielsen rows with default validation settings, keeping valid records.
pub fn parse_nielsen(rows: &[RawRow]) -> Vec<NielsenRecord> {
    NielsenParser::default().parse(rows).records
}

impl From<&NielsenRecord> for MetricRecord {
    /// Nielsen carries no TLH column; it is reconstructed as `tsl * cume` so
    /// the aggregator can treat both vendors alike. AQH persons are not
    /// sessions, so `active_sessions` stays 0.
    fn from(record: &NielsenRecord) -> Self {
        let mut out = MetricRecord::new(record.cume, record.tsl * record.cume, 0.0, record.date);
        out.daypart = record.daypart.clone();
        out.station = record.station.clone();
        out
    }
}
