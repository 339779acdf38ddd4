//! Row and record builders for tests.

#![allow(dead_code)]

use audience_metrics::{MetricRecord, RawRow};
use chrono::NaiveDate;
use std::io::Write;
use tempfile::NamedTempFile;

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A Triton row with numeric cells given as text, the way CSV delivers them.
pub fn triton_row(week: &str, station: &str, cume: &str, tlh: &str) -> RawRow {
    RawRow::new()
        .with("Week", week)
        .with("Station", station)
        .with("CUME", cume)
        .with("TLH", tlh)
}

pub fn nielsen_row(date: &str, daypart: &str, cume: f64, tsl: f64) -> RawRow {
    RawRow::new()
        .with("Date", date)
        .with("Daypart", daypart)
        .with("AQH Share", 1.0)
        .with("Cume", cume)
        .with("TSL", tsl)
}

pub fn record(cume: f64, tlh: f64, sessions: f64, date: NaiveDate) -> MetricRecord {
    MetricRecord::new(cume, tlh, sessions, date)
}

/// Write `contents` to a temporary file that lives as long as the handle.
pub fn write_export(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
