//! Field resolution over vendor rows.
//!
//! Vendors spell the same column many ways ("CUME", "Cume", "Cumulative
//! Audience"). Each canonical field has an ordered alias list; the first alias
//! with a non-empty value wins, so alias order is a priority order.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::raw_row::{RawRow, RawValue};

/// Lower-cased, trimmed key with inner whitespace collapsed to single spaces.
pub fn normalize_key(key: &str) -> String {
    key.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// First non-empty value for the given aliases.
///
/// Each alias is tried as an exact key first, then case-insensitively.
/// Blank cells are skipped as if the column were absent.
pub fn resolve<'a>(row: &'a RawRow, aliases: &[&str]) -> Option<&'a RawValue> {
    for alias in aliases {
        if let Some(value) = row.get(alias).filter(|v| !v.is_blank()) {
            return Some(value);
        }

        let wanted = normalize_key(alias);
        let loose = row
            .iter()
            .find(|(key, value)| !value.is_blank() && normalize_key(key) == wanted);
        if let Some((_, value)) = loose {
            return Some(value);
        }
    }
    None
}

/// Numeric lookup result, keeping "absent" apart from "present but garbled".
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Missing,
    Parsed(f64),
    Unparseable(String),
}

impl FieldValue {
    /// Silent-default view used to fill records: anything but a parsed
    /// number becomes 0.
    pub fn or_zero(&self) -> f64 {
        match self {
            FieldValue::Parsed(v) => *v,
            FieldValue::Missing | FieldValue::Unparseable(_) => 0.0,
        }
    }

    /// Presence view used by the validator: only a missing column is `None`.
    pub fn presence(&self) -> Option<f64> {
        match self {
            FieldValue::Missing => None,
            _ => Some(self.or_zero()),
        }
    }
}

pub fn resolve_number(row: &RawRow, aliases: &[&str]) -> FieldValue {
    match resolve(row, aliases) {
        None => FieldValue::Missing,
        Some(RawValue::Number(n)) if n.is_finite() => FieldValue::Parsed(*n),
        Some(value) => {
            let text = value.as_text();
            match parse_number(&text) {
                Some(n) => FieldValue::Parsed(n),
                None => FieldValue::Unparseable(text.into_owned()),
            }
        }
    }
}

/// Parse vendor numeric text: `"1,234"`, `" 12.5 "` and `"4.2%"` are accepted.
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.strip_suffix('%').unwrap_or(&cleaned).trim_end();
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

pub fn resolve_text(row: &RawRow, aliases: &[&str]) -> Option<String> {
    resolve(row, aliases).map(|v| v.as_text().trim().to_string())
}

/// Date lookup: `Err` carries the raw text when a value exists but no
/// supported format matches it.
pub fn resolve_date(row: &RawRow, aliases: &[&str]) -> Option<Result<NaiveDate, String>> {
    resolve(row, aliases).map(|value| {
        let text = value.as_text();
        parse_date(&text).ok_or_else(|| text.into_owned())
    })
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%Y"];

/// Parse the date spellings seen in Triton and Nielsen exports.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date());
        }
    }

    // YYYYMMDD, possibly coming through as a number
    let compact = text.strip_suffix(".0").unwrap_or(text);
    if compact.len() == 8 && compact.chars().all(|c| c.is_ascii_digit()) {
        let year = compact[0..4].parse().ok()?;
        let month = compact[4..6].parse().ok()?;
        let day = compact[6..8].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if has_short_year(text) {
        return NaiveDate::parse_from_str(text, "%m/%d/%y").ok();
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// `M/D/YY` style, where `%Y` would read "24" as the year 24.
fn has_short_year(text: &str) -> bool {
    let parts: Vec<&str> = text.split('/').collect();
    parts.len() == 3 && parts[0].len() <= 2 && parts[2].len() == 2
}

/// Hour of day in 0..=23. Accepts `7`, `"07"` and `"07:00"`.
///
/// `Err` carries the raw text for values present but out of range.
pub fn resolve_hour(row: &RawRow, aliases: &[&str]) -> Option<Result<u8, String>> {
    resolve(row, aliases).map(|value| {
        let text = value.as_text();
        parse_hour(&text).ok_or_else(|| text.into_owned())
    })
}

pub fn parse_hour(text: &str) -> Option<u8> {
    let text = text.trim();
    let head = text.split(':').next().unwrap_or(text);
    let head = head.strip_suffix(".0").unwrap_or(head);
    head.trim().parse::<u8>().ok().filter(|h| *h <= 23)
}

/// Reads one row field by field, collecting the data-quality warnings that
/// silent defaults would otherwise hide.
#[derive(Debug)]
pub(crate) struct RowReader<'a> {
    row: &'a RawRow,
    pub(crate) warnings: Vec<String>,
}

impl<'a> RowReader<'a> {
    pub(crate) fn new(row: &'a RawRow) -> Self {
        Self {
            row,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn number(&mut self, field: &str, aliases: &[&str]) -> FieldValue {
        let value = resolve_number(self.row, aliases);
        if let FieldValue::Unparseable(raw) = &value {
            self.warnings.push(format!(
                "Field '{}' value '{}' is not numeric, defaulted to 0",
                field, raw
            ));
        }
        value
    }

    pub(crate) fn text(&self, aliases: &[&str]) -> Option<String> {
        resolve_text(self.row, aliases)
    }

    pub(crate) fn date(&mut self, aliases: &[&str], fallback: NaiveDate) -> NaiveDate {
        match resolve_date(self.row, aliases) {
            Some(Ok(date)) => date,
            Some(Err(raw)) => {
                self.warnings.push(format!(
                    "Unparseable date '{}', defaulted to {}",
                    raw, fallback
                ));
                fallback
            }
            None => {
                self.warnings
                    .push(format!("No date column found, defaulted to {}", fallback));
                fallback
            }
        }
    }

    pub(crate) fn hour(&mut self, aliases: &[&str]) -> Option<u8> {
        match resolve_hour(self.row, aliases)? {
            Ok(hour) => Some(hour),
            Err(raw) => {
                self.warnings
                    .push(format!("Hour '{}' is not in 0-23, ignored", raw));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("  Active   Sessions "), "active sessions");
        assert_eq!(normalize_key("CUME"), "cume");
    }

    #[test]
    fn test_resolve_exact_match() {
        let row = RawRow::new().with("CUME", "100");
        assert_eq!(resolve(&row, &["CUME"]), Some(&RawValue::from("100")));
    }

    #[test]
    fn test_resolve_case_insensitive() {
        let row = RawRow::new().with(" cume ", "100");
        assert_eq!(resolve(&row, &["CUME"]), Some(&RawValue::from("100")));
    }

    #[test]
    fn test_resolve_alias_priority() {
        let row = RawRow::new()
            .with("Cumulative Audience", "999")
            .with("CUME", "100");
        assert_eq!(
            resolve(&row, &["CUME", "Cumulative Audience"]),
            Some(&RawValue::from("100"))
        );
    }

    #[test]
    fn test_resolve_blank_is_absent() {
        let row = RawRow::new()
            .with("CUME", "")
            .with("Cumulative Audience", "250");
        assert_eq!(
            resolve(&row, &["CUME", "Cumulative Audience"]),
            Some(&RawValue::from("250"))
        );

        let row = RawRow::new().with("CUME", "  ");
        assert_eq!(resolve(&row, &["CUME"]), None);
    }

    #[test]
    fn test_resolve_exact_blank_falls_back_to_loose_match() {
        let row = RawRow::new().with("CUME", "").with("cume", "42");
        assert_eq!(resolve(&row, &["CUME"]), Some(&RawValue::from("42")));
    }

    #[test]
    fn test_resolve_none() {
        let row = RawRow::new().with("foo", "1");
        assert_eq!(resolve(&row, &["CUME", "TLH"]), None);
        assert_eq!(resolve(&RawRow::new(), &["CUME"]), None);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("1,234"), Some(1234.0));
        assert_eq!(parse_number(" 12.5 "), Some(12.5));
        assert_eq!(parse_number("4.2%"), Some(4.2));
        assert_eq!(parse_number("-3"), Some(-3.0));
        assert_eq!(parse_number("n/a"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_resolve_number_states() {
        let row = RawRow::new()
            .with("CUME", 1500.0)
            .with("TLH", "oops")
            .with("AAS", "7");
        assert_eq!(resolve_number(&row, &["CUME"]), FieldValue::Parsed(1500.0));
        assert_eq!(
            resolve_number(&row, &["TLH"]),
            FieldValue::Unparseable("oops".to_string())
        );
        assert_eq!(resolve_number(&row, &["AAS"]), FieldValue::Parsed(7.0));
        assert_eq!(resolve_number(&row, &["Missing"]), FieldValue::Missing);
    }

    #[test]
    fn test_field_value_views() {
        assert_eq!(FieldValue::Missing.or_zero(), 0.0);
        assert_eq!(FieldValue::Missing.presence(), None);
        assert_eq!(FieldValue::Unparseable("x".into()).presence(), Some(0.0));
        assert_eq!(FieldValue::Parsed(3.0).presence(), Some(3.0));
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2024-01-07"), Some(day(2024, 1, 7)));
        assert_eq!(parse_date("2024/01/07"), Some(day(2024, 1, 7)));
        assert_eq!(parse_date("1/7/2024"), Some(day(2024, 1, 7)));
        assert_eq!(parse_date("01/07/2024"), Some(day(2024, 1, 7)));
        assert_eq!(parse_date("1/7/24"), Some(day(2024, 1, 7)));
        assert_eq!(parse_date("20240107"), Some(day(2024, 1, 7)));
        assert_eq!(parse_date("2024-01-07 13:45:00"), Some(day(2024, 1, 7)));
        assert_eq!(parse_date("2024-01-07T13:45:00Z"), Some(day(2024, 1, 7)));
        assert_eq!(parse_date("07-Jan-2024"), Some(day(2024, 1, 7)));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("last week"), None);
        assert_eq!(parse_date("2024-13-45"), None);
    }

    #[test]
    fn test_resolve_date_number() {
        let row = RawRow::new().with("Date", 20240107.0);
        assert_eq!(resolve_date(&row, &["Date"]), Some(Ok(day(2024, 1, 7))));

        let row = RawRow::new().with("Date", "soon");
        assert_eq!(resolve_date(&row, &["Date"]), Some(Err("soon".to_string())));

        assert_eq!(resolve_date(&RawRow::new(), &["Date"]), None);
    }

    #[test]
    fn test_parse_hour() {
        assert_eq!(parse_hour("7"), Some(7));
        assert_eq!(parse_hour("07:00"), Some(7));
        assert_eq!(parse_hour("23"), Some(23));
        assert_eq!(parse_hour("24"), None);
        assert_eq!(parse_hour("noon"), None);
    }

    #[test]
    fn test_resolve_hour() {
        let row = RawRow::new().with("Hour", 6.0);
        assert_eq!(resolve_hour(&row, &["Hour"]), Some(Ok(6)));
        let row = RawRow::new().with("hour", "31");
        assert_eq!(resolve_hour(&row, &["Hour"]), Some(Err("31".to_string())));
    }

    #[test]
    fn test_row_reader_collects_warnings() {
        let row = RawRow::new()
            .with("CUME", "lots")
            .with("Week", "someday")
            .with("Hour", "25");
        let fallback = day(2024, 6, 1);
        let mut reader = RowReader::new(&row);

        assert_eq!(
            reader.number("cume", &["CUME"]),
            FieldValue::Unparseable("lots".to_string())
        );
        assert_eq!(reader.number("tlh", &["TLH"]), FieldValue::Missing);
        assert_eq!(reader.date(&["Week"], fallback), fallback);
        assert_eq!(reader.hour(&["Hour"]), None);

        assert_eq!(reader.warnings.len(), 3);
        assert!(reader.warnings[0].contains("'cume'"));
        assert!(reader.warnings[1].contains("someday"));
        assert!(reader.warnings[2].contains("25"));
    }

    #[test]
    fn test_row_reader_missing_date_warns() {
        let row = RawRow::new();
        let mut reader = RowReader::new(&row);
        let fallback = day(2024, 6, 1);
        assert_eq!(reader.date(&["Date"], fallback), fallback);
        assert_eq!(
            reader.warnings,
            vec!["No date column found, defaulted to 2024-06-01".to_string()]
        );
    }
}
