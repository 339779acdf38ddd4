//! Decoding of CSV exports into raw rows.

use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, warn};

use super::raw_row::{RawRow, RawValue};
use super::IngestError;

/// Decode CSV text with a header line into raw rows.
///
/// Every row carries the full header set: cells missing from a short line
/// are `RawValue::Empty`. Cells that are not valid UTF-8 are decoded lossily
/// so a single bad line never fails the batch; only an unreadable header
/// line or a broken stream is an error. Cells stay text; numeric coercion
/// happens during field resolution.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<RawRow>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    debug!("CSV headers: {:?}", headers);

    let mut rows = Vec::new();
    for (index, result) in csv_reader.byte_records().enumerate() {
        let record = result?;
        let mut row = RawRow::new();
        for (position, key) in headers.iter().enumerate() {
            let value = match record.get(position) {
                Some(bytes) => {
                    let cell = String::from_utf8_lossy(bytes);
                    if let Cow::Owned(_) = cell {
                        warn!(
                            "Row {} column '{}' is not valid UTF-8, decoded lossily",
                            index + 1,
                            key
                        );
                    }
                    RawValue::from(cell.into_owned())
                }
                None => RawValue::Empty,
            };
            row.insert(key, value);
        }
        rows.push(row);
    }

    debug!("Decoded {} CSV rows", rows.len());
    Ok(rows)
}

pub fn read_rows_from_path(path: &Path) -> Result<Vec<RawRow>, IngestError> {
    let file = File::open(path)?;
    read_rows(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::{ingest, IngestOptions, VendorFormat};
    use std::io::Write;

    #[test]
    fn test_read_rows() {
        let data = "Week,Station,CUME,TLH\n2024-01-07,WXYZ,100,250\n2024-01-14,WXYZ,\"1,200\",300\n";
        let rows = read_rows(data.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].headers(), vec!["Week", "Station", "CUME", "TLH"]);
        assert_eq!(rows[0].get("CUME"), Some(&RawValue::from("100")));
        assert_eq!(rows[1].get("CUME"), Some(&RawValue::from("1,200")));
    }

    #[test]
    fn test_read_rows_trims_headers_and_pads_short_lines() {
        let data = " Week , CUME ,TLH\n2024-01-07,100\n";
        let rows = read_rows(data.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].headers(), vec!["Week", "CUME", "TLH"]);
        assert_eq!(rows[0].get("TLH"), Some(&RawValue::Empty));
    }

    #[test]
    fn test_short_first_line_keeps_format_detectable() {
        let data = "Date,Cume,TSL,AQH Share\n2024-02-05,5000,2.5\n2024-02-06,4000,1.5,2.1\n";
        let rows = read_rows(data.as_bytes()).unwrap();

        assert_eq!(rows[0].headers(), vec!["Date", "Cume", "TSL", "AQH Share"]);
        let outcome = ingest(&rows, &IngestOptions::default()).unwrap();
        assert_eq!(outcome.format(), VendorFormat::Nielsen);
        assert_eq!(outcome.report().to_string(), "2 of 2 rows valid");
    }

    #[test]
    fn test_invalid_utf8_row_does_not_fail_batch() {
        let mut data = b"Week,Station,CUME,TLH\n2024-01-07,WXYZ,100,200\n".to_vec();
        data.extend_from_slice(b"2024-01-14,W\xff\xfeZ,110,220\n");
        data.extend_from_slice(b"2024-01-21,WABC,120,240\n");

        let rows = read_rows(data.as_slice()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].get("Station"), Some(&RawValue::from("WXYZ")));
        let station = rows[1].get("Station").unwrap().as_text();
        assert!(station.starts_with('W') && station.contains('\u{FFFD}'));
        assert_eq!(rows[2].get("CUME"), Some(&RawValue::from("120")));

        let outcome = ingest(&rows, &IngestOptions::default()).unwrap();
        assert_eq!(outcome.report().to_string(), "3 of 3 rows valid");
    }

    #[test]
    fn test_read_rows_header_only() {
        let rows = read_rows("CUME,TLH\n".as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_read_rows_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "AQH Share,CUME").unwrap();
        writeln!(file, "3.1,900").unwrap();

        let rows = read_rows_from_path(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("AQH Share"), Some(&RawValue::from("3.1")));
    }

    #[test]
    fn test_read_rows_missing_file() {
        let result = read_rows_from_path(Path::new("/nonexistent/export.csv"));
        assert!(matches!(result, Err(IngestError::Io(_))));
    }
}
