//! Period and dimension aggregation.
//!
//! Every reduction follows the same per-metric policy:
//! - `cume` is averaged over positive values, never summed
//! - `tlh` is summed
//! - `active_sessions` is summed or averaged, as the caller asks
//! - `tsl` is recomputed from the reduced `tlh` and `cume`
//!
//! Inputs are never mutated; each bucket yields a new record.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use super::calc::{compute_average_cume, compute_tsl};
use super::models::{Dimension, MetricRecord, Period};
use super::MetricsError;

/// Bucket name used for records that lack the grouped dimension.
pub const UNKNOWN_BUCKET: &str = "Unknown";

/// How `active_sessions` is reduced within a bucket.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionsReduction {
    #[default]
    Sum,
    Average,
}

impl fmt::Display for SessionsReduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionsReduction::Sum => f.write_str("sum"),
            SessionsReduction::Average => f.write_str("average"),
        }
    }
}

impl FromStr for SessionsReduction {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(SessionsReduction::Sum),
            "average" | "avg" | "mean" => Ok(SessionsReduction::Average),
            _ => Err(MetricsError::UnknownReduction(s.to_string())),
        }
    }
}

/// Reduction choices a caller can make explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AggregationPolicy {
    pub sessions: SessionsReduction,
}

impl AggregationPolicy {
    pub fn new(sessions: SessionsReduction) -> Self {
        Self { sessions }
    }
}

/// Start date of the bucket `date` falls into.
///
/// Weeks start on Sunday, months on their first day.
pub fn bucket_start(date: NaiveDate, period: Period) -> NaiveDate {
    match period {
        Period::Daily => date,
        Period::Weekly => {
            let offset = date.weekday().num_days_from_sunday() as u64;
            date.checked_sub_days(Days::new(offset)).unwrap_or(date)
        }
        Period::Monthly => date.with_day(1).unwrap_or(date),
    }
}

/// Human readable bucket key: `YYYY-MM-DD`, or `YYYY-MM` for months.
pub fn bucket_label(date: NaiveDate, period: Period) -> String {
    let start = bucket_start(date, period);
    match period {
        Period::Monthly => format!("{}-{:02}", start.year(), start.month()),
        Period::Daily | Period::Weekly => start.format("%Y-%m-%d").to_string(),
    }
}

/// Aggregate by time bucket with sessions summed. Output is sorted by date.
pub fn aggregate_by_period(records: &[MetricRecord], period: Period) -> Vec<MetricRecord> {
    aggregate_by_period_with(records, period, &AggregationPolicy::default())
}

pub fn aggregate_by_period_with(
    records: &[MetricRecord],
    period: Period,
    policy: &AggregationPolicy,
) -> Vec<MetricRecord> {
    let mut buckets: BTreeMap<NaiveDate, Bucket> = BTreeMap::new();
    for record in records {
        let start = bucket_start(record.date, period);
        buckets
            .entry(start)
            .or_insert_with(|| Bucket::new(start))
            .push(record);
    }

    buckets
        .into_values()
        .map(|bucket| bucket.finish(policy))
        .collect()
}

/// Aggregate by categorical dimension with sessions summed.
///
/// Values are compared ignoring case; a bucket is labelled with the first
/// spelling seen. Buckets come out in the order their key first appears in
/// `records`; callers sort as their report needs (see [`rank_by_cume`]).
pub fn aggregate_by_dimension(records: &[MetricRecord], dimension: Dimension) -> Vec<MetricRecord> {
    aggregate_by_dimension_with(records, dimension, &AggregationPolicy::default())
}

pub fn aggregate_by_dimension_with(
    records: &[MetricRecord],
    dimension: Dimension,
    policy: &AggregationPolicy,
) -> Vec<MetricRecord> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<(&str, Bucket)> = Vec::new();

    for record in records {
        let key = dimension_key(record, dimension);
        let slot = *index.entry(key.to_lowercase()).or_insert_with(|| {
            buckets.push((key, Bucket::new(record.date)));
            buckets.len() - 1
        });
        buckets[slot].1.push_keep_earliest(record);
    }

    buckets
        .into_iter()
        .map(|(key, bucket)| {
            let mut out = bucket.finish(policy);
            out.set_dimension(dimension, Some(key.to_string()));
            out
        })
        .collect()
}

/// Collapse a whole set into one record, dated at its earliest observation.
pub fn summarize(records: &[MetricRecord], policy: &AggregationPolicy) -> Option<MetricRecord> {
    let first = records.first()?;
    let mut bucket = Bucket::new(first.date);
    for record in records {
        bucket.push_keep_earliest(record);
    }
    Some(bucket.finish(policy))
}

/// Sort descending by CUME, best performer first.
pub fn rank_by_cume(mut records: Vec<MetricRecord>) -> Vec<MetricRecord> {
    records.sort_by(|a, b| b.cume.total_cmp(&a.cume));
    records
}

/// Records whose dimension matches `value`, ignoring case.
///
/// Selects exactly the records [`aggregate_by_dimension`] puts in the bucket
/// for `value`; asking for [`UNKNOWN_BUCKET`] selects the records without
/// that dimension.
pub fn filter_by_dimension(
    records: &[MetricRecord],
    dimension: Dimension,
    value: &str,
) -> Vec<MetricRecord> {
    let wanted = value.trim().to_lowercase();
    records
        .iter()
        .filter(|r| dimension_key(r, dimension).to_lowercase() == wanted)
        .cloned()
        .collect()
}

fn dimension_key(record: &MetricRecord, dimension: Dimension) -> &str {
    record
        .dimension(dimension)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(UNKNOWN_BUCKET)
}

// ============================================================================
// Bucket fold
// ============================================================================

/// Tracks whether every record in a bucket shares the same optional value.
#[derive(Debug)]
enum Consensus<T> {
    Empty,
    Agreed(Option<T>),
    Mixed,
}

impl<T: PartialEq + Clone> Consensus<T> {
    fn observe(&mut self, value: Option<&T>) {
        let next = match &*self {
            Consensus::Empty => Consensus::Agreed(value.cloned()),
            Consensus::Agreed(current) if current.as_ref() != value => Consensus::Mixed,
            _ => return,
        };
        *self = next;
    }

    fn resolve(self) -> Option<T> {
        match self {
            Consensus::Agreed(value) => value,
            Consensus::Empty | Consensus::Mixed => None,
        }
    }
}

#[derive(Debug)]
struct Bucket {
    date: NaiveDate,
    cumes: Vec<f64>,
    tlh: f64,
    sessions: f64,
    count: usize,
    daypart: Consensus<String>,
    device: Consensus<String>,
    station: Consensus<String>,
    hour: Consensus<u8>,
}

impl Bucket {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            cumes: Vec::new(),
            tlh: 0.0,
            sessions: 0.0,
            count: 0,
            daypart: Consensus::Empty,
            device: Consensus::Empty,
            station: Consensus::Empty,
            hour: Consensus::Empty,
        }
    }

    fn push(&mut self, record: &MetricRecord) {
        self.cumes.push(record.cume);
        self.tlh += record.tlh;
        self.sessions += record.active_sessions;
        self.count += 1;
        self.daypart.observe(record.daypart.as_ref());
        self.device.observe(record.device.as_ref());
        self.station.observe(record.station.as_ref());
        self.hour.observe(record.hour.as_ref());
    }

    fn push_keep_earliest(&mut self, record: &MetricRecord) {
        self.date = self.date.min(record.date);
        self.push(record);
    }

    fn finish(self, policy: &AggregationPolicy) -> MetricRecord {
        let cume = compute_average_cume(&self.cumes);
        let active_sessions = match policy.sessions {
            SessionsReduction::Sum => self.sessions,
            SessionsReduction::Average if self.count > 0 => self.sessions / self.count as f64,
            SessionsReduction::Average => 0.0,
        };

        MetricRecord {
            cume,
            tlh: self.tlh,
            tsl: compute_tsl(self.tlh, cume),
            active_sessions,
            date: self.date,
            daypart: self.daypart.resolve(),
            device: self.device.resolve(),
            station: self.station.resolve(),
            hour: self.hour.resolve(),
        }
    }
}
