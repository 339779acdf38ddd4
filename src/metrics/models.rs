use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::MetricsError;

// ============================================================================
// Canonical Records
// ============================================================================

/// One audience-measurement observation, normalized from any vendor export.
///
/// `cume` is a deduplicated head count and must never be summed across
/// records, `tlh` is additive, and `tsl` is always derived from the other two.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricRecord {
    pub cume: f64,
    pub tlh: f64,
    pub tsl: f64,
    pub active_sessions: f64,
    /// Week start for weekly exports, observation day otherwise
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daypart: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station: Option<String>,
    /// 0-23, only present for hourly exports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<u8>,
}

impl MetricRecord {
    /// Builds a record with `tsl` derived from `tlh` and `cume`.
    pub fn new(cume: f64, tlh: f64, active_sessions: f64, date: NaiveDate) -> Self {
        Self {
            cume,
            tlh,
            tsl: super::compute_tsl(tlh, cume),
            active_sessions,
            date,
            daypart: None,
            device: None,
            station: None,
            hour: None,
        }
    }

    pub fn with_daypart(mut self, daypart: impl Into<String>) -> Self {
        self.daypart = Some(daypart.into());
        self
    }

    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }

    pub fn with_station(mut self, station: impl Into<String>) -> Self {
        self.station = Some(station.into());
        self
    }

    pub fn with_hour(mut self, hour: u8) -> Self {
        self.hour = Some(hour);
        self
    }

    /// Value of a categorical dimension, if the record carries one.
    pub fn dimension(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Daypart => self.daypart.as_deref(),
            Dimension::Device => self.device.as_deref(),
            Dimension::Station => self.station.as_deref(),
        }
    }

    pub(crate) fn set_dimension(&mut self, dimension: Dimension, value: Option<String>) {
        match dimension {
            Dimension::Daypart => self.daypart = value,
            Dimension::Device => self.device = value,
            Dimension::Station => self.station = value,
        }
    }
}

/// Nielsen export row. Unlike Triton, `tsl` comes straight from the vendor.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NielsenRecord {
    pub aqh_share: f64,
    pub aqh_persons: f64,
    pub cume: f64,
    pub tsl: f64,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daypart: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station: Option<String>,
}

// ============================================================================
// Grouping Keys
// ============================================================================

/// Time bucket used by period aggregation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(Period::Daily),
            "weekly" | "week" => Ok(Period::Weekly),
            "monthly" | "month" => Ok(Period::Monthly),
            _ => Err(MetricsError::UnknownPeriod(s.to_string())),
        }
    }
}

/// Categorical field used by dimension aggregation and filtering.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Daypart,
    Device,
    Station,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Daypart => "daypart",
            Dimension::Device => "device",
            Dimension::Station => "station",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daypart" | "day part" | "day_part" => Ok(Dimension::Daypart),
            "device" | "platform" => Ok(Dimension::Device),
            "station" => Ok(Dimension::Station),
            _ => Err(MetricsError::UnknownDimension(s.to_string())),
        }
    }
}
