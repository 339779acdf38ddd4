//! Vendor export format detection from column headers.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::fields::normalize_key;
use crate::metrics::MetricsError;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VendorFormat {
    Triton,
    Nielsen,
    Unknown,
}

impl VendorFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            VendorFormat::Triton => "triton",
            VendorFormat::Nielsen => "nielsen",
            VendorFormat::Unknown => "unknown",
        }
    }
}

impl fmt::Display for VendorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VendorFormat {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "triton" => Ok(VendorFormat::Triton),
            "nielsen" => Ok(VendorFormat::Nielsen),
            _ => Err(MetricsError::UnknownFormat(s.to_string())),
        }
    }
}

const TRITON_INDICATORS: &[&str] = &["aas", "active sessions", "activesessions", "week", "station"];
const NIELSEN_INDICATORS: &[&str] = &["aqh share", "aqhshare", "aqh persons"];

/// Classify an export by its header names.
///
/// Precedence is fixed: Triton indicators are checked first and win even if
/// Nielsen indicators are also present (a Nielsen export with a `Station`
/// column reads as Triton). Without any indicator, a header set carrying
/// both `cume` and `tlh` is assumed to be Triton.
pub fn detect_format<S: AsRef<str>>(headers: &[S]) -> VendorFormat {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_key(h.as_ref())).collect();
    let has = |name: &str| normalized.iter().any(|h| h == name);

    if TRITON_INDICATORS.iter().any(|&i| has(i)) {
        return VendorFormat::Triton;
    }
    if NIELSEN_INDICATORS.iter().any(|&i| has(i)) {
        return VendorFormat::Nielsen;
    }
    if has("cume") && has("tlh") {
        return VendorFormat::Triton;
    }
    VendorFormat::Unknown
}
