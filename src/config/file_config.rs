use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Report settings (can override CLI)
    pub format: Option<String>,
    pub period: Option<String>,
    pub dimension: Option<String>,
    pub fallback_date: Option<String>,

    // Metric arithmetic
    pub metrics: Option<MetricsConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct MetricsConfig {
    /// TSL above this many hours is flagged as a warning.
    pub tsl_warning_hours: Option<f64>,
    /// How active sessions are reduced when aggregating: "sum" or "average".
    pub sessions_reduction: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
