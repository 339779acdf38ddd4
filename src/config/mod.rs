mod file_config;

pub use file_config::{FileConfig, MetricsConfig};

use crate::ingestion::VendorFormat;
use crate::metrics::{
    AggregationPolicy, Dimension, Period, SessionsReduction, ValidationSettings,
    DEFAULT_TSL_WARNING_HOURS,
};
use anyhow::{anyhow, bail, Result};
use chrono::NaiveDate;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub format: Option<VendorFormat>,
    pub period: Option<Period>,
    pub dimension: Option<Dimension>,
    pub sessions_reduction: Option<SessionsReduction>,
    pub tsl_warning_hours: Option<f64>,
    pub fallback_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Forced export format, detected from headers when `None`.
    pub format: Option<VendorFormat>,
    pub period: Period,
    /// When set, aggregate by this dimension instead of by period.
    pub dimension: Option<Dimension>,
    pub fallback_date: Option<NaiveDate>,

    pub metrics: MetricsSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSettings {
    pub tsl_warning_hours: f64,
    pub sessions_reduction: SessionsReduction,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            tsl_warning_hours: DEFAULT_TSL_WARNING_HOURS,
            sessions_reduction: SessionsReduction::Sum,
        }
    }
}

impl MetricsSettings {
    pub fn validation(&self) -> ValidationSettings {
        ValidationSettings {
            tsl_warning_hours: self.tsl_warning_hours,
        }
    }

    pub fn aggregation_policy(&self) -> AggregationPolicy {
        AggregationPolicy::new(self.sessions_reduction)
    }
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let format = match file.format.as_deref() {
            Some("auto") => None,
            Some(s) => Some(s.parse::<VendorFormat>()?),
            None => cli.format,
        };

        let period = file
            .period
            .map(|s| s.parse::<Period>())
            .transpose()?
            .or(cli.period)
            .unwrap_or(Period::Weekly);

        let dimension = file
            .dimension
            .map(|s| s.parse::<Dimension>())
            .transpose()?
            .or(cli.dimension);

        let fallback_date = file
            .fallback_date
            .map(|s| {
                NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                    .map_err(|_| anyhow!("fallback_date must be YYYY-MM-DD, got {:?}", s))
            })
            .transpose()?
            .or(cli.fallback_date);

        // Metrics settings - merge file config with defaults
        let metrics_file = file.metrics.unwrap_or_default();
        let defaults = MetricsSettings::default();

        let tsl_warning_hours = metrics_file
            .tsl_warning_hours
            .or(cli.tsl_warning_hours)
            .unwrap_or(defaults.tsl_warning_hours);
        if !tsl_warning_hours.is_finite() || tsl_warning_hours <= 0.0 {
            bail!(
                "tsl_warning_hours must be a positive number, got {}",
                tsl_warning_hours
            );
        }

        let sessions_reduction = metrics_file
            .sessions_reduction
            .map(|s| s.parse::<SessionsReduction>())
            .transpose()?
            .or(cli.sessions_reduction)
            .unwrap_or(defaults.sessions_reduction);

        Ok(Self {
            format,
            period,
            dimension,
            fallback_date,
            metrics: MetricsSettings {
                tsl_warning_hours,
                sessions_reduction,
            },
        })
    }
}
