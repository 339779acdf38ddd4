use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use audience_metrics::config::{AppConfig, CliConfig, FileConfig};
use audience_metrics::ingestion::{ingest, read_rows_from_path, IngestOptions, IngestReport};
use audience_metrics::metrics::{
    aggregate_by_dimension_with, aggregate_by_period_with, bucket_label, rank_by_cume, summarize,
    Dimension, MetricRecord, Period, SessionsReduction, UNKNOWN_BUCKET,
};
use audience_metrics::VendorFormat;

mod cli_style;
use cli_style::{
    get_styles, print_dim, print_error, print_key_value, print_section_header, print_success,
    print_warning, Table,
};

/// Row warnings shown before the rest are collapsed into a count.
const MAX_LISTED_WARNINGS: usize = 10;

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    if path_buf.is_absolute() {
        return Ok(path_buf);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(path_buf))
}

/// `--format` value; `None` means detect from the headers.
#[derive(Debug, Clone, Copy)]
struct FormatArg(Option<VendorFormat>);

fn parse_format(s: &str) -> Result<FormatArg> {
    if s.trim().eq_ignore_ascii_case("auto") {
        return Ok(FormatArg(None));
    }
    Ok(FormatArg(Some(s.parse::<VendorFormat>()?)))
}

#[derive(Parser, Debug)]
#[command(name = "audience-report", styles = get_styles())]
struct CliArgs {
    /// Path to the Triton or Nielsen CSV export.
    #[clap(value_parser = parse_path)]
    pub input: PathBuf,

    /// Path to a TOML config file. Values in the file override CLI flags.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Export format: auto, triton or nielsen.
    #[clap(long, default_value = "auto", value_parser = parse_format)]
    pub format: FormatArg,

    /// Time bucket for the report: daily, weekly or monthly.
    #[clap(long)]
    pub period: Option<Period>,

    /// Group by daypart, device or station instead of by period.
    #[clap(long = "by")]
    pub dimension: Option<Dimension>,

    /// How active sessions combine inside a bucket: sum or average.
    #[clap(long)]
    pub sessions: Option<SessionsReduction>,

    /// TSL above this many hours is reported as a warning.
    #[clap(long)]
    pub tsl_warning_hours: Option<f64>,

    /// Date (YYYY-MM-DD) for rows that carry none. Defaults to today.
    #[clap(long)]
    pub fallback_date: Option<NaiveDate>,

    /// Print the report as JSON instead of a table.
    #[clap(long)]
    pub json: bool,

    /// List every row warning.
    #[clap(short, long)]
    pub verbose: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    ingestion: &'a IngestReport,
    grouping: String,
    buckets: &'a [MetricRecord],
    total: Option<&'a MetricRecord>,
}

/// How the aggregated rows are keyed.
#[derive(Debug, Clone, Copy)]
enum Grouping {
    Period(Period),
    Dimension(Dimension),
}

impl Grouping {
    fn title(&self) -> String {
        match self {
            Grouping::Period(period) => period.to_string(),
            Grouping::Dimension(dimension) => dimension.to_string(),
        }
    }

    fn label(&self, record: &MetricRecord) -> String {
        match self {
            Grouping::Period(period) => bucket_label(record.date, *period),
            Grouping::Dimension(dimension) => record
                .dimension(*dimension)
                .unwrap_or(UNKNOWN_BUCKET)
                .to_string(),
        }
    }
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    // Logs go to stderr so --json output stays clean.
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;

    let cli_config = CliConfig {
        format: cli_args.format.0,
        period: cli_args.period,
        dimension: cli_args.dimension,
        sessions_reduction: cli_args.sessions,
        tsl_warning_hours: cli_args.tsl_warning_hours,
        fallback_date: cli_args.fallback_date,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    run(&cli_args.input, &config, cli_args.json, cli_args.verbose)
}

fn run(input: &Path, config: &AppConfig, json: bool, verbose: bool) -> Result<()> {
    info!("Reading export {:?}", input);
    let rows = read_rows_from_path(input)
        .with_context(|| format!("Failed to read export: {:?}", input))?;

    let options = IngestOptions {
        format: config.format,
        validation: config.metrics.validation(),
        fallback_date: config.fallback_date,
    };
    let outcome = ingest(&rows, &options)
        .with_context(|| format!("Failed to ingest export: {:?}", input))?;

    let records = outcome.metric_records();
    let policy = config.metrics.aggregation_policy();
    let grouping = match config.dimension {
        Some(dimension) => Grouping::Dimension(dimension),
        None => Grouping::Period(config.period),
    };
    let buckets = match grouping {
        Grouping::Period(period) => aggregate_by_period_with(&records, period, &policy),
        Grouping::Dimension(dimension) => {
            rank_by_cume(aggregate_by_dimension_with(&records, dimension, &policy))
        }
    };
    let total = summarize(&records, &policy);
    info!(
        "Aggregated {} records into {} {} buckets",
        records.len(),
        buckets.len(),
        grouping.title()
    );

    if json {
        let report = JsonReport {
            ingestion: outcome.report(),
            grouping: grouping.title(),
            buckets: &buckets,
            total: total.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_ingestion(outcome.report(), verbose);
    print_buckets(grouping, &buckets);
    if let Some(total) = &total {
        print_section_header("Total");
        print_key_value("CUME (average)", &format!("{:.0}", total.cume));
        print_key_value("TLH", &format!("{:.1}", total.tlh));
        print_key_value("TSL", &format!("{:.2}", total.tsl));
        print_key_value("Active sessions", &format!("{:.1}", total.active_sessions));
    }
    Ok(())
}

fn print_ingestion(report: &IngestReport, verbose: bool) {
    print_section_header("Ingestion");
    print_key_value("Format", report.format.as_str());
    if report.all_valid() {
        print_success(&report.to_string());
    } else {
        print_warning(&report.to_string());
    }

    for row in report.rejected() {
        print_error(&format!("Row {}: {}", row.row, row.errors.join("; ")));
    }

    let warnings: Vec<(usize, &String)> = report
        .rows
        .iter()
        .flat_map(|r| r.warnings.iter().map(move |w| (r.row, w)))
        .collect();
    let shown = if verbose {
        warnings.len()
    } else {
        warnings.len().min(MAX_LISTED_WARNINGS)
    };
    for (row, warning) in &warnings[..shown] {
        print_warning(&format!("Row {}: {}", row, warning));
    }
    if shown < warnings.len() {
        print_dim(&format!(
            "{} more warnings, use --verbose to list them",
            warnings.len() - shown
        ));
    }
}

fn print_buckets(grouping: Grouping, buckets: &[MetricRecord]) {
    print_section_header(&format!("By {}", grouping.title()));
    if buckets.is_empty() {
        print_dim("No valid rows to aggregate");
        return;
    }

    let mut table = Table::new(&[
        match grouping {
            Grouping::Period(_) => "Period",
            Grouping::Dimension(_) => "Value",
        },
        "CUME",
        "TLH",
        "TSL",
        "Sessions",
    ]);
    for record in buckets {
        table.add_row(vec![
            grouping.label(record),
            format!("{:.0}", record.cume),
            format!("{:.1}", record.tlh),
            format!("{:.2}", record.tsl),
            format!("{:.1}", record.active_sessions),
        ]);
    }
    table.print();
}
