//! CLI entry point for the dataset exploration tool.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tablescope::{
    AnalysisCommand, AnalysisConfig, AnalysisError, AnalysisOutput, AnalysisReport, GroupStat,
    OutlierMethod, Schema, run_command,
};
use tracing::{debug, error, info};

/// CLI-compatible analysis view enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliView {
    /// Dataset overview with per-column statistics and a row sample
    Info,
    /// Duplicate rows
    Duplicates,
    /// Missing values per column
    Missing,
    /// Rows flagged as outliers
    Outliers,
    /// Histogram and category bar grids
    Distributions,
    /// Pearson heatmap and scatter matrix
    Correlations,
    /// Aggregate value columns per group
    GroupBy,
}

/// CLI-compatible outlier method enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutlierMethod {
    /// Flag values more than the threshold standard deviations from the mean
    Zscore,
    /// Flag values outside the IQR fences
    Iqr,
}

impl From<CliOutlierMethod> for OutlierMethod {
    fn from(cli: CliOutlierMethod) -> Self {
        match cli {
            CliOutlierMethod::Zscore => OutlierMethod::ZScore,
            CliOutlierMethod::Iqr => OutlierMethod::Iqr,
        }
    }
}

/// CLI-compatible group statistic enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliGroupStat {
    /// Mean of each group
    Mean,
    /// Median of each group
    Median,
    /// Sum of each group
    Sum,
}

impl From<CliGroupStat> for GroupStat {
    fn from(cli: CliGroupStat) -> Self {
        match cli {
            CliGroupStat::Mean => GroupStat::Mean,
            CliGroupStat::Median => GroupStat::Median,
            CliGroupStat::Sum => GroupStat::Sum,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Exploratory analysis of CSV datasets",
    long_about = "Load a CSV file, infer its schema once, and run one analysis view.\n\n\
                  EXAMPLES:\n  \
                  # Dataset overview\n  \
                  tablescope -i data.csv --view info\n\n  \
                  # IQR outliers as JSON\n  \
                  tablescope -i data.csv --view outliers --method iqr --json\n\n  \
                  # Correlations over selected columns, colored by a category\n  \
                  tablescope -i data.csv --view correlations --columns price,area --color-by city\n\n  \
                  # Mean price per city\n  \
                  tablescope -i data.csv --view group-by --group-col city --columns price"
)]
struct Args {
    /// Path to the CSV file to analyze
    #[arg(short, long)]
    input: String,

    /// Analysis view to run
    #[arg(short, long, value_enum, default_value = "info")]
    view: CliView,

    /// Outlier detection method (outliers view)
    #[arg(long, value_enum, default_value = "zscore")]
    method: CliOutlierMethod,

    /// Comma-separated column selection
    ///
    /// For the correlations view these are the numeric columns to correlate
    /// (all numeric columns when omitted); for group-by they are the value
    /// columns to aggregate.
    #[arg(short, long)]
    columns: Option<String>,

    /// Column whose values color the scatter points (correlations view)
    #[arg(long)]
    color_by: Option<String>,

    /// Column to group by (group-by view)
    #[arg(long)]
    group_col: Option<String>,

    /// Aggregation statistic (group-by view)
    #[arg(long, value_enum, default_value = "mean")]
    stat: CliGroupStat,

    /// Number of histogram bins
    #[arg(long, default_value = "20")]
    histogram_bins: usize,

    /// Number of categories shown per bar chart
    #[arg(long, default_value = "10")]
    top_categories: usize,

    /// Z-score threshold for outlier flagging
    #[arg(long, default_value = "3.0")]
    zscore_threshold: f64,

    /// IQR fence multiplier for outlier flagging
    #[arg(long, default_value = "1.5")]
    iqr_multiplier: f64,

    /// Fraction of rows in the overview sample (0, 1]
    #[arg(long, default_value = "0.1")]
    sample_fraction: f64,

    /// Output JSON to stdout instead of a human-readable summary
    ///
    /// Disables all logs; only the final JSON report is written to stdout.
    /// Useful for piping: `tablescope -i data.csv --view missing --json | jq .output`
    #[arg(long)]
    json: bool,

    /// Write the JSON report to a file
    #[arg(short, long)]
    output: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    info!("Loading dataset from: {}", args.input);
    let df = load_csv_with_fallbacks(&args.input)?;
    info!("Dataset loaded successfully: {:?}", df.shape());

    let schema = Schema::infer(&df)?;
    debug!(
        numeric = schema.numeric_columns().len(),
        categorical = schema.categorical_columns().len(),
        "schema inferred"
    );

    let config = build_config(&args)?;
    let command = build_command(&args)?;

    let output = match run_command(&df, &schema, &config, &command) {
        Ok(output) => output,
        Err(e) => {
            error!("Analysis failed: {}", e);
            return Err(anyhow!("Analysis failed: {}", e));
        }
    };
    let report = AnalysisReport::new(&command, output);

    if let Some(ref path) = args.output {
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
        info!("Report written to: {}", path);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_human_readable_summary(&args, &report);

    Ok(())
}

/// Map validated CLI threshold overrides onto the analysis config.
fn build_config(args: &Args) -> Result<AnalysisConfig> {
    let config = AnalysisConfig::builder()
        .histogram_bins(args.histogram_bins)
        .top_categories(args.top_categories)
        .zscore_threshold(args.zscore_threshold)
        .iqr_multiplier(args.iqr_multiplier)
        .sample_fraction(args.sample_fraction)
        .build()
        .map_err(AnalysisError::from)?;
    Ok(config)
}

fn split_columns(raw: &Option<String>) -> Vec<String> {
    raw.as_deref()
        .map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Translate CLI flags into an analysis command.
fn build_command(args: &Args) -> Result<AnalysisCommand> {
    let command = match args.view {
        CliView::Info => AnalysisCommand::ShowInfo,
        CliView::Duplicates => AnalysisCommand::ShowDuplicates,
        CliView::Missing => AnalysisCommand::ShowMissing,
        CliView::Outliers => AnalysisCommand::ShowOutliers {
            method: args.method.into(),
        },
        CliView::Distributions => AnalysisCommand::ShowDistributions,
        CliView::Correlations => AnalysisCommand::ShowCorrelations {
            columns: split_columns(&args.columns),
            color_by: args.color_by.clone(),
        },
        CliView::GroupBy => {
            let group_col = args
                .group_col
                .clone()
                .ok_or_else(|| anyhow!("--group-col is required for the group-by view"))?;
            let value_cols = split_columns(&args.columns);
            if value_cols.is_empty() {
                return Err(anyhow!("--columns is required for the group-by view"));
            }
            AnalysisCommand::ShowGroupBy {
                group_col,
                value_cols,
                stat: args.stat.into(),
            }
        }
    };
    Ok(command)
}

/// Truncate a string to max length in characters with ellipsis.
/// Counts chars, not bytes, so multibyte cell values never split.
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn print_table(columns: &[String], rows: &[Vec<String>]) {
    let header: Vec<String> = columns.iter().map(|c| truncate_str(c, 17)).collect();
    println!("  {}", header.join(" | "));
    println!("  {}", "-".repeat(70));
    for row in rows {
        let cells: Vec<String> = row.iter().map(|c| truncate_str(c, 17)).collect();
        println!("  {}", cells.join(" | "));
    }
}

/// Print a human-readable summary of the analysis report.
///
/// Note: this uses `println!` intentionally for user-facing CLI output.
/// Unlike logging, it should always be visible regardless of log level.
fn print_human_readable_summary(args: &Args, report: &AnalysisReport) {
    println!();
    println!("{}", "=".repeat(80));
    println!("ANALYSIS: {} ({})", report.command, args.input);
    println!("{}", "=".repeat(80));
    println!();

    match &report.output {
        AnalysisOutput::Overview { overview } => {
            println!(
                "Shape: {} rows x {} columns ({} numeric, {} categorical)",
                overview.shape.0,
                overview.shape.1,
                overview.numeric_features.len(),
                overview.categorical_features.len()
            );
            println!();
            println!(
                "{:<20} {:<12} {:<10} {:<10} {:<10}",
                "Column", "Kind", "Nulls %", "Unique", "Mean"
            );
            println!("{}", "-".repeat(70));
            for col in &overview.columns {
                let mean = col
                    .numeric
                    .as_ref()
                    .map(|n| format!("{:.2}", n.mean))
                    .unwrap_or_default();
                println!(
                    "{:<20} {:<12} {:<10.1} {:<10} {:<10}",
                    truncate_str(&col.name, 19),
                    col.kind.label(),
                    col.null_percentage,
                    col.unique_count,
                    mean
                );
            }
            println!();
            println!("SAMPLE ({} rows)", overview.sample.rows.len());
            println!("{}", "-".repeat(40));
            print_table(&overview.sample.columns, &overview.sample.rows);
        }
        AnalysisOutput::Duplicates { report, rows } => {
            println!(
                "Duplicate rows: {} ({:.1}%)",
                report.duplicate_count, report.duplicate_percentage
            );
            if !rows.rows.is_empty() {
                println!();
                print_table(&rows.columns, &rows.rows);
            }
        }
        AnalysisOutput::Missing { report, .. } => {
            println!(
                "Missing cells: {} ({:.1}% of dataset)",
                report.total_missing_cells, report.total_missing_percentage
            );
            println!();
            println!("{:<20} {:<10} {:<10}", "Column", "Missing", "Missing %");
            println!("{}", "-".repeat(40));
            for col in &report.per_column {
                println!(
                    "{:<20} {:<10} {:<10.1}",
                    truncate_str(&col.column, 19),
                    col.missing_count,
                    col.missing_percentage
                );
            }
        }
        AnalysisOutput::Outliers { method, rows, figures } => {
            println!("Method: {}", method.label());
            println!("Outlier rows: {}", rows.rows.len());
            if !rows.rows.is_empty() {
                println!();
                print_table(&rows.columns, &rows.rows);
            }
            println!();
            print_figure_summaries(figures);
        }
        AnalysisOutput::Distributions { figures } | AnalysisOutput::Correlations { figures } => {
            print_figure_summaries(figures);
        }
        AnalysisOutput::GroupBy { table, figure } => {
            println!("{}", figure.title);
            println!();
            print_table(&table.columns, &table.rows);
        }
    }

    println!();
    println!("Use --json for machine-readable output");
    println!("Use --output <path> to save the JSON report");
    println!("{}", "=".repeat(80));
}

fn print_figure_summaries(figures: &[tablescope::Figure]) {
    println!("FIGURES");
    println!("{}", "-".repeat(40));
    for figure in figures {
        println!(
            "  {} ({} x {} grid, {} traces)",
            figure.title,
            figure.rows,
            figure.cols,
            figure.traces.len()
        );
    }
}

/// Load CSV with multiple fallback strategies
fn load_csv_with_fallbacks(path: &str) -> Result<DataFrame> {
    // Strategy 1: Standard loading with quote handling
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Standard loading failed: {}", e);
        }
    }

    // Strategy 2: Without quote handling
    CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
        .map_err(|e| anyhow!("Could not read {}: {}", path, e))
}
