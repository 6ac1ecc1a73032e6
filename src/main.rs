//! Housing Insights - CLI entry point
//!
//! Runs the middle-class market analysis on a sales CSV and writes the
//! console report plus chart images.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use housing_insights::charts::ChartRenderer;
use housing_insights::{AnalysisConfig, ConsoleReporter, DataLoader, MarketReport, ReportFormat};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

/// CLI-compatible report format enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFormat {
    /// Sectioned report with currency and percent figures
    Text,
    /// Per-group means in thousands, as used for the charts
    ChartData,
    /// Full report as pretty-printed JSON
    Json,
}

impl From<CliFormat> for ReportFormat {
    fn from(cli: CliFormat) -> Self {
        match cli {
            CliFormat::Text => ReportFormat::Text,
            CliFormat::ChartData => ReportFormat::ChartData,
            CliFormat::Json => ReportFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Middle-class housing market analysis",
    long_about = "Segments housing sales to the Q25-Q75 price band and reports average \
                  prices by month, zipcode and grade.\n\n\
                  EXAMPLES:\n  \
                  housing-insights data/eda.csv\n  \
                  housing-insights data/eda.csv --min-zip-sales 30 --format chart-data\n  \
                  housing-insights data/eda.csv -o charts/ --format json"
)]
struct Args {
    /// Path to the sales CSV file
    #[arg(default_value = "data/eda.csv")]
    input: PathBuf,

    /// Directory chart images are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// JSON config file; command line flags take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Minimum middle-class sales for a zipcode to be ranked
    #[arg(long)]
    min_zip_sales: Option<usize>,

    /// Number of top zipcodes listed and charted
    #[arg(long)]
    top_zips: Option<usize>,

    /// Console report layout
    #[arg(short, long, value_enum, default_value = "text")]
    format: CliFormat,

    /// Only print the report; do not render charts
    #[arg(long)]
    no_charts: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber. Logs go to stderr so stdout carries
/// only the report.
fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(args: &Args) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(min) = args.min_zip_sales {
        config.min_zip_sales = min;
    }
    if let Some(n) = args.top_zips {
        config.top_zip_count = n;
    }
    config.validate().context("Invalid configuration")?;

    debug!("Effective config: {:?}", config);
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet);

    let config = build_config(&args)?;

    info!("Loading sales from: {}", args.input.display());
    let table = DataLoader::new()
        .with_drop_columns(&config.drop_columns)
        .load_csv(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    let report = MarketReport::build(&table, &config).context("Analysis failed")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    ConsoleReporter::write(&mut out, &report, args.format.into())
        .context("Failed to write report")?;
    out.flush()?;

    if !args.no_charts {
        let renderer = ChartRenderer::new(&config.output_dir, config.histogram_bins);
        renderer
            .render_all(&report, &table)
            .with_context(|| format!("Failed to render charts into {}", renderer.output_dir().display()))?;
    }

    Ok(())
}
