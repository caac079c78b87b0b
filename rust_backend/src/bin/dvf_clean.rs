use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use dvf_clean::config::CleaningConfig;
use dvf_clean::io::DvfLoader;
use dvf_clean::parsing::csv_parser;
use dvf_clean::preprocessing::CleaningPipeline;
use dvf_clean::reporting::{cleaning_report, inspect_dataframe, summarize_locality};

#[derive(Parser, Debug)]
#[command(name = "dvf-clean")]
#[command(about = "Clean DVF real-estate transactions into one priced row per sale", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract one municipality from a departmental DVF file
    Extract {
        /// Departmental DVF CSV
        #[arg(short, long)]
        input: PathBuf,

        /// Destination of the municipality CSV
        #[arg(short, long)]
        output: PathBuf,

        /// Cleaning configuration file (defaults to ./dvf-clean.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the locality summary to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Report missing values and distributions of a DVF file
    Inspect {
        /// DVF CSV to inspect
        #[arg(short, long)]
        input: PathBuf,

        /// Inspection report destination
        #[arg(long, default_value = "inspection_results.txt")]
        report: PathBuf,
    },

    /// Run the cleaning pipeline on a municipality file
    Clean {
        /// Municipality DVF CSV
        #[arg(short, long)]
        input: PathBuf,

        /// Destination of the cleaned transactions
        #[arg(short, long)]
        output: PathBuf,

        /// Cleaning configuration file (defaults to ./dvf-clean.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the lower price-per-square-metre bound
        #[arg(long)]
        lower: Option<f64>,

        /// Override the upper price-per-square-metre bound
        #[arg(long)]
        upper: Option<f64>,

        /// Write per-stage counts as JSON
        #[arg(long = "summary-json")]
        summary_json: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>) -> Result<CleaningConfig> {
    let config = match path {
        Some(path) => CleaningConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => CleaningConfig::from_default_location()?,
    };
    Ok(config)
}

fn run_extract(
    input: &Path,
    output: &Path,
    config: Option<&Path>,
    report: Option<&Path>,
) -> Result<()> {
    let config = load_config(config)?;

    let loaded = DvfLoader::load_from_file(input)?;
    info!(
        "Loaded {} rows, {} columns from {}",
        loaded.num_rows,
        loaded.num_columns,
        input.display()
    );

    let mut locality = DvfLoader::extract_locality(&loaded.dataframe, &config.locality)?;
    info!("Kept {} rows for {}", locality.height(), config.locality.commune_name);

    DvfLoader::save_csv(&mut locality, output)?;
    info!("Saved {}", output.display());

    let summary = summarize_locality(&locality)?.to_report(&config.locality.commune_name);
    match report {
        Some(path) => {
            summary.write_to_path(path)?;
            info!("Locality summary written to {}", path.display());
        }
        None => info!("\n{}", summary),
    }
    Ok(())
}

fn run_inspect(input: &Path, report: &Path) -> Result<()> {
    let df = csv_parser::parse_dvf_csv(input)?;
    let source = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());

    inspect_dataframe(&df)?.to_report(&source).write_to_path(report)?;
    info!("Inspection results saved to {}", report.display());
    Ok(())
}

fn run_clean(
    input: &Path,
    output: &Path,
    config: Option<&Path>,
    lower: Option<f64>,
    upper: Option<f64>,
    summary_json: Option<&Path>,
) -> Result<()> {
    let mut config = load_config(config)?;
    if let Some(lower) = lower {
        config.outliers.lower = lower;
    }
    if let Some(upper) = upper {
        config.outliers.upper = upper;
    }

    let pipeline = CleaningPipeline::with_config(config)?;
    let result = pipeline.process_file(input, output)?;
    info!("\n{}", cleaning_report(&result));

    if let Some(path) = summary_json {
        let json = serde_json::to_string_pretty(&result.summary())?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write summary {}", path.display()))?;
        info!("Stage summary written to {}", path.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            input,
            output,
            config,
            report,
        } => run_extract(&input, &output, config.as_deref(), report.as_deref()),
        Commands::Inspect { input, report } => run_inspect(&input, &report),
        Commands::Clean {
            input,
            output,
            config,
            lower,
            upper,
            summary_json,
        } => run_clean(
            &input,
            &output,
            config.as_deref(),
            lower,
            upper,
            summary_json.as_deref(),
        ),
    }
}
