//! Gridcast CLI binary.
//!
//! Fetches and fuses a CFBD season into the local store, exports the fused
//! dataset, reports coverage and predicts scores for the week after a
//! training cutoff.

mod integration;

use clap::{Parser, Subcommand};
use gridcast::data::CoverageCounters;
use gridcast::data::cfbd::SeasonType;
use gridcast::data::store::SqliteGameStore;
use gridcast::output::{CoverageSummary, DatasetExport, ExportFormat, Exporter};
use gridcast::{RunConfig, fused_frame, predict_scores};
use indicatif::{ProgressBar, ProgressStyle};
use integration::data_pipeline::{load_or_refresh, load_stored, refresh_season};
use integration::store_manager::{open_store, store_path};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gridcast")]
#[command(
    about = "Gridcast: fused college football data and score predictions",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Verbose logging (debug level)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// TOML run configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite store path
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, fuse and store a season
    Fuse {
        /// Season year
        #[arg(long)]
        year: Option<i32>,

        /// Season type (regular or postseason)
        #[arg(long)]
        season_type: Option<SeasonType>,
    },

    /// Predict scores for the week after the training cutoff
    Predict {
        /// Season year
        #[arg(long)]
        year: Option<i32>,

        /// Last training week
        #[arg(long)]
        cutoff: Option<u32>,

        /// Conference to predict
        #[arg(long)]
        conference: Option<String>,

        /// Output format (text, markdown, csv, json or pretty-json)
        #[arg(long, default_value = "text")]
        format: String,

        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Refetch the season even if it is stored
        #[arg(long)]
        refresh: bool,
    },

    /// Export the flattened fused dataset
    Export {
        /// Season year
        #[arg(long)]
        year: Option<i32>,

        /// Output file
        #[arg(long)]
        output: PathBuf,

        /// Output format (csv, json or pretty-json)
        #[arg(long, default_value = "csv")]
        format: ExportFormat,

        /// Refetch the season even if it is stored
        #[arg(long)]
        refresh: bool,
    },

    /// Show match coverage of a stored season
    Coverage {
        /// Season year
        #[arg(long)]
        year: Option<i32>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = if verbose > 0 { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(
    path: Option<&Path>,
    store: Option<PathBuf>,
) -> Result<RunConfig, Box<dyn std::error::Error>> {
    let mut config = match path {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    }
    .with_env();

    if store.is_some() {
        config.store_path = store;
    }
    Ok(config)
}

fn spinner() -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(cli.config.as_deref(), cli.store)?;

    match cli.command {
        Commands::Fuse { year, season_type } => {
            if let Some(year) = year {
                config.season = year;
            }
            if let Some(season_type) = season_type {
                config.season_type = season_type;
            }
            fuse(&config).await?;
        }
        Commands::Predict {
            year,
            cutoff,
            conference,
            format,
            output,
            refresh,
        } => {
            if let Some(year) = year {
                config.season = year;
            }
            if let Some(cutoff) = cutoff {
                config.split.training_cutoff = cutoff;
            }
            if let Some(conference) = conference {
                config.split.target_conference = conference;
            }
            config.validate()?;
            predict(&config, &format, output.as_deref(), refresh).await?;
        }
        Commands::Export {
            year,
            output,
            format,
            refresh,
        } => {
            if let Some(year) = year {
                config.season = year;
            }
            export(&config, &output, format, refresh).await?;
        }
        Commands::Coverage { year } => {
            if let Some(year) = year {
                config.season = year;
            }
            coverage(&config)?;
        }
    }

    Ok(())
}

async fn fuse(config: &RunConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(config)?;

    let pb = spinner()?;
    let outcome = match refresh_season(config, &mut store, Some(&pb)).await {
        Ok(outcome) => {
            pb.finish_with_message(format!(
                "Stored {} games for {} ({})",
                outcome.games.len(),
                config.season,
                config.season_type
            ));
            outcome
        }
        Err(e) => {
            pb.finish_with_message("Failed!");
            return Err(e.into());
        }
    };

    println!("{}", CoverageSummary::from(&outcome.coverage).to_ascii_table());
    println!("Store: {}", store_path(config).display());
    Ok(())
}

async fn predict(
    config: &RunConfig,
    format: &str,
    output: Option<&Path>,
    refresh: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(config)?;

    let pb = spinner()?;
    let records = match load_or_refresh(config, &mut store, refresh, Some(&pb)).await {
        Ok(records) => records,
        Err(e) => {
            pb.finish_with_message("Failed!");
            return Err(e.into());
        }
    };

    pb.set_message("Training score models...");
    let run = predict_scores(&records, config);
    pb.finish_and_clear();

    let coverage = CoverageSummary::from(&CoverageCounters::from_records(&records));
    let report = run?.into_report(Some(coverage));

    let content = match format {
        "text" => report.to_ascii_table(),
        "markdown" | "md" => report.to_markdown(),
        other => report.export_to_string(other.parse::<ExportFormat>()?)?,
    };

    match output {
        Some(path) => {
            std::fs::write(path, content)?;
            println!(
                "Wrote {} predictions to {}",
                report.predictions.len(),
                path.display()
            );
        }
        None => println!("{}", content),
    }

    Ok(())
}

async fn export(
    config: &RunConfig,
    output: &Path,
    format: ExportFormat,
    refresh: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(config)?;

    let pb = spinner()?;
    let records = match load_or_refresh(config, &mut store, refresh, Some(&pb)).await {
        Ok(records) => records,
        Err(e) => {
            pb.finish_with_message("Failed!");
            return Err(e.into());
        }
    };
    pb.finish_and_clear();

    let frame = fused_frame(&records)?;
    let export = DatasetExport::new(&frame);
    export.export_to_file(output, format)?;

    println!(
        "Exported {} games ({} columns) to {}",
        export.rows(),
        frame.width(),
        output.display()
    );
    Ok(())
}

fn coverage(config: &RunConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store: SqliteGameStore = open_store(config)?;
    let records = load_stored(config, &store)?;

    let summary = CoverageSummary::from(&CoverageCounters::from_records(&records));
    println!("{}", summary.to_ascii_table());

    let stats = store.stats()?;
    println!(
        "Store: {} games across {} seasons ({})",
        stats.total_games,
        stats.seasons,
        store_path(config).display()
    );
    Ok(())
}
