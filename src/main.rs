//! Timing Chart - benchmark timing tables to comparison charts
//!
//! Reads `;`-separated timing tables (threads; elapsed; elapsed; user CPU;
//! system CPU) and renders elapsed time and CPU time against thread count
//! side by side into one image.

mod charts;
mod config;
mod data;
mod error;

use anyhow::{Context, Result};
use charts::{ChartPlotter, StaticChartRenderer};
use clap::{ArgAction, Parser};
use config::{Breakdown, PlotConfig, DEFAULT_BREAKDOWN, DEFAULT_DPI, DEFAULT_LABELS};
use data::{resolve_labels, DatasetCollection, TableLoader};
use error::ValidationError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "timing-chart", version)]
#[command(about = "Plot benchmark timings: elapsed time and CPU time vs thread count")]
struct Cli {
    /// Timing tables, one per benchmark run
    inputs: Vec<PathBuf>,

    /// Output image; the extension selects the format (png, jpg, bmp, svg)
    #[arg(short, long, default_value = config::DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Chart title; empty for none
    #[arg(short, long, default_value = config::DEFAULT_TITLE)]
    title: String,

    /// `;`-separated series labels, one per input file
    /// [default: before;after, or file names when not given two files]
    #[arg(short, long)]
    labels: Option<String>,

    /// Extra CPU-time column for the log-log panel, as COLUMN:NAME
    #[arg(short, long = "breakdown", value_name = "COLUMN:NAME", default_value = DEFAULT_BREAKDOWN)]
    breakdowns: Vec<Breakdown>,

    /// Pixels per canvas inch (the canvas is 12x6)
    #[arg(long, default_value_t = DEFAULT_DPI)]
    dpi: u32,

    /// Open the image with the system viewer once written
    #[arg(long)]
    open: bool,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let output = run(&cli)?;
    if cli.open {
        open::that(&output).with_context(|| format!("failed to open '{}'", output.display()))?;
    }
    Ok(())
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Load, validate, plot and write; returns the written path.
fn run(cli: &Cli) -> Result<PathBuf> {
    if cli.inputs.is_empty() {
        return Err(ValidationError::NoInputs.into());
    }

    let config = PlotConfig::new(
        &cli.output,
        Some(cli.title.clone()),
        cli.breakdowns.clone(),
        cli.dpi,
    )?;

    let tables = TableLoader::load_all(&cli.inputs).context("failed to load timing tables")?;
    let labels = resolve_labels(cli.labels.as_deref(), DEFAULT_LABELS, &tables);
    let datasets = DatasetCollection::pair(tables, labels)?;
    config.validate(&datasets)?;
    log::debug!("plotting {} dataset(s)", datasets.len());

    let figure = ChartPlotter::build_figure(&datasets, &config);
    StaticChartRenderer::render_to_file(&figure, &config)
        .with_context(|| format!("failed to write '{}'", config.output.display()))?;

    Ok(config.output)
}
