mod dataset;
mod error;
mod ingest;
mod media;
mod utils;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use anyhow::{Result, Context};
use chrono::Local;
use clap::Parser;
use tracing::{info, error};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*};

use crate::dataset::assembler::DatasetAssembler;
use crate::dataset::categories::load_categories;
use crate::dataset::writer::write_dataset;
use crate::error::DatasetError;
use crate::utils::config::{self, CategoryKeyPolicy, Config};
use crate::utils::report::{Reporter, TracingReporter};

/// Builds a COCO dataset descriptor from a flat directory of images.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the source images [default: ~/images]
    #[arg(short, long)]
    images_dir: Option<PathBuf>,

    /// Where the dataset JSON is written [default: ~/output_coco]
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// COCO JSON file providing the category list [default: ~/Base_datos.json]
    #[arg(short, long)]
    categories: Option<PathBuf>,

    /// Author recorded on every image and as dataset contributor
    #[arg(short, long)]
    author: Option<String>,

    /// Comma separated list of accepted extensions
    #[arg(long, default_value = "jpg,jpeg,png,gif")]
    extensions: String,

    /// Accept category files without an `annotations` key
    #[arg(long)]
    categories_only: bool,

    /// Hash and probe images on a thread pool
    #[arg(long)]
    parallel: bool,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,

    #[arg(long, default_value = config::DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Optional KEY=VALUE file with COCO_* settings
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let config = resolve_config(&args)?;
    info!("Images: {:?}", config.images_dir);
    info!("Categories: {:?}", config.categories_file);
    info!("Output: {:?}", config.output_dir);

    if let Err(e) = run(&config, &TracingReporter) {
        error!("Error during execution: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

/// Console plus an append-only log file, both at INFO.
fn init_logging(log_file: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {:?}", log_file))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_filter(LevelFilter::INFO))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_filter(LevelFilter::INFO),
        )
        .init();
    Ok(())
}

fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = Config::with_home(&config::home_dir());
    config.apply_env(&config::load_env_file(&args.env_file)?);

    if let Some(dir) = &args.images_dir {
        config.images_dir = dir.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(file) = &args.categories {
        config.categories_file = file.clone();
    }
    if let Some(author) = &args.author {
        config.author = author.clone();
    }
    config.extensions = config::parse_extensions(&args.extensions);
    if args.categories_only {
        config.key_policy = CategoryKeyPolicy::CategoriesOnly;
    }
    config.parallel = args.parallel;
    config.show_progress = !args.no_progress;
    Ok(config)
}

/// Loads categories, assembles the dataset and writes it. Returns the output path.
///
/// Nothing is written unless assembly finished.
fn run(config: &Config, reporter: &dyn Reporter) -> std::result::Result<PathBuf, DatasetError> {
    let categories = load_categories(&config.categories_file, config.key_policy, reporter)?;
    reporter.info(&format!("Loaded {} categories", categories.len()));

    let report = DatasetAssembler::new(config, categories, reporter).assemble(&config.images_dir)?;
    reporter.info(&format!(
        "Processed {} candidate(s): {} accepted, {} duplicate(s), {} error(s)",
        report.scanned,
        report.document.images.len(),
        report.duplicates.len(),
        report.errors.len()
    ));

    let path = write_dataset(&report.document, &config.output_dir, &Local::now())?;
    reporter.info(&format!("Dataset saved to {:?}", path));
    Ok(path)
}
