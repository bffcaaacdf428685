//! Offline dataset build.
//!
//! Reads the ISO 3166-1 country list and the ISO 3166-2 subdivision list,
//! assembles the subdivision hierarchy, and writes the dataset file served
//! by the query binary.

mod config;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use country_states::dataset::{digest, to_json_bytes, write_dataset};
use country_states::hierarchy::build_dataset_with;
use country_states::source::{load_countries, load_subdivisions};
use country_states::OrphanPolicy;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "ingest")]
#[command(about = "Build the country/subdivision dataset from ISO 3166 source files")]
struct Args {
    /// Optional TOML config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// ISO 3166-1 country list (.json or .csv, optionally .gz)
    #[arg(long)]
    countries: Option<PathBuf>,

    /// ISO 3166-2 subdivision list (.json or .csv, optionally .gz)
    #[arg(long)]
    subdivisions: Option<PathBuf>,

    /// Dataset file to write
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// What to do with subdivisions whose parent cannot be resolved (fail, drop)
    #[arg(long)]
    orphans: Option<OrphanPolicy>,

    /// Build in memory and fail if the existing output differs
    #[arg(long)]
    check: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = resolve_config(&args)?;

    info!("Country States Ingest");
    info!("Countries: {}", config.sources.countries.display());
    info!("Subdivisions: {}", config.sources.subdivisions.display());
    info!("Orphan policy: {}", config.build.orphans);

    let countries = load_countries(&config.sources.countries)?;
    let subdivisions = load_subdivisions(&config.sources.subdivisions)?;

    let pb = ProgressBar::new(countries.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let dataset = build_dataset_with(&countries, &subdivisions, &config.build, |country| {
        pb.set_message(country.record.alpha_2.clone());
        pb.inc(1);
    })
    .context("Dataset build failed")?;

    pb.finish_with_message("Build complete");

    let output = &config.output.dataset;

    if args.check {
        let fresh = to_json_bytes(&dataset)?;
        let existing = fs::read(output)
            .with_context(|| format!("Failed to read existing dataset: {}", output.display()))?;

        let (fresh_digest, existing_digest) = (digest(&fresh), digest(&existing));
        if fresh != existing {
            anyhow::bail!(
                "{} is out of date (xxh64 {} on disk, {} from sources)",
                output.display(),
                existing_digest,
                fresh_digest
            );
        }
        info!("{} is up to date (xxh64 {})", output.display(), fresh_digest);
        return Ok(());
    }

    write_dataset(&dataset, output)?;

    Ok(())
}

/// Config file values, overridden by any flags given on the command line.
fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(path) = &args.countries {
        config.sources.countries = path.clone();
    }
    if let Some(path) = &args.subdivisions {
        config.sources.subdivisions = path.clone();
    }
    if let Some(path) = &args.output {
        config.output.dataset = path.clone();
    }
    if let Some(policy) = args.orphans {
        config.build.orphans = policy;
    }

    Ok(config)
}
