//! Command line classification of one point or a CSV of points.
//!
//! Writes one JSON document per point to stdout.

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tlalli::loader::load_bundle;
use tlalli::models::GroupedActivities;
use tlalli::{AppConfig, Classification, DatasetBundle, Resolver};

#[derive(Parser, Debug)]
#[command(name = "classify")]
#[command(about = "Classify coordinates against the zoning datasets")]
struct Args {
    /// Config file (TOML)
    #[arg(short, long, default_value = "tlalli.toml")]
    config: PathBuf,

    /// Latitude of a single point
    #[arg(long, allow_negative_numbers = true, requires = "lng", conflicts_with = "points")]
    lat: Option<f64>,

    /// Longitude of a single point
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    lng: Option<f64>,

    /// CSV file with `lat`, `lng` and optional `id` columns
    #[arg(long)]
    points: Option<PathBuf>,

    /// Pretty-print single point output
    #[arg(long)]
    pretty: bool,

    /// Include activities grouped by sector and general activity
    #[arg(long)]
    grouped: bool,
}

#[derive(Debug, Deserialize)]
struct PointRow {
    #[serde(default)]
    id: Option<String>,
    lat: f64,
    lng: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PointOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    lat: f64,
    lng: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    classification: Option<Classification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    grouped_activities: Option<GroupedActivities>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine readable
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let config = AppConfig::load_from_file(&args.config)?;
    let bundle = load_bundle(&config.datasets).context("Failed to load datasets")?;
    let resolver = Resolver::new(config.resolver_config());

    match (&args.points, args.lat, args.lng) {
        (Some(path), _, _) => run_batch(&resolver, &bundle, path, args.grouped),
        (None, Some(lat), Some(lng)) => {
            let result = resolver.classify_raw(lat, lng, &bundle)?;
            let output = to_output(None, lat, lng, Ok(result), args.grouped);

            let stdout = io::stdout();
            let mut out = stdout.lock();
            if args.pretty {
                serde_json::to_writer_pretty(&mut out, &output)?;
            } else {
                serde_json::to_writer(&mut out, &output)?;
            }
            writeln!(out)?;
            Ok(())
        }
        _ => anyhow::bail!("Either --lat/--lng or --points is required"),
    }
}

fn run_batch(resolver: &Resolver, bundle: &DatasetBundle, path: &Path, grouped: bool) -> Result<()> {
    let points = read_points(path)?;
    info!("Classifying {} points from {}", points.len(), path.display());

    let pb = ProgressBar::new(points.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let outputs: Vec<PointOutput> = points
        .into_par_iter()
        .map(|point| {
            let result = resolver
                .classify_raw(point.lat, point.lng, bundle)
                .map_err(|e| e.to_string());
            pb.inc(1);
            to_output(point.id, point.lat, point.lng, result, grouped)
        })
        .collect();
    pb.finish_and_clear();

    let rejected = outputs.iter().filter(|o| o.error.is_some()).count();
    if rejected > 0 {
        warn!("{} of {} points were rejected", rejected, outputs.len());
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for output in &outputs {
        serde_json::to_writer(&mut out, output)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

fn read_points(path: &Path) -> Result<Vec<PointRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open points file: {}", path.display()))?;

    reader
        .deserialize::<PointRow>()
        .enumerate()
        .map(|(i, row)| row.with_context(|| format!("Invalid point on line {}", i + 2)))
        .collect()
}

fn to_output(
    id: Option<String>,
    lat: f64,
    lng: f64,
    result: Result<Classification, String>,
    grouped: bool,
) -> PointOutput {
    match result {
        Ok(classification) => {
            let grouped_activities = grouped.then(|| classification.grouped_activities());
            PointOutput {
                id,
                lat,
                lng,
                classification: Some(classification),
                grouped_activities,
                error: None,
            }
        }
        Err(e) => PointOutput {
            id,
            lat,
            lng,
            classification: None,
            grouped_activities: None,
            error: Some(e),
        },
    }
}
