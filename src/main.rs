use anyhow::{Context, Result};
use clap::Parser;
use flightmeta::analyzer::FfprobeProber;
use flightmeta::config::AppConfig;
use flightmeta::extract::{
    BatchSummary, ExtractionOutcome, ExtractionStatus, Extractor, MemoryStore, is_video_file,
    run_batch,
};
use flightmeta::utils::{ffprobe_available, format_duration, format_file_size, init_logging};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use walkdir::WalkDir;

/// Extract technical and flight metadata from aerial video files
#[derive(Debug, Parser)]
#[command(name = "flightmeta", version)]
struct Args {
    /// Video files or directories to scan
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Configuration file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Do not descend into subdirectories
    #[arg(long)]
    no_recurse: bool,

    /// Print all extracted records as JSON
    #[arg(long)]
    json: bool,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _guard = init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AppConfig::load(),
    };
    config.validate().context("Invalid configuration")?;

    if !ffprobe_available(&config.probe.ffprobe_path) {
        warn!(
            "{} is not available; every video will fail to probe",
            config.probe.ffprobe_path
        );
    }

    let videos = collect_videos(&args.paths, !args.no_recurse);
    if videos.is_empty() {
        warn!("No video files found");
        return Ok(());
    }

    let max_parallel = config.extraction.max_parallel;
    let prober = FfprobeProber::from_config(&config.probe);
    let extractor = Arc::new(Extractor::new(prober, MemoryStore::new(), config));

    let start = Instant::now();
    let outcomes = run_batch(Arc::clone(&extractor), videos, max_parallel).await;

    for outcome in &outcomes {
        print_outcome(outcome);
    }

    let summary = BatchSummary::from_outcomes(&outcomes);
    info!(
        "{} videos ({}) in {}: {} ok, {} partial, {} failed, {} flight points",
        summary.total(),
        format_file_size(summary.total_bytes),
        format_duration(start.elapsed()),
        summary.succeeded,
        summary.partial,
        summary.failed,
        summary.flight_points
    );

    if args.json {
        let snapshot = extractor.store().snapshot();
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }

    Ok(())
}

/// Expand directories into the video files they contain
fn collect_videos(paths: &[PathBuf], recurse: bool) -> Vec<PathBuf> {
    let mut videos = Vec::new();
    for path in paths {
        if path.is_dir() {
            let max_depth = if recurse { usize::MAX } else { 1 };
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .max_depth(max_depth)
                .into_iter()
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        warn!("Skipping unreadable entry: {}", e);
                        None
                    }
                })
                .filter(|entry| entry.file_type().is_file() && is_video_file(entry.path()))
                .map(|entry| entry.into_path())
                .collect();
            found.sort();
            videos.extend(found);
        } else {
            videos.push(path.clone());
        }
    }
    videos
}

fn print_outcome(outcome: &ExtractionOutcome) {
    let detail = match &outcome.status {
        ExtractionStatus::Success => String::new(),
        ExtractionStatus::Partial { reason } | ExtractionStatus::Failed { reason } => {
            format!(" - {}", reason)
        }
    };
    let telemetry = outcome
        .telemetry
        .map(|stats| format!(" [{} points, {} skipped]", stats.parsed, stats.skipped))
        .unwrap_or_default();

    println!(
        "{:<8} {}{}{}",
        outcome.status.display_name(),
        outcome.filename(),
        telemetry,
        detail
    );
}
