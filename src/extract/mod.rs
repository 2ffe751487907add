pub mod batch;
pub mod outcome;
pub mod store;
pub mod video;

pub use batch::{BatchSummary, run_batch};
pub use outcome::{ExtractionOutcome, ExtractionState, ExtractionStatus};
pub use store::{MemoryStore, MetadataStore, StoredVideo};
pub use video::{VideoFile, VideoId, is_video_file};

use crate::analyzer::{MediaProber, map_probe};
use crate::config::AppConfig;
use crate::flight::FlightBuilder;
use crate::telemetry::TelemetryParser;
use chrono::Local;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Runs the probe, log discovery, parse and build steps for one video
pub struct Extractor<P, S> {
    prober: P,
    store: S,
    config: AppConfig,
    parser: TelemetryParser,
    builder: FlightBuilder,
}

impl<P: MediaProber, S: MetadataStore> Extractor<P, S> {
    pub fn new(prober: P, store: S, config: AppConfig) -> Self {
        let parser = TelemetryParser::new(config.telemetry.skip_log_interval);
        let builder = FlightBuilder::from_config(&config.telemetry);
        Self {
            prober,
            store,
            config,
            parser,
            builder,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Extract and store metadata for one video; never returns an error
    pub async fn extract(&self, path: &Path) -> ExtractionOutcome {
        let mut outcome = ExtractionOutcome::new(path.to_path_buf());

        let video = match VideoFile::from_path(path) {
            Ok(video) => video,
            Err(e) => {
                error!("Cannot read video {}: {}", path.display(), e);
                return outcome.fail(e.to_string());
            }
        };
        outcome.video_id = Some(video.id.clone());
        outcome.size_bytes = Some(video.size_bytes);

        let metadata = match self.prober.analyze(path).await {
            Ok(probe) => map_probe(&probe, path, video.created),
            Err(e) => Err(e),
        };
        let metadata = match metadata {
            Ok(metadata) => metadata,
            Err(e) => {
                if e.is_missing_stream() {
                    warn!("Skipping {}: {}", video.file_name, e);
                } else {
                    error!("Probe failed for {}: {}", video.file_name, e);
                }
                return outcome.fail(e.to_string());
            }
        };
        outcome.enter(ExtractionState::Probed);
        debug!(
            "{}: {} {} {}",
            video.file_name,
            metadata.resolution_string(),
            metadata.video_codec,
            metadata.frame_rate_string()
        );

        if let Err(e) = self.store.upsert_video_metadata(&video.id, metadata) {
            error!("Failed to store metadata for {}: {}", video.file_name, e);
            outcome.status = ExtractionStatus::Failed {
                reason: e.to_string(),
            };
            outcome.enter(ExtractionState::Done);
            return outcome;
        }

        outcome.enter(ExtractionState::SearchingTelemetryLog);
        let log_path = find_companion_log(path, &self.config.telemetry.log_extension).await;
        match log_path {
            None => {
                debug!("No telemetry log for {}", video.file_name);
                outcome.enter(ExtractionState::NoLog);
                self.drop_stale_flight(&video, &mut outcome);
            }
            Some(log_path) => {
                outcome.enter(ExtractionState::LogFound);
                outcome.enter(ExtractionState::ParsingLog);
                self.attach_telemetry(&video, &log_path, &mut outcome).await;
            }
        }

        outcome.enter(ExtractionState::Done);
        info!(
            "Extracted {} ({}, {} flight points)",
            video.file_name,
            outcome.status.display_name(),
            outcome.flight_points
        );
        outcome
    }

    async fn attach_telemetry(&self, video: &VideoFile, log_path: &Path, outcome: &mut ExtractionOutcome) {
        let bytes = match tokio::fs::read(log_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Cannot read telemetry log {}: {}", log_path.display(), e);
                outcome.partial(format!("telemetry log unreadable: {}", e));
                self.drop_stale_flight(video, outcome);
                return;
            }
        };

        let parser = self.parser.clone();
        let log = match tokio::task::spawn_blocking(move || {
            parser.parse(&String::from_utf8_lossy(&bytes))
        })
        .await
        {
            Ok(log) => log,
            Err(e) => {
                error!("Telemetry parse task failed for {}: {}", log_path.display(), e);
                outcome.partial(format!("telemetry parse failed: {}", e));
                self.drop_stale_flight(video, outcome);
                return;
            }
        };

        let stats = log.stats;
        outcome.telemetry = Some(stats);

        let drone_model = self.config.drone_model_for(&video.file_name);
        let fallback_date = video.created.with_timezone(&Local).naive_local();
        let flight = self.builder.build(log, drone_model, fallback_date);
        let points = flight.points.len();

        if let Err(e) = self.store.attach_flight_metadata(&video.id, flight) {
            error!("Failed to store flight metadata for {}: {}", video.file_name, e);
            outcome.partial(format!("flight metadata not stored: {}", e));
            return;
        }
        outcome.flight_points = points;

        if points == 0 {
            outcome.partial("telemetry log contained no usable entries".to_string());
        } else if stats.skipped > 0 {
            outcome.partial(format!(
                "{} of {} telemetry entries skipped",
                stats.skipped, stats.total
            ));
        }
    }

    /// A flight record from an earlier run no longer matches this video's log
    fn drop_stale_flight(&self, video: &VideoFile, outcome: &mut ExtractionOutcome) {
        match self.store.clear_flight_metadata(&video.id) {
            Ok(true) => info!("Removed earlier flight metadata for {}", video.file_name),
            Ok(false) => {}
            Err(e) => {
                error!("Failed to clear flight metadata for {}: {}", video.file_name, e);
                outcome.partial(format!("earlier flight metadata kept: {}", e));
            }
        }
    }
}

/// Companion log next to `video_path`: same stem, extension matched case-insensitively
pub async fn find_companion_log(video_path: &Path, extension: &str) -> Option<PathBuf> {
    let stem = video_path.file_stem()?;
    let extension = extension.trim_start_matches('.');
    let dir = match video_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut exact: OsString = stem.to_os_string();
    exact.push(".");
    exact.push(extension);
    let exact = dir.join(exact);
    if tokio::fs::metadata(&exact).await.is_ok_and(|m| m.is_file()) {
        return Some(exact);
    }

    let mut entries = tokio::fs::read_dir(dir).await.ok()?;
    let mut candidates = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        let candidate = entry.path();
        let matches = candidate.file_stem() == Some(stem)
            && candidate
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if matches && entry.file_type().await.is_ok_and(|t| t.is_file()) {
            candidates.push(candidate);
        }
    }
    candidates.sort();
    candidates.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_companion_log_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("DJI_0001.MP4");
        std::fs::write(&video, b"video").unwrap();
        assert_eq!(find_companion_log(&video, "srt").await, None);

        let log = dir.path().join("DJI_0001.SRT");
        std::fs::write(&log, b"log").unwrap();
        let found = find_companion_log(&video, "srt").await.unwrap();
        assert!(found
            .to_string_lossy()
            .eq_ignore_ascii_case(&log.to_string_lossy()));
        assert!(find_companion_log(&video, ".srt").await.is_some());
    }

    #[tokio::test]
    async fn test_find_companion_log_ignores_other_stems() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("clip.v2.mp4");
        std::fs::write(&video, b"video").unwrap();
        std::fs::write(dir.path().join("clip.srt"), b"log").unwrap();
        assert_eq!(find_companion_log(&video, "srt").await, None);

        let log = dir.path().join("clip.v2.srt");
        std::fs::write(&log, b"log").unwrap();
        assert_eq!(find_companion_log(&video, "srt").await, Some(log));
    }
}
