use super::video::VideoId;
use crate::telemetry::ParseStats;
use serde::Serialize;
use std::path::PathBuf;

/// Steps a single extraction passes through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExtractionState {
    Probing,
    ProbeFailed,
    Probed,
    SearchingTelemetryLog,
    NoLog,
    LogFound,
    ParsingLog,
    Done,
}

/// Overall result for one video
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionStatus {
    /// Video metadata stored, and flight metadata if a log existed
    Success,
    /// Video metadata stored, telemetry incomplete or unavailable
    Partial { reason: String },
    /// Nothing stored for this video
    Failed { reason: String },
}

impl ExtractionStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            ExtractionStatus::Success => "ok",
            ExtractionStatus::Partial { .. } => "partial",
            ExtractionStatus::Failed { .. } => "failed",
        }
    }
}

/// Report for one video, returned instead of an error
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionOutcome {
    pub path: PathBuf,
    pub video_id: Option<VideoId>,
    pub size_bytes: Option<u64>,
    pub status: ExtractionStatus,
    /// States visited, in order
    pub trace: Vec<ExtractionState>,
    pub telemetry: Option<ParseStats>,
    pub flight_points: usize,
}

impl ExtractionOutcome {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self {
            path,
            video_id: None,
            size_bytes: None,
            status: ExtractionStatus::Success,
            trace: vec![ExtractionState::Probing],
            telemetry: None,
            flight_points: 0,
        }
    }

    pub(crate) fn enter(&mut self, state: ExtractionState) {
        self.trace.push(state);
    }

    pub(crate) fn fail(mut self, reason: String) -> Self {
        self.enter(ExtractionState::ProbeFailed);
        self.status = ExtractionStatus::Failed { reason };
        self
    }

    pub(crate) fn partial(&mut self, reason: String) {
        self.status = ExtractionStatus::Partial { reason };
    }

    pub fn state(&self) -> ExtractionState {
        self.trace
            .last()
            .copied()
            .unwrap_or(ExtractionState::Probing)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, ExtractionStatus::Failed { .. })
    }

    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}
