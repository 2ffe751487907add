use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lens and exposure state recorded alongside one position fix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraSettingsPoint {
    pub iso: i32,
    pub shutter_speed: String,
    /// f-number, decoded from the log's hundredths encoding (280 -> 2.8)
    pub aperture: f64,
    pub exposure_value: f64,
    pub color_temperature: i32,
    pub color_mode: String,
    pub focal_length: f64,
    pub digital_zoom_ratio: i32,
    pub digital_zoom_delta: i32,
}

/// One successfully parsed log entry, before kinematics
#[derive(Debug, Clone, PartialEq)]
pub struct RawTelemetryRecord {
    /// Position of the entry in the log, counting skipped entries
    pub entry_index: usize,
    pub timestamp: NaiveDateTime,
    pub latitude: f64,
    pub longitude: f64,
    /// Altitude relative to the takeoff point
    pub rel_altitude: f64,
    pub camera: Option<CameraSettingsPoint>,
}

/// Why a single entry was skipped
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntryError {
    #[error("timestamp line is empty")]
    EmptyTimestamp,

    #[error("timestamp '{0}' does not match yyyy-MM-dd HH:mm:ss.fff")]
    BadTimestamp(String),

    #[error("telemetry line is empty")]
    EmptyTelemetry,

    #[error("required key '{0}' is missing")]
    MissingKey(&'static str),

    #[error("value '{value}' for key '{key}' is not a valid number")]
    BadNumber { key: &'static str, value: String },
}

/// Entry counts for one parsed log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Complete entries seen (parsed + skipped)
    pub total: usize,
    pub parsed: usize,
    pub skipped: usize,
    /// Parsed entries that lacked one or more camera keys
    pub without_camera: usize,
    /// Whether the log ended with a partial entry that was ignored
    pub truncated: bool,
}

/// Result of parsing a whole telemetry log
#[derive(Debug, Clone, Default)]
pub struct TelemetryLog {
    pub records: Vec<RawTelemetryRecord>,
    pub stats: ParseStats,
    /// Most recent skip reason, if any entry was skipped
    pub last_error: Option<EntryError>,
}
