use serde::{Deserialize, Serialize};

/// Media probe settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// ffprobe executable (name on PATH or absolute path)
    pub ffprobe_path: String,
    /// Per-file probe timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            ffprobe_path: "ffprobe".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Which telemetry entry sets the home position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HomePolicy {
    /// First entry that parses successfully
    #[default]
    FirstParsed,
    /// Raw entry 0 only; home stays zero if that entry is skipped
    FirstRawEntry,
}

/// How the two directional bearings of an interior point are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeadingAveraging {
    /// Mean of unit vectors, correct across north
    #[default]
    Circular,
    /// Plain mean of degrees (350 and 10 average to 180)
    Arithmetic,
}

/// Telemetry log settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Companion log extension, matched case-insensitively
    pub log_extension: String,
    pub home_policy: HomePolicy,
    pub heading_averaging: HeadingAveraging,
    /// Log the latest entry error once every this many skips
    pub skip_log_interval: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_extension: "srt".to_string(),
            home_policy: HomePolicy::default(),
            heading_averaging: HeadingAveraging::default(),
            skip_log_interval: 100,
        }
    }
}

/// Batch extraction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Maximum number of videos processed at once
    pub max_parallel: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self { max_parallel: 4 }
    }
}

/// Maps a filename prefix to a drone model name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DroneModelRule {
    pub prefix: String,
    pub model: String,
}

pub fn default_drone_models() -> Vec<DroneModelRule> {
    vec![DroneModelRule {
        prefix: "DJI_".to_string(),
        model: "DJI".to_string(),
    }]
}
