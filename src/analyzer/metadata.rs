use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Footage category inferred from the containing folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Category {
    Aerial,
    #[serde(rename = "B-Roll")]
    BRoll,
    #[default]
    Uncategorized,
}

impl Category {
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Aerial => "Aerial",
            Category::BRoll => "B-Roll",
            Category::Uncategorized => "Uncategorized",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Dynamic range mode inferred from the color space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RecordingMode {
    #[serde(rename = "HDR")]
    Hdr,
    Standard,
    #[default]
    Unknown,
}

impl RecordingMode {
    pub fn is_hdr(&self) -> bool {
        matches!(self, RecordingMode::Hdr)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RecordingMode::Hdr => "HDR",
            RecordingMode::Standard => "Standard",
            RecordingMode::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for RecordingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Normalized technical metadata for one video
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoTechnicalMetadata {
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
    pub duration_secs: f64,
    pub bit_rate: u64,
    pub color_space: String,
    /// Bits per component: 8, 10 or 12
    pub color_depth: u8,
    pub video_codec: String,
    pub is_variable_frame_rate: bool,

    pub audio_codec: String,
    pub audio_channels: u32,
    pub audio_sample_rate: u32,
    pub audio_bit_rate: u64,

    pub camera_model: String,
    /// ISO, exposure and aperture tags from the container
    pub camera_settings: BTreeMap<String, String>,

    pub category: Category,
    pub exact_creation_time: DateTime<Utc>,
    pub recording_mode: RecordingMode,
    pub notes: String,
}

impl VideoTechnicalMetadata {
    pub fn resolution_string(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    pub fn frame_rate_string(&self) -> String {
        if self.frame_rate > 0.0 {
            format!("{:.3} fps", self.frame_rate)
        } else {
            "Unknown".to_string()
        }
    }

    /// Camera settings as a flat JSON object
    pub fn camera_settings_json(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string(&self.camera_settings)?)
    }
}
