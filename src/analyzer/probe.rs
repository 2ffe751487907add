use crate::error::AppError;
use std::future::Future;
use std::path::Path;

/// Stream-level facts about one media file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeResult {
    pub duration_secs: f64,
    /// Container bit rate, 0 when unknown
    pub bit_rate: u64,
    pub video_streams: Vec<VideoStreamInfo>,
    pub audio_streams: Vec<AudioStreamInfo>,
    /// Container tags in file order
    pub tags: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoStreamInfo {
    pub width: u32,
    pub height: u32,
    /// Nominal frame rate (r_frame_rate)
    pub frame_rate: f64,
    pub avg_frame_rate: f64,
    pub codec_name: String,
    pub pixel_format: Option<String>,
    pub bit_rate: u64,
    pub color_space: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioStreamInfo {
    pub codec_name: String,
    pub channels: u32,
    pub sample_rate: u32,
    pub bit_rate: u64,
}

/// Something that can inspect a media file
pub trait MediaProber {
    fn analyze(&self, path: &Path) -> impl Future<Output = Result<ProbeResult, AppError>> + Send;
}
