use super::classifier;
use super::metadata::VideoTechnicalMetadata;
use super::probe::ProbeResult;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Normalize a probe result for the video at `path`
///
/// Only the first video and first audio stream are considered. A result
/// without any video stream is rejected with [`AppError::NoVideoStream`].
pub fn map_probe(
    probe: &ProbeResult,
    path: &Path,
    created: DateTime<Utc>,
) -> Result<VideoTechnicalMetadata, AppError> {
    let video = probe.video_streams.first().ok_or(AppError::NoVideoStream)?;
    let audio = probe.audio_streams.first();

    let color_space = classifier::resolve_color_space(video);
    let recording_mode = classifier::recording_mode(&color_space);
    let bit_rate = if video.bit_rate > 0 {
        video.bit_rate
    } else {
        probe.bit_rate
    };

    Ok(VideoTechnicalMetadata {
        width: video.width,
        height: video.height,
        frame_rate: video.frame_rate,
        duration_secs: probe.duration_secs,
        bit_rate,
        color_depth: classifier::color_depth(video.pixel_format.as_deref()),
        color_space,
        video_codec: video.codec_name.clone(),
        is_variable_frame_rate: classifier::is_variable_frame_rate(
            video.frame_rate,
            video.avg_frame_rate,
        ),

        audio_codec: audio
            .map(|a| a.codec_name.clone())
            .unwrap_or_else(|| "Unknown".to_string()),
        audio_channels: audio.map(|a| a.channels).unwrap_or(0),
        audio_sample_rate: audio.map(|a| a.sample_rate).unwrap_or(0),
        audio_bit_rate: audio.map(|a| a.bit_rate).unwrap_or(0),

        camera_model: classifier::camera_model(&probe.tags),
        camera_settings: classifier::camera_settings(&probe.tags),

        category: classifier::category_from_path(path),
        exact_creation_time: created,
        recording_mode,
        notes: String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::metadata::{Category, RecordingMode};
    use crate::analyzer::probe::{AudioStreamInfo, VideoStreamInfo};

    fn probe() -> ProbeResult {
        ProbeResult {
            duration_secs: 12.5,
            bit_rate: 90_000_000,
            video_streams: vec![VideoStreamInfo {
                width: 3840,
                height: 2160,
                frame_rate: 30.0,
                avg_frame_rate: 29.5,
                codec_name: "hevc".to_string(),
                pixel_format: Some("yuv420p10le".to_string()),
                bit_rate: 0,
                color_space: Some("bt2020nc".to_string()),
            }],
            audio_streams: vec![AudioStreamInfo {
                codec_name: "aac".to_string(),
                channels: 2,
                sample_rate: 48_000,
                bit_rate: 128_000,
            }],
            tags: vec![
                ("encoder".to_string(), "DJI".to_string()),
                ("make".to_string(), "DJI".to_string()),
                ("iso".to_string(), "200".to_string()),
            ],
        }
    }

    #[test]
    fn test_map_full_probe() {
        let created = Utc::now();
        let meta = map_probe(&probe(), Path::new("/clips/drone/DJI_0001.MP4"), created).unwrap();

        assert_eq!(meta.resolution_string(), "3840x2160");
        assert_eq!(meta.bit_rate, 90_000_000);
        assert_eq!(meta.color_space, "bt2020nc");
        assert_eq!(meta.color_depth, 10);
        assert_eq!(meta.recording_mode, RecordingMode::Hdr);
        assert!(meta.is_variable_frame_rate);
        assert_eq!(meta.audio_codec, "aac");
        assert_eq!(meta.audio_sample_rate, 48_000);
        assert_eq!(meta.camera_model, "DJI");
        assert_eq!(meta.camera_settings_json().unwrap(), r#"{"iso":"200"}"#);
        assert_eq!(meta.category, Category::Aerial);
        assert_eq!(meta.exact_creation_time, created);
    }

    #[test]
    fn test_no_audio_defaults() {
        let mut probe = probe();
        probe.audio_streams.clear();
        probe.tags.clear();

        let meta = map_probe(&probe, Path::new("clip.mp4"), Utc::now()).unwrap();
        assert_eq!(meta.audio_codec, "Unknown");
        assert_eq!(meta.audio_channels, 0);
        assert_eq!(meta.camera_model, "Unknown");
        assert!(meta.camera_settings.is_empty());
        assert_eq!(meta.category, Category::Uncategorized);
    }

    #[test]
    fn test_no_video_stream() {
        let mut probe = probe();
        probe.video_streams.clear();

        let result = map_probe(&probe, Path::new("clip.mp4"), Utc::now());
        assert!(matches!(result, Err(AppError::NoVideoStream)));
    }
}
