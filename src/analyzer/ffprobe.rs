use crate::analyzer::probe::{AudioStreamInfo, MediaProber, ProbeResult, VideoStreamInfo};
use crate::config::ProbeConfig;
use crate::error::AppError;
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Probes files by running the ffprobe executable
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    ffprobe_path: String,
    timeout: Duration,
}

impl FfprobeProber {
    pub fn new(ffprobe_path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
            timeout,
        }
    }

    pub fn from_config(config: &ProbeConfig) -> Self {
        Self::new(
            config.ffprobe_path.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Run ffprobe with a timeout; the child is killed if it overruns
    async fn run_ffprobe(&self, input_path: &Path) -> Result<Vec<u8>, AppError> {
        let mut command = Command::new(&self.ffprobe_path);
        command
            .args(["-v", "error", "-show_format", "-show_streams", "-of", "json"])
            .arg(input_path)
            .kill_on_drop(true);

        debug!("Running {} on {}", self.ffprobe_path, input_path.display());

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(result) => result
                .map_err(|e| AppError::Analysis(format!("Failed to execute ffprobe: {}", e)))?,
            Err(_) => {
                return Err(AppError::ProbeTimeout {
                    secs: self.timeout.as_secs(),
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::Analysis(format!("ffprobe failed: {}", stderr.trim())));
        }

        Ok(output.stdout)
    }
}

impl MediaProber for FfprobeProber {
    fn analyze(&self, path: &Path) -> impl Future<Output = Result<ProbeResult, AppError>> + Send {
        async move {
            let stdout = self.run_ffprobe(path).await?;
            parse_probe_output(&stdout)
        }
    }
}

/// Decode `ffprobe -show_format -show_streams -of json` output
pub fn parse_probe_output(json: &[u8]) -> Result<ProbeResult, AppError> {
    let data: FfprobeOutput = serde_json::from_slice(json)
        .map_err(|e| AppError::Analysis(format!("Failed to parse ffprobe output: {}", e)))?;

    let mut result = ProbeResult::default();

    if let Some(format) = data.format {
        result.duration_secs = parse_or_zero(format.duration.as_deref());
        result.bit_rate = parse_or_zero(format.bit_rate.as_deref());
        result.tags = format
            .tags
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect();
    }

    for stream in data.streams {
        match stream.codec_type.as_deref() {
            Some("video") => result.video_streams.push(VideoStreamInfo {
                width: stream.width.unwrap_or(0),
                height: stream.height.unwrap_or(0),
                frame_rate: parse_frame_rate(stream.r_frame_rate.as_deref()),
                avg_frame_rate: parse_frame_rate(stream.avg_frame_rate.as_deref()),
                codec_name: stream.codec_name.unwrap_or_else(|| "unknown".to_string()),
                pixel_format: stream.pix_fmt,
                bit_rate: parse_or_zero(stream.bit_rate.as_deref()),
                color_space: stream.color_space.filter(|s| !s.is_empty() && s != "unknown"),
            }),
            Some("audio") => result.audio_streams.push(AudioStreamInfo {
                codec_name: stream.codec_name.unwrap_or_else(|| "unknown".to_string()),
                channels: stream.channels.unwrap_or(0),
                sample_rate: parse_or_zero(stream.sample_rate.as_deref()),
                bit_rate: parse_or_zero(stream.bit_rate.as_deref()),
            }),
            // Data streams carry the embedded telemetry or timecode tracks
            _ => {}
        }
    }

    Ok(result)
}

/// Parse frame rate from ffprobe's "num/den" form
fn parse_frame_rate(rate_str: Option<&str>) -> f64 {
    rate_str
        .and_then(|s| match s.split_once('/') {
            Some((num, den)) => {
                let num = num.trim().parse::<f64>().ok()?;
                let den = den.trim().parse::<f64>().ok()?;
                (den > 0.0).then(|| num / den)
            }
            None => s.trim().parse::<f64>().ok(),
        })
        .unwrap_or(0.0)
}

fn parse_or_zero<T: std::str::FromStr + Default>(value: Option<&str>) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or_default()
}

// JSON deserialization structures

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<RawStream>,
    format: Option<FormatInfo>,
}

#[derive(Debug, Deserialize)]
struct FormatInfo {
    duration: Option<String>,
    bit_rate: Option<String>,
    #[serde(default)]
    tags: serde_json::Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    pix_fmt: Option<String>,
    color_space: Option<String>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    bit_rate: Option<String>,
    channels: Option<u32>,
    sample_rate: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "streams": [
            {
                "index": 0,
                "codec_name": "hevc",
                "codec_type": "video",
                "width": 3840,
                "height": 2160,
                "pix_fmt": "yuv420p10le",
                "color_space": "bt2020nc",
                "r_frame_rate": "30000/1001",
                "avg_frame_rate": "30000/1001",
                "bit_rate": "120000000"
            },
            {
                "index": 1,
                "codec_name": "aac",
                "codec_type": "audio",
                "sample_rate": "48000",
                "channels": 2,
                "bit_rate": "128000"
            },
            {
                "index": 2,
                "codec_type": "data",
                "codec_name": "none"
            }
        ],
        "format": {
            "duration": "62.395000",
            "bit_rate": "120453211",
            "tags": {
                "major_brand": "isom",
                "encoder": "DJI Mini4 Pro",
                "make": "DJI",
                "creation_time": "2024-05-20T14:32:11.000000Z"
            }
        }
    }"#;

    #[test]
    fn test_parse_probe_output() {
        let result = parse_probe_output(SAMPLE.as_bytes()).unwrap();

        assert!((result.duration_secs - 62.395).abs() < 1e-9);
        assert_eq!(result.bit_rate, 120_453_211);
        assert_eq!(result.video_streams.len(), 1);
        assert_eq!(result.audio_streams.len(), 1);

        let video = &result.video_streams[0];
        assert_eq!((video.width, video.height), (3840, 2160));
        assert!((video.frame_rate - 29.97).abs() < 0.001);
        assert_eq!(video.color_space.as_deref(), Some("bt2020nc"));
        assert_eq!(video.bit_rate, 120_000_000);

        let audio = &result.audio_streams[0];
        assert_eq!(audio.codec_name, "aac");
        assert_eq!(audio.sample_rate, 48_000);
        assert_eq!(audio.channels, 2);

        // Tag order follows the file
        let keys: Vec<&str> = result.tags.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["major_brand", "encoder", "make", "creation_time"]);
    }

    #[test]
    fn test_parse_frame_rate() {
        assert_eq!(parse_frame_rate(Some("30/1")), 30.0);
        assert_eq!(parse_frame_rate(Some("0/0")), 0.0);
        assert_eq!(parse_frame_rate(Some("25")), 25.0);
        assert_eq!(parse_frame_rate(Some("garbage")), 0.0);
        assert_eq!(parse_frame_rate(None), 0.0);
    }

    #[test]
    fn test_invalid_json_is_analysis_error() {
        assert!(matches!(
            parse_probe_output(b"not json"),
            Err(AppError::Analysis(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_executable_is_analysis_error() {
        let prober = FfprobeProber::new("flightmeta-no-such-ffprobe", Duration::from_secs(5));
        let result = prober.analyze(Path::new("clip.mp4")).await;
        assert!(matches!(result, Err(AppError::Analysis(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_slow_ffprobe_times_out() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("ffprobe.sh");
        std::fs::write(&script, "#!/bin/sh\nsleep 5\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let prober = FfprobeProber::new(script.to_string_lossy(), Duration::from_secs(1));
        let result = prober.analyze(Path::new("clip.mp4")).await;

        let err = result.unwrap_err();
        assert!(matches!(err, AppError::ProbeTimeout { secs: 1 }));
        assert!(err.is_missing_stream());
    }
}
