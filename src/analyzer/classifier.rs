use super::metadata::{Category, RecordingMode};
use super::probe::VideoStreamInfo;
use std::collections::BTreeMap;
use std::path::Path;

/// Color primaries assumed for 4:2:0 footage without an explicit tag
pub const SDR_COLOR_SPACE: &str = "bt709";
const WIDE_GAMUT_MARKER: &str = "bt2020";

/// Frame rates closer than this are treated as constant
const VFR_TOLERANCE: f64 = 0.001;

/// Explicit stream tag, else the SDR default for 4:2:0 formats, else "Unknown"
pub fn resolve_color_space(stream: &VideoStreamInfo) -> String {
    if let Some(tag) = stream.color_space.as_deref().filter(|s| !s.is_empty()) {
        return tag.to_string();
    }
    match stream.pixel_format.as_deref() {
        Some(pix_fmt) if pix_fmt.contains("420") => SDR_COLOR_SPACE.to_string(),
        _ => "Unknown".to_string(),
    }
}

/// Bits per component from the pixel format name
pub fn color_depth(pixel_format: Option<&str>) -> u8 {
    let pix_fmt = pixel_format.unwrap_or_default();
    if pix_fmt.contains("p10") || pix_fmt.contains("p010") {
        10
    } else if pix_fmt.contains("p12") || pix_fmt.contains("p012") {
        12
    } else {
        8
    }
}

pub fn is_variable_frame_rate(frame_rate: f64, avg_frame_rate: f64) -> bool {
    frame_rate > 0.0 && avg_frame_rate > 0.0 && (frame_rate - avg_frame_rate).abs() > VFR_TOLERANCE
}

pub fn recording_mode(color_space: &str) -> RecordingMode {
    let lower = color_space.to_lowercase();
    if lower.contains(WIDE_GAMUT_MARKER) {
        RecordingMode::Hdr
    } else if lower.contains(SDR_COLOR_SPACE) {
        RecordingMode::Standard
    } else {
        RecordingMode::Unknown
    }
}

/// Category from the name of the directory holding the file
pub fn category_from_path(path: &Path) -> Category {
    let dir_name = path
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if dir_name.contains("drone") || dir_name.contains("aerial") {
        Category::Aerial
    } else if dir_name.contains("broll") || dir_name.contains("b-roll") {
        Category::BRoll
    } else {
        Category::Uncategorized
    }
}

/// Value of the first tag whose key names a camera or make
///
/// Only the first matching tag is considered; an empty value there yields
/// "Unknown" even if a later tag would match.
pub fn camera_model(tags: &[(String, String)]) -> String {
    tags.iter()
        .find(|(key, _)| {
            let key = key.to_lowercase();
            key.contains("camera") || key.contains("make")
        })
        .map(|(_, value)| value.as_str())
        .filter(|value| !value.is_empty())
        .unwrap_or("Unknown")
        .to_string()
}

/// All tags describing ISO, exposure or aperture
pub fn camera_settings(tags: &[(String, String)]) -> BTreeMap<String, String> {
    tags.iter()
        .filter(|(key, _)| {
            let key = key.to_lowercase();
            key.contains("iso") || key.contains("exposure") || key.contains("aperture")
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
