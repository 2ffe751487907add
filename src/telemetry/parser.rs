use super::record::{CameraSettingsPoint, EntryError, RawTelemetryRecord, TelemetryLog};
use crate::error::AppError;
use chrono::NaiveDateTime;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

/// Physical lines per log entry
pub const LINES_PER_ENTRY: usize = 5;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";
const ABS_ALT_MARKER: &str = "abs_alt";

/// Keys that must all be present for a camera settings point
const CAMERA_KEYS: [&str; 8] = [
    "iso",
    "shutter",
    "fnum",
    "ev",
    "ct",
    "color_md",
    "focal_len",
    "dzoom_ratio",
];

static MARKUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("markup pattern is valid"));

static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{3}$").expect("timestamp pattern is valid")
});

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\s*([A-Za-z_][A-Za-z0-9_]*)\s*:\s*([^\[\]]*?)\s*\]")
        .expect("token pattern is valid")
});

/// Parser for subtitle-track flight logs
///
/// Each entry spans five lines: sequence number, time range, frame counter,
/// absolute timestamp and a `[key: value]` telemetry line wrapped in font
/// markup. Blank separator lines between entries are tolerated.
#[derive(Debug, Clone)]
pub struct TelemetryParser {
    skip_log_interval: usize,
}

impl TelemetryParser {
    pub fn new(skip_log_interval: usize) -> Self {
        Self {
            skip_log_interval: skip_log_interval.max(1),
        }
    }

    /// Read and parse a log file; unreadable bytes are replaced, not rejected
    pub fn parse_file(&self, path: &Path) -> Result<TelemetryLog, AppError> {
        let bytes = std::fs::read(path)?;
        Ok(self.parse(&String::from_utf8_lossy(&bytes)))
    }

    /// Parse log text into records, skipping malformed entries
    pub fn parse(&self, content: &str) -> TelemetryLog {
        let lines: Vec<&str> = content.trim_start_matches('\u{feff}').lines().collect();
        let mut log = TelemetryLog::default();
        let mut cursor = 0;

        loop {
            while cursor < lines.len() && lines[cursor].trim().is_empty() {
                cursor += 1;
            }
            if cursor >= lines.len() {
                break;
            }
            if lines.len() - cursor < LINES_PER_ENTRY {
                debug!(
                    "Ignoring incomplete trailing entry ({} lines)",
                    lines.len() - cursor
                );
                log.stats.truncated = true;
                break;
            }

            let entry_index = log.stats.total;
            let entry = &lines[cursor..cursor + LINES_PER_ENTRY];
            cursor += LINES_PER_ENTRY;
            log.stats.total += 1;

            match parse_entry(entry_index, entry) {
                Ok(record) => {
                    if record.camera.is_none() {
                        log.stats.without_camera += 1;
                    }
                    log.stats.parsed += 1;
                    log.records.push(record);
                }
                Err(e) => {
                    log.stats.skipped += 1;
                    if log.stats.skipped == 1 || log.stats.skipped % self.skip_log_interval == 0 {
                        warn!(
                            "Skipped telemetry entry {} ({} skipped so far): {}",
                            entry_index, log.stats.skipped, e
                        );
                    }
                    log.last_error = Some(e);
                }
            }
        }

        info!(
            "Parsed telemetry log: {} entries, {} parsed, {} skipped, {} without camera data",
            log.stats.total, log.stats.parsed, log.stats.skipped, log.stats.without_camera
        );
        log
    }
}

impl Default for TelemetryParser {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Parse one five-line entry
fn parse_entry(entry_index: usize, lines: &[&str]) -> Result<RawTelemetryRecord, EntryError> {
    let timestamp_line = lines[3].trim();
    if timestamp_line.is_empty() {
        return Err(EntryError::EmptyTimestamp);
    }
    let bad_timestamp = || EntryError::BadTimestamp(timestamp_line.to_string());
    if !TIMESTAMP_RE.is_match(timestamp_line) {
        return Err(bad_timestamp());
    }
    let timestamp =
        NaiveDateTime::parse_from_str(timestamp_line, TIMESTAMP_FORMAT).map_err(|_| bad_timestamp())?;

    let telemetry_line = strip_markup(lines[4]);
    if telemetry_line.is_empty() {
        return Err(EntryError::EmptyTelemetry);
    }
    let fields = tokenize(&telemetry_line);

    let latitude = parse_number::<f64>(&fields, "latitude")?;
    let longitude = parse_number::<f64>(&fields, "longitude")?;
    let rel_altitude = parse_relative_altitude(required(&fields, "rel_alt")?)?;

    let camera = if CAMERA_KEYS.iter().all(|key| fields.contains_key(key)) {
        Some(parse_camera(&fields)?)
    } else {
        None
    };

    Ok(RawTelemetryRecord {
        entry_index,
        timestamp,
        latitude,
        longitude,
        rel_altitude,
        camera,
    })
}

fn parse_camera(fields: &HashMap<&str, &str>) -> Result<CameraSettingsPoint, EntryError> {
    let fnum = parse_number::<f64>(fields, "fnum")?;
    let (digital_zoom_ratio, digital_zoom_delta) =
        parse_zoom(required(fields, "dzoom_ratio")?)?;

    Ok(CameraSettingsPoint {
        iso: parse_number(fields, "iso")?,
        shutter_speed: required(fields, "shutter")?.to_string(),
        aperture: fnum / 100.0,
        exposure_value: parse_number(fields, "ev")?,
        color_temperature: parse_number(fields, "ct")?,
        color_mode: required(fields, "color_md")?.to_string(),
        focal_length: parse_number(fields, "focal_len")?,
        digital_zoom_ratio,
        digital_zoom_delta,
    })
}

/// Remove presentation tags such as `<font size="28">`
fn strip_markup(line: &str) -> String {
    MARKUP_RE.replace_all(line, "").trim().to_string()
}

/// Split a telemetry line into its `[key: value]` tokens
fn tokenize(line: &str) -> HashMap<&str, &str> {
    TOKEN_RE
        .captures_iter(line)
        .filter_map(|caps| {
            let key = caps.get(1)?.as_str();
            let value = caps.get(2)?.as_str();
            Some((key, value))
        })
        .collect()
}

fn required<'a>(fields: &HashMap<&str, &'a str>, key: &'static str) -> Result<&'a str, EntryError> {
    fields.get(key).copied().ok_or(EntryError::MissingKey(key))
}

fn parse_number<T: FromStr>(fields: &HashMap<&str, &str>, key: &'static str) -> Result<T, EntryError> {
    let value = required(fields, key)?;
    value.trim().parse::<T>().map_err(|_| EntryError::BadNumber {
        key,
        value: value.to_string(),
    })
}

/// `"78.500 abs_alt: 54.090"` -> 78.5
fn parse_relative_altitude(value: &str) -> Result<f64, EntryError> {
    let relative = value
        .split_once(ABS_ALT_MARKER)
        .map(|(rel, _)| rel)
        .unwrap_or(value)
        .trim();
    relative.parse::<f64>().map_err(|_| EntryError::BadNumber {
        key: "rel_alt",
        value: value.to_string(),
    })
}

/// `"10000, delta:0"` -> (10000, 0)
fn parse_zoom(value: &str) -> Result<(i32, i32), EntryError> {
    let bad = || EntryError::BadNumber {
        key: "dzoom_ratio",
        value: value.to_string(),
    };

    let (ratio, rest) = value.split_once(',').ok_or_else(bad)?;
    let (_label, delta) = rest.split_once(':').ok_or_else(bad)?;

    let ratio = ratio.trim().parse::<i32>().map_err(|_| bad())?;
    let delta = delta.trim().parse::<i32>().map_err(|_| bad())?;
    Ok((ratio, delta))
}
