use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

/// Stable identity of a video file: size, modification time and name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A video file on disk
#[derive(Debug, Clone)]
pub struct VideoFile {
    pub id: VideoId,
    pub path: PathBuf,
    pub file_name: String,
    pub size_bytes: u64,
    /// Creation time, or modification time where the platform has none
    pub created: DateTime<Utc>,
}

impl VideoFile {
    /// Stat the file and derive its identity
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let meta = std::fs::metadata(path)?;
        if !meta.is_file() {
            return Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            )));
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        let modified = meta.modified()?;
        let created = meta.created().unwrap_or(modified);
        let modified_ms = modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);

        Ok(Self {
            id: VideoId(format!("{}_{}_{}", meta.len(), modified_ms, file_name)),
            path: path.to_path_buf(),
            file_name,
            size_bytes: meta.len(),
            created: DateTime::<Utc>::from(created),
        })
    }
}

/// Check if a path is a video file
pub fn is_video_file(path: &Path) -> bool {
    const VIDEO_EXTENSIONS: [&str; 8] = ["mp4", "mov", "mkv", "avi", "m4v", "mts", "ts", "webm"];

    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| VIDEO_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("DJI_0001.MP4");
        std::fs::write(&path, b"not really a video").unwrap();

        let first = VideoFile::from_path(&path).unwrap();
        let second = VideoFile::from_path(&path).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.size_bytes, 18);
        assert_eq!(first.file_name, "DJI_0001.MP4");
        assert!(first.id.as_str().starts_with("18_"));
        assert!(first.id.as_str().ends_with("_DJI_0001.MP4"));
    }

    #[test]
    fn test_missing_or_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(VideoFile::from_path(&dir.path().join("nope.mp4")).is_err());
        assert!(VideoFile::from_path(dir.path()).is_err());
    }

    #[test]
    fn test_is_video_file() {
        assert!(is_video_file(Path::new("DJI_0001.MP4")));
        assert!(is_video_file(Path::new("clip.mov")));
        assert!(!is_video_file(Path::new("DJI_0001.SRT")));
        assert!(!is_video_file(Path::new("README")));
    }
}
