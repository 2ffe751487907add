use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Media analysis failed: {0}")]
    Analysis(String),

    #[error("No video stream found")]
    NoVideoStream,

    #[error("Probe timed out after {secs}s")]
    ProbeTimeout { secs: u64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse config: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Metadata store error: {0}")]
    Store(String),
}

impl AppError {
    /// Whether the probe produced nothing usable for this video
    pub fn is_missing_stream(&self) -> bool {
        matches!(self, AppError::NoVideoStream | AppError::ProbeTimeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_errors_convert() {
        let err: AppError = serde_json::from_str::<u32>("not a number").unwrap_err().into();
        assert!(matches!(err, AppError::Json(_)));
        assert!(!err.is_missing_stream());
    }
}
