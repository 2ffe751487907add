pub mod classifier;
pub mod ffprobe;
pub mod mapper;
pub mod metadata;
pub mod probe;

pub use ffprobe::FfprobeProber;
pub use mapper::map_probe;
pub use metadata::{Category, RecordingMode, VideoTechnicalMetadata};
pub use probe::{AudioStreamInfo, MediaProber, ProbeResult, VideoStreamInfo};
