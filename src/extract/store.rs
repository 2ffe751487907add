use super::video::VideoId;
use crate::analyzer::VideoTechnicalMetadata;
use crate::error::AppError;
use crate::flight::FlightMetadata;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Where extracted records go; every write replaces the previous record
pub trait MetadataStore {
    fn upsert_video_metadata(
        &self,
        video_id: &VideoId,
        metadata: VideoTechnicalMetadata,
    ) -> Result<(), AppError>;

    /// Fails if no video metadata exists yet for `video_id`
    fn attach_flight_metadata(
        &self,
        video_id: &VideoId,
        flight: FlightMetadata,
    ) -> Result<(), AppError>;

    /// Drop any flight record for `video_id`; returns whether one existed
    fn clear_flight_metadata(&self, video_id: &VideoId) -> Result<bool, AppError>;

    fn video_metadata(&self, video_id: &VideoId) -> Option<VideoTechnicalMetadata>;

    fn flight_metadata(&self, video_id: &VideoId) -> Option<FlightMetadata>;
}

/// Everything known about one video
#[derive(Debug, Clone, Serialize)]
pub struct StoredVideo {
    pub metadata: VideoTechnicalMetadata,
    pub flight: Option<FlightMetadata>,
}

/// In-process store keyed by video identity
#[derive(Debug, Default)]
pub struct MemoryStore {
    videos: Mutex<BTreeMap<VideoId, StoredVideo>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of all records, ordered by id
    pub fn snapshot(&self) -> BTreeMap<VideoId, StoredVideo> {
        self.lock().map(|v| v.clone()).unwrap_or_default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<VideoId, StoredVideo>>, AppError> {
        self.videos
            .lock()
            .map_err(|_| AppError::Store("store lock poisoned".to_string()))
    }
}

impl MetadataStore for MemoryStore {
    fn upsert_video_metadata(
        &self,
        video_id: &VideoId,
        metadata: VideoTechnicalMetadata,
    ) -> Result<(), AppError> {
        let mut videos = self.lock()?;
        match videos.get_mut(video_id) {
            Some(existing) => existing.metadata = metadata,
            None => {
                videos.insert(
                    video_id.clone(),
                    StoredVideo {
                        metadata,
                        flight: None,
                    },
                );
            }
        }
        Ok(())
    }

    fn attach_flight_metadata(
        &self,
        video_id: &VideoId,
        flight: FlightMetadata,
    ) -> Result<(), AppError> {
        let mut videos = self.lock()?;
        let stored = videos
            .get_mut(video_id)
            .ok_or_else(|| AppError::Store(format!("no video record for {}", video_id)))?;
        stored.flight = Some(flight);
        Ok(())
    }

    fn clear_flight_metadata(&self, video_id: &VideoId) -> Result<bool, AppError> {
        let mut videos = self.lock()?;
        Ok(videos
            .get_mut(video_id)
            .and_then(|stored| stored.flight.take())
            .is_some())
    }

    fn video_metadata(&self, video_id: &VideoId) -> Option<VideoTechnicalMetadata> {
        self.lock().ok()?.get(video_id).map(|v| v.metadata.clone())
    }

    fn flight_metadata(&self, video_id: &VideoId) -> Option<FlightMetadata> {
        self.lock().ok()?.get(video_id).and_then(|v| v.flight.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::probe::{ProbeResult, VideoStreamInfo};
    use crate::analyzer::map_probe;
    use crate::flight::HomePosition;
    use chrono::{NaiveDate, Utc};
    use std::path::Path;

    fn metadata(width: u32) -> VideoTechnicalMetadata {
        let probe = ProbeResult {
            duration_secs: 3.0,
            bit_rate: 1_000_000,
            video_streams: vec![VideoStreamInfo {
                width,
                height: 1080,
                frame_rate: 25.0,
                avg_frame_rate: 25.0,
                codec_name: "h264".to_string(),
                pixel_format: Some("yuv420p".to_string()),
                bit_rate: 0,
                color_space: None,
            }],
            audio_streams: Vec::new(),
            tags: Vec::new(),
        };
        map_probe(&probe, Path::new("clip.mp4"), Utc::now()).unwrap()
    }

    fn flight() -> FlightMetadata {
        FlightMetadata {
            drone_model: "DJI".to_string(),
            flight_date: NaiveDate::from_ymd_opt(2024, 5, 20)
                .unwrap()
                .and_hms_opt(14, 32, 11)
                .unwrap(),
            home: HomePosition::default(),
            points: Vec::new(),
        }
    }

    #[test]
    fn test_upsert_replaces_and_keeps_flight() {
        let store = MemoryStore::new();
        let id = VideoId::new("5_0_clip.mp4");
        store.upsert_video_metadata(&id, metadata(1920)).unwrap();
        store.attach_flight_metadata(&id, flight()).unwrap();
        store.upsert_video_metadata(&id, metadata(1280)).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.video_metadata(&id).unwrap().width, 1280);
        assert!(store.flight_metadata(&id).is_some());
    }

    #[test]
    fn test_clear_flight_metadata() {
        let store = MemoryStore::new();
        let id = VideoId::new("5_0_clip.mp4");
        store.upsert_video_metadata(&id, metadata(1920)).unwrap();
        assert!(!store.clear_flight_metadata(&id).unwrap());

        store.attach_flight_metadata(&id, flight()).unwrap();
        assert!(store.clear_flight_metadata(&id).unwrap());
        assert!(store.flight_metadata(&id).is_none());
        assert!(store.video_metadata(&id).is_some());
        assert!(!store.clear_flight_metadata(&VideoId::new("missing")).unwrap());
    }

    #[test]
    fn test_attach_requires_video_record() {
        let store = MemoryStore::new();
        let id = VideoId::new("missing");
        let result = store.attach_flight_metadata(&id, flight());
        assert!(matches!(result, Err(AppError::Store(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_snapshot_ordered_by_id() {
        let store = MemoryStore::new();
        store
            .upsert_video_metadata(&VideoId::new("b"), metadata(1920))
            .unwrap();
        store
            .upsert_video_metadata(&VideoId::new("a"), metadata(1920))
            .unwrap();
        let ids: Vec<_> = store.snapshot().into_keys().collect();
        assert_eq!(ids, vec![VideoId::new("a"), VideoId::new("b")]);
    }
}
