use super::kinematics;
use super::model::{FlightMetadata, HomePosition, TelemetryPoint};
use crate::config::{HeadingAveraging, HomePolicy, TelemetryConfig};
use crate::telemetry::{RawTelemetryRecord, TelemetryLog};
use chrono::NaiveDateTime;
use tracing::{debug, warn};

/// Assembles a [`FlightMetadata`] from parsed log records
#[derive(Debug, Clone, Copy, Default)]
pub struct FlightBuilder {
    home_policy: HomePolicy,
    heading_averaging: HeadingAveraging,
}

impl FlightBuilder {
    pub fn new(home_policy: HomePolicy, heading_averaging: HeadingAveraging) -> Self {
        Self {
            home_policy,
            heading_averaging,
        }
    }

    pub fn from_config(config: &TelemetryConfig) -> Self {
        Self::new(config.home_policy, config.heading_averaging)
    }

    /// Build the aggregate; `fallback_date` is used when the log has no points
    pub fn build(
        &self,
        log: TelemetryLog,
        drone_model: String,
        fallback_date: NaiveDateTime,
    ) -> FlightMetadata {
        let home = self.home_position(&log.records);
        if home.is_none() && !log.records.is_empty() {
            warn!(
                "First log entry was skipped; home position left undefined ({:?})",
                self.home_policy
            );
        }

        let mut points: Vec<TelemetryPoint> = log
            .records
            .into_iter()
            .map(|record| TelemetryPoint {
                timestamp: record.timestamp,
                latitude: record.latitude,
                longitude: record.longitude,
                altitude: record.rel_altitude,
                speed: 0.0,
                heading: 0.0,
                camera: record.camera,
            })
            .collect();

        kinematics::apply(&mut points, self.heading_averaging);

        let flight_date = points
            .first()
            .map(|p| p.timestamp)
            .unwrap_or(fallback_date);

        debug!(
            "Built flight metadata: {} points, drone model {}",
            points.len(),
            drone_model
        );

        FlightMetadata {
            drone_model,
            flight_date,
            home: home.unwrap_or_default(),
            points,
        }
    }

    fn home_position(&self, records: &[RawTelemetryRecord]) -> Option<HomePosition> {
        let first = records.first()?;
        if self.home_policy == HomePolicy::FirstRawEntry && first.entry_index != 0 {
            return None;
        }
        Some(HomePosition {
            latitude: first.latitude,
            longitude: first.longitude,
            altitude: first.rel_altitude,
        })
    }
}
