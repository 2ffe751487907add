use crate::geo::LatLon;
use crate::telemetry::CameraSettingsPoint;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Takeoff reference; all zeros means undefined, not the origin
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HomePosition {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

/// A position fix with derived motion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryPoint {
    pub timestamp: NaiveDateTime,
    pub latitude: f64,
    pub longitude: f64,
    /// Altitude relative to home, in meters
    pub altitude: f64,
    /// Ground speed in m/s
    pub speed: f64,
    /// Course over ground in degrees, [0, 360)
    pub heading: f64,
    pub camera: Option<CameraSettingsPoint>,
}

impl TelemetryPoint {
    pub fn position(&self) -> LatLon {
        LatLon::new(self.latitude, self.longitude)
    }
}

/// Flight trajectory recovered from a companion log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightMetadata {
    pub drone_model: String,
    pub flight_date: NaiveDateTime,
    pub home: HomePosition,
    pub points: Vec<TelemetryPoint>,
}

impl FlightMetadata {
    pub fn home_is_defined(&self) -> bool {
        self.home != HomePosition::default()
    }

    /// Sum of segment lengths along the trajectory, in meters
    pub fn track_length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| crate::geo::distance(w[0].position(), w[1].position()))
            .sum()
    }
}
