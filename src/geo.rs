//! Great-circle helpers on a spherical Earth.

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Haversine distance between two points, in meters
pub fn distance(a: LatLon, b: LatLon) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lon - a.lon).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Initial bearing from `a` towards `b`, in degrees within [0, 360)
///
/// Identical points yield `atan2(0, 0)`, which is 0.
pub fn bearing(a: LatLon, b: LatLon) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_lambda = (b.lon - a.lon).to_radians();

    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
    let heading = y.atan2(x).to_degrees();

    (heading + 360.0) % 360.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const OSLO: LatLon = LatLon { lat: 59.9139, lon: 10.7522 };
    const BERGEN: LatLon = LatLon { lat: 60.3913, lon: 5.3221 };

    #[test]
    fn test_distance_to_self_is_zero() {
        assert_eq!(distance(OSLO, OSLO), 0.0);
        let b = bearing(OSLO, OSLO);
        assert!(b.is_finite());
        assert!((0.0..360.0).contains(&b));
    }

    #[test]
    fn test_distance_is_symmetric() {
        let there = distance(OSLO, BERGEN);
        let back = distance(BERGEN, OSLO);
        assert!((there - back).abs() < 1e-6);
        // Oslo to Bergen is roughly 305 km as the crow flies
        assert!((there - 305_000.0).abs() < 5_000.0, "got {}", there);
    }

    #[test]
    fn test_reverse_bearing_differs_by_half_turn() {
        let a = LatLon::new(59.9139, 10.7522);
        let b = LatLon::new(59.9160, 10.7560);
        let forward = bearing(a, b);
        let reverse = bearing(b, a);
        let diff = (forward - reverse).abs();
        assert!((diff - 180.0).abs() < 0.1, "forward {} reverse {}", forward, reverse);
    }

    #[test]
    fn test_cardinal_bearings() {
        let origin = LatLon::new(0.0, 0.0);
        assert!(bearing(origin, LatLon::new(1.0, 0.0)).abs() < 1e-9);
        assert!((bearing(origin, LatLon::new(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((bearing(origin, LatLon::new(-1.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((bearing(origin, LatLon::new(0.0, -1.0)) - 270.0).abs() < 1e-9);
    }
}
