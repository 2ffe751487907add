use super::model::TelemetryPoint;
use crate::config::HeadingAveraging;
use crate::geo;

/// Speed (m/s) and bearing (degrees) of the move from `a` to `b`
fn segment(a: &TelemetryPoint, b: &TelemetryPoint) -> (f64, f64) {
    let from = a.position();
    let to = b.position();
    let seconds = (b.timestamp - a.timestamp).num_milliseconds() as f64 / 1000.0;

    // Duplicate or out-of-order timestamps
    let speed = if seconds > 0.0 {
        geo::distance(from, to) / seconds
    } else {
        0.0
    };

    (speed, geo::bearing(from, to))
}

/// Combine a backward and forward bearing
pub fn average_heading(a: f64, b: f64, averaging: HeadingAveraging) -> f64 {
    match averaging {
        HeadingAveraging::Arithmetic => (a + b) / 2.0,
        HeadingAveraging::Circular => {
            let (sin_a, cos_a) = a.to_radians().sin_cos();
            let (sin_b, cos_b) = b.to_radians().sin_cos();
            let mean = (sin_a + sin_b).atan2(cos_a + cos_b).to_degrees();
            (mean + 360.0) % 360.0
        }
    }
}

/// Fill `speed` and `heading` for every point from its neighbours
///
/// Endpoints take the single adjacent segment, interior points the mean of
/// the incoming and outgoing segments. Fewer than two points are left as-is.
pub fn apply(points: &mut [TelemetryPoint], averaging: HeadingAveraging) {
    let n = points.len();
    if n < 2 {
        return;
    }

    let segments: Vec<(f64, f64)> = points.windows(2).map(|w| segment(&w[0], &w[1])).collect();

    for (i, point) in points.iter_mut().enumerate() {
        let (speed, heading) = if i == 0 {
            segments[0]
        } else if i == n - 1 {
            segments[n - 2]
        } else {
            let (back_speed, back_heading) = segments[i - 1];
            let (fwd_speed, fwd_heading) = segments[i];
            (
                (back_speed + fwd_speed) / 2.0,
                average_heading(back_heading, fwd_heading, averaging),
            )
        };
        point.speed = speed;
        point.heading = heading;
    }
}
