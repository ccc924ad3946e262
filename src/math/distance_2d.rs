use super::{Point2, TOLERANCE};

/// Euclidean distance between `(x1, y1)` and `(x2, y2)`.
#[must_use]
pub fn distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt()
}

/// Projects point `(x, y)` onto the segment from `(x1, y1)` to `(x2, y2)`.
///
/// The projection parameter is clamped to the segment: anything before the
/// start maps to the start, anything past the end maps to the end. A
/// zero-length segment returns its single point.
#[must_use]
pub fn closest_point_on_line(x: f64, y: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> Point2 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    let len_sq = dx * dx + dy * dy;

    if len_sq < TOLERANCE * TOLERANCE {
        return Point2::new(x1, y1);
    }

    let t = ((x - x1) * dx + (y - y1) * dy) / len_sq;
    if t < 0.0 {
        Point2::new(x1, y1)
    } else if t > 1.0 {
        Point2::new(x2, y2)
    } else {
        Point2::new(x1 + t * dx, y1 + t * dy)
    }
}

/// Distance from point `(x, y)` to the segment from `(x1, y1)` to `(x2, y2)`.
#[must_use]
pub fn point_distance_from_line(x: f64, y: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let closest = closest_point_on_line(x, y, x1, y1, x2, y2);
    distance(x, y, closest.x, closest.y)
}
