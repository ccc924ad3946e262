use super::intersect_2d::line_line_intersect;
use super::Point2;

/// Iterates the closing edges `(p[i], p[i + 1])` of a polygon, wrapping the
/// last vertex back to the first.
fn closed_edges(points: &[Point2]) -> impl Iterator<Item = (&Point2, &Point2)> {
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .take(points.len())
}

/// Orientation test used by room detection.
///
/// Sums `(x2 - x1) * (y2 + y1)` over the closed polygon and reports `true`
/// for a non-negative sum. Points are first shifted so the x minimum is
/// non-negative; the y axis is shifted by that same x minimum. The sum is
/// translation invariant, so the shift never changes the result.
#[must_use]
pub fn is_clockwise(points: &[Point2]) -> bool {
    let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let sub_x = min_x.min(0.0);
    let sub_y = sub_x;

    let sum: f64 = closed_edges(points)
        .map(|(a, b)| {
            let (ax, ay) = (a.x - sub_x, a.y - sub_y);
            let (bx, by) = (b.x - sub_x, b.y - sub_y);
            (bx - ax) * (by + ay)
        })
        .sum();
    sum >= 0.0
}

/// Tests whether the segment `p1–p2` crosses any edge of the polygon.
#[must_use]
pub fn line_polygon_intersect(p1: &Point2, p2: &Point2, corners: &[Point2]) -> bool {
    closed_edges(corners).any(|(a, b)| line_line_intersect(p1, p2, a, b))
}

/// Tests whether any edge of `first` crosses any edge of `second`.
#[must_use]
pub fn polygon_polygon_intersect(first: &[Point2], second: &[Point2]) -> bool {
    closed_edges(first).any(|(a, b)| line_polygon_intersect(a, b, second))
}

/// Ray-cast point-in-polygon test.
///
/// Counts crossings of the segment `start → point` with the polygon edges; an
/// odd count means inside. `start` must lie outside the polygon. When it is
/// `None`, a reference point below and left of the polygon's extent is used.
#[must_use]
pub fn point_in_polygon(point: &Point2, corners: &[Point2], start: Option<Point2>) -> bool {
    let start = start.unwrap_or_else(|| outside_reference(corners));
    let crossings = closed_edges(corners)
        .filter(|(a, b)| line_line_intersect(&start, point, a, b))
        .count();
    crossings % 2 == 1
}

/// A point guaranteed to be outside the polygon's bounding extent.
fn outside_reference(corners: &[Point2]) -> Point2 {
    let (min_x, min_y) = corners
        .iter()
        .fold((0.0_f64, 0.0_f64), |(mx, my), c| (mx.min(c.x), my.min(c.y)));
    Point2::new(min_x - 10.0, min_y - 10.0)
}

/// True when every vertex of `inside` lies within `outside`.
#[must_use]
pub fn polygon_inside_polygon(inside: &[Point2], outside: &[Point2], start: Option<Point2>) -> bool {
    inside
        .iter()
        .all(|p| point_in_polygon(p, outside, start))
}

/// True when no vertex of `inside` lies within `outside`.
#[must_use]
pub fn polygon_outside_polygon(inside: &[Point2], outside: &[Point2], start: Option<Point2>) -> bool {
    !inside
        .iter()
        .any(|p| point_in_polygon(p, outside, start))
}
