use super::Point2;

/// Orientation predicate: true when `p3` lies strictly counter-clockwise of
/// the directed line `p1 → p2`.
fn ccw(p1: &Point2, p2: &Point2, p3: &Point2) -> bool {
    (p3.y - p1.y) * (p2.x - p1.x) > (p2.y - p1.y) * (p3.x - p1.x)
}

/// Tests whether segment `p1–p2` crosses segment `p3–p4`.
///
/// Built from strict orientation tests, so collinear overlaps and touching
/// endpoints are resolved by the sign of a zero cross product rather than an
/// epsilon.
#[must_use]
pub fn line_line_intersect(p1: &Point2, p2: &Point2, p3: &Point2, p4: &Point2) -> bool {
    ccw(p1, p3, p4) != ccw(p2, p3, p4) && ccw(p1, p2, p3) != ccw(p1, p2, p4)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn crossing_diagonals_intersect() {
        assert!(line_line_intersect(
            &p(0.0, 0.0),
            &p(10.0, 10.0),
            &p(0.0, 10.0),
            &p(10.0, 0.0)
        ));
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        assert!(!line_line_intersect(
            &p(0.0, 0.0),
            &p(10.0, 0.0),
            &p(0.0, 5.0),
            &p(10.0, 5.0)
        ));
    }

    #[test]
    fn segments_short_of_each_other_do_not_intersect() {
        // The infinite lines cross at (5, 5) but the first segment stops before it.
        assert!(!line_line_intersect(
            &p(0.0, 0.0),
            &p(4.0, 4.0),
            &p(0.0, 10.0),
            &p(10.0, 0.0)
        ));
    }

    #[test]
    fn t_junction_counts_as_intersection() {
        assert!(line_line_intersect(
            &p(5.0, -5.0),
            &p(5.0, 5.0),
            &p(0.0, 0.0),
            &p(10.0, 0.0)
        ));
    }
}
