use crate::math::angle_2d::angle_2pi;
use crate::math::{Point2, Vector2, TOLERANCE};

/// Below this, `sin(θ/2)` is treated as zero: the two edges fold back onto
/// each other and the miter length would blow up.
const MIN_HALF_ANGLE_SINE: f64 = 1e-6;

/// A directed centerline segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSegment {
    pub start: Point2,
    pub end: Point2,
}

impl EdgeSegment {
    #[must_use]
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn direction(&self) -> Vector2 {
        self.end - self.start
    }
}

/// Miter vector at the vertex where `incoming` ends and `outgoing` starts.
///
/// The vector bisects the CCW angle θ between the reversed incoming edge and
/// the outgoing edge, with length `offset / sin(θ/2)` so that its
/// perpendicular distance from either centerline is exactly `offset`. Adding
/// it to the vertex gives the interior offset corner; subtracting it gives the
/// exterior one.
///
/// A missing edge is replaced by a collinear continuation of the other, which
/// reduces the miter to a plain perpendicular offset. Fold-back joins fall
/// back to that same perpendicular offset, and a zero-length outgoing edge
/// yields a zero vector.
#[must_use]
pub fn half_angle_vector(
    incoming: Option<&EdgeSegment>,
    outgoing: Option<&EdgeSegment>,
    offset: f64,
) -> Vector2 {
    let (v1, v2) = match (incoming, outgoing) {
        (Some(v1), Some(v2)) => (*v1, *v2),
        (None, Some(v2)) => {
            let virtual_start = v2.start - v2.direction();
            (EdgeSegment::new(virtual_start, v2.start), *v2)
        }
        (Some(v1), None) => {
            let virtual_end = v1.end + v1.direction();
            (*v1, EdgeSegment::new(v1.end, virtual_end))
        }
        (None, None) => return Vector2::zeros(),
    };

    let back = v1.start - v1.end;
    let ahead = v2.end - v1.end;
    let theta = angle_2pi(back.x, back.y, ahead.x, ahead.y);

    let cs = (theta / 2.0).cos();
    let sn = (theta / 2.0).sin();

    let d = v2.direction();
    let mag = d.norm();
    if mag < TOLERANCE {
        return Vector2::zeros();
    }

    if sn.abs() < MIN_HALF_ANGLE_SINE {
        // Left normal of the outgoing edge, i.e. the θ = π rotation.
        return Vector2::new(-d.y, d.x) * (offset / mag);
    }

    let rotated = Vector2::new(d.x * cs - d.y * sn, d.x * sn + d.y * cs);
    rotated * (offset / sn / mag)
}
