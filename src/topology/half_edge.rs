use crate::error::Result;
use crate::math::distance_2d::distance;
use crate::math::Point2;
use crate::operations::offset::{half_angle_vector, EdgeSegment};

use super::wall::WallId;
use super::FloorPlan;

slotmap::new_key_type! {
    /// Unique identifier for a derived half-edge. Keys are only valid until
    /// the next [`FloorPlan::update`].
    pub struct HalfEdgeId;
}

/// One side of a wall, directed along a room boundary.
///
/// Half-edges around a room link through `prev`/`next` into a closed ring
/// (a doubly-connected edge list). Orphan and exterior half-edges have no
/// neighbors.
#[derive(Debug, Clone)]
pub struct HalfEdgeData {
    pub wall: WallId,
    /// `true` for the side running start → end.
    pub front: bool,
    pub prev: Option<HalfEdgeId>,
    pub next: Option<HalfEdgeId>,
    /// Perpendicular distance from the centerline, half the wall thickness.
    pub offset: f64,
    pub height: f64,
}

impl FloorPlan {
    /// Creates a half-edge for one side of `wall` and records it on the wall.
    pub(crate) fn add_half_edge(&mut self, wall: WallId, front: bool) -> Result<HalfEdgeId> {
        let data = self.wall(wall)?;
        let edge = HalfEdgeData {
            wall,
            front,
            prev: None,
            next: None,
            offset: data.thickness / 2.0,
            height: data.height,
        };
        let id = self.half_edges.insert(edge);
        let data = self.wall_mut(wall)?;
        if front {
            data.front_edge = Some(id);
        } else {
            data.back_edge = Some(id);
        }
        Ok(id)
    }
}

/// Read-only view resolving a half-edge's offset geometry against its plan.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdgeView<'a> {
    plan: &'a FloorPlan,
    data: &'a HalfEdgeData,
}

impl<'a> HalfEdgeView<'a> {
    pub(crate) fn new(plan: &'a FloorPlan, id: super::HalfEdgeId) -> Result<Self> {
        Ok(Self {
            plan,
            data: plan.half_edge(id)?,
        })
    }

    #[must_use]
    pub fn data(&self) -> &'a HalfEdgeData {
        self.data
    }

    /// Centerline segment of this half-edge in traversal direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall or one of its corners is gone.
    pub fn segment(&self) -> Result<EdgeSegment> {
        segment_of(self.plan, self.data)
    }

    fn neighbor_segment(&self, id: Option<super::HalfEdgeId>) -> Result<Option<EdgeSegment>> {
        match id {
            Some(id) => Ok(Some(segment_of(self.plan, self.plan.half_edge(id)?)?)),
            None => Ok(None),
        }
    }

    /// Offset point at the start vertex on the interior side.
    ///
    /// # Errors
    ///
    /// Returns an error if this edge or a linked edge no longer resolves.
    pub fn interior_start(&self) -> Result<Point2> {
        let this = self.segment()?;
        let prev = self.neighbor_segment(self.data.prev)?;
        Ok(this.start + half_angle_vector(prev.as_ref(), Some(&this), self.data.offset))
    }

    /// Offset point at the end vertex on the interior side.
    ///
    /// # Errors
    ///
    /// Returns an error if this edge or a linked edge no longer resolves.
    pub fn interior_end(&self) -> Result<Point2> {
        let this = self.segment()?;
        let next = self.neighbor_segment(self.data.next)?;
        Ok(this.end + half_angle_vector(Some(&this), next.as_ref(), self.data.offset))
    }

    /// Offset point at the start vertex on the exterior side.
    ///
    /// # Errors
    ///
    /// Returns an error if this edge or a linked edge no longer resolves.
    pub fn exterior_start(&self) -> Result<Point2> {
        let this = self.segment()?;
        let prev = self.neighbor_segment(self.data.prev)?;
        Ok(this.start - half_angle_vector(prev.as_ref(), Some(&this), self.data.offset))
    }

    /// Offset point at the end vertex on the exterior side.
    ///
    /// # Errors
    ///
    /// Returns an error if this edge or a linked edge no longer resolves.
    pub fn exterior_end(&self) -> Result<Point2> {
        let this = self.segment()?;
        let next = self.neighbor_segment(self.data.next)?;
        Ok(this.end - half_angle_vector(Some(&this), next.as_ref(), self.data.offset))
    }

    /// The wall-face quad: interior start, interior end, exterior end,
    /// exterior start.
    ///
    /// # Errors
    ///
    /// Returns an error if this edge or a linked edge no longer resolves.
    pub fn corners(&self) -> Result<[Point2; 4]> {
        Ok([
            self.interior_start()?,
            self.interior_end()?,
            self.exterior_end()?,
            self.exterior_start()?,
        ])
    }

    /// Length of the interior face.
    ///
    /// # Errors
    ///
    /// Returns an error if this edge or a linked edge no longer resolves.
    pub fn interior_distance(&self) -> Result<f64> {
        let s = self.interior_start()?;
        let e = self.interior_end()?;
        Ok(distance(s.x, s.y, e.x, e.y))
    }

    /// Midpoint of the interior face, used for labels.
    ///
    /// # Errors
    ///
    /// Returns an error if this edge or a linked edge no longer resolves.
    pub fn interior_center(&self) -> Result<Point2> {
        let s = self.interior_start()?;
        let e = self.interior_end()?;
        Ok(Point2::new((s.x + e.x) / 2.0, (s.y + e.y) / 2.0))
    }
}

fn segment_of(plan: &FloorPlan, edge: &HalfEdgeData) -> Result<EdgeSegment> {
    let wall = plan.wall(edge.wall)?;
    let start = plan.corner(wall.start)?.point;
    let end = plan.corner(wall.end)?.point;
    Ok(if edge.front {
        EdgeSegment::new(start, end)
    } else {
        EdgeSegment::new(end, start)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn single_wall() -> (FloorPlan, WallId) {
        let mut plan = FloorPlan::new();
        let a = plan.new_corner(0.0, 0.0, None);
        let b = plan.new_corner(100.0, 0.0, None);
        let w = plan.new_wall(a, b).unwrap();
        (plan, w)
    }

    #[test]
    fn orphan_faces_offset_perpendicular() {
        let (plan, w) = single_wall();
        let wall = plan.wall(w).unwrap();

        let front = plan.half_edge_view(wall.front_edge.unwrap()).unwrap();
        let [is, ie, ee, es] = front.corners().unwrap();
        assert_abs_diff_eq!(is.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(is.y, 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ie.x, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ie.y, 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ee.y, -5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(es.y, -5.0, epsilon = 1e-9);

        let back = plan.half_edge_view(wall.back_edge.unwrap()).unwrap();
        let start = back.interior_start().unwrap();
        assert_abs_diff_eq!(start.x, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(start.y, -5.0, epsilon = 1e-9);
    }

    #[test]
    fn interior_length_and_center() {
        let (plan, w) = single_wall();
        let front = plan.wall(w).unwrap().front_edge.unwrap();
        let view = plan.half_edge_view(front).unwrap();

        assert_abs_diff_eq!(view.interior_distance().unwrap(), 100.0, epsilon = 1e-9);
        let center = view.interior_center().unwrap();
        assert_abs_diff_eq!(center.x, 50.0, epsilon = 1e-9);
        assert_abs_diff_eq!(center.y, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn offset_follows_wall_thickness() {
        let (mut plan, w) = single_wall();
        plan.wall_mut(w).unwrap().thickness = 30.0;
        plan.update();

        let front = plan.wall(w).unwrap().front_edge.unwrap();
        let view = plan.half_edge_view(front).unwrap();
        assert_abs_diff_eq!(view.data().offset, 15.0, epsilon = 1e-12);
        assert_abs_diff_eq!(view.interior_start().unwrap().y, 15.0, epsilon = 1e-9);
    }

    #[test]
    fn keys_go_stale_after_update() {
        let (mut plan, w) = single_wall();
        let before = plan.wall(w).unwrap().front_edge.unwrap();
        plan.update();
        assert!(plan.half_edge(before).is_err());
        assert!(plan.wall(w).unwrap().front_edge.is_some());
    }
}
