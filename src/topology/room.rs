use std::collections::HashSet;

use crate::error::{Result, TopologyError};
use crate::math::Point2;

use super::corner::CornerId;
use super::half_edge::HalfEdgeId;
use super::FloorPlan;

/// A room: a closed cycle of corners bounded by a ring of half-edges.
///
/// Rooms are rebuilt from scratch by every [`FloorPlan::update`].
#[derive(Debug, Clone, PartialEq)]
pub struct RoomData {
    /// Cyclic corner list; the last corner connects back to the first.
    pub corners: Vec<CornerId>,
    /// Interior start point of each half-edge in ring order.
    pub interior_corners: Vec<Point2>,
    /// First half-edge of the ring.
    pub edge_pointer: Option<HalfEdgeId>,
}

impl FloorPlan {
    /// Returns the room at `index`, in detection order.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no room at `index`.
    pub fn room(&self, index: usize) -> Result<&RoomData> {
        self.rooms
            .get(index)
            .ok_or_else(|| TopologyError::EntityNotFound("room".into()).into())
    }

    /// Centerline polygon of a room.
    ///
    /// # Errors
    ///
    /// Returns an error if the room or one of its corners is not found.
    pub fn room_polygon(&self, index: usize) -> Result<Vec<Point2>> {
        self.room(index)?
            .corners
            .iter()
            .map(|&c| self.corner(c).map(|data| data.point))
            .collect()
    }

    /// Half-edges of a room's ring, starting at its edge pointer.
    ///
    /// # Errors
    ///
    /// Returns an error if the room or a linked half-edge is not found.
    pub fn room_edges(&self, index: usize) -> Result<Vec<HalfEdgeId>> {
        let mut edges = Vec::new();
        let mut seen = HashSet::new();
        let mut edge = self.room(index)?.edge_pointer;
        while let Some(id) = edge {
            if !seen.insert(id) {
                break;
            }
            edges.push(id);
            edge = self.half_edge(id)?.next;
        }
        Ok(edges)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::polygon_2d::is_clockwise;

    #[test]
    fn room_accessors_follow_the_ring() {
        let mut plan = FloorPlan::new();
        let a = plan.new_corner(0.0, 0.0, None);
        let b = plan.new_corner(300.0, 0.0, None);
        let c = plan.new_corner(300.0, 200.0, None);
        plan.new_wall(a, b).unwrap();
        plan.new_wall(b, c).unwrap();
        plan.new_wall(c, a).unwrap();

        assert_eq!(plan.rooms().len(), 1);
        let polygon = plan.room_polygon(0).unwrap();
        assert_eq!(polygon.len(), 3);
        assert!(is_clockwise(&polygon));

        let edges = plan.room_edges(0).unwrap();
        assert_eq!(edges.len(), 3);
        assert_eq!(Some(edges[0]), plan.room(0).unwrap().edge_pointer);
        for pair in edges.windows(2) {
            assert_eq!(plan.half_edge(pair[0]).unwrap().next, Some(pair[1]));
        }
    }

    #[test]
    fn missing_room_is_an_error() {
        let plan = FloorPlan::new();
        assert!(plan.room(0).is_err());
        assert!(plan.room_polygon(0).is_err());
    }
}
