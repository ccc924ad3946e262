use std::collections::HashSet;

use tracing::warn;

use crate::error::Result;
use crate::math::Point2;
use crate::topology::{CornerId, FloorPlan, HalfEdgeId, RoomData};

/// Builds a room from a cyclic corner list.
///
/// Each consecutive corner pair contributes the front half-edge of the wall
/// running that way, or else the back half-edge of the wall running the
/// other way. The half-edges are linked into a closed ring whose first edge
/// becomes the room's edge pointer.
pub(crate) fn build_room(plan: &mut FloorPlan, corners: Vec<CornerId>) -> Result<RoomData> {
    let edges = link_ring(plan, &corners)?;
    let edge_pointer = edges.first().copied();
    let interior_corners = match edge_pointer {
        Some(first) => collect_interior_corners(plan, first)?,
        None => Vec::new(),
    };

    Ok(RoomData {
        corners,
        interior_corners,
        edge_pointer,
    })
}

fn link_ring(plan: &mut FloorPlan, corners: &[CornerId]) -> Result<Vec<HalfEdgeId>> {
    let mut edges: Vec<HalfEdgeId> = Vec::with_capacity(corners.len());

    for (i, &from) in corners.iter().enumerate() {
        let to = corners[(i + 1) % corners.len()];

        let edge = if let Some(wall) = plan.wall_to(from, to)? {
            plan.add_half_edge(wall, true)?
        } else if let Some(wall) = plan.wall_from(from, to)? {
            plan.add_half_edge(wall, false)?
        } else {
            warn!(
                from = %plan.corner(from)?.id,
                to = %plan.corner(to)?.id,
                "room corners are not connected by a wall"
            );
            continue;
        };

        if let Some(&prev) = edges.last() {
            plan.half_edge_mut(edge)?.prev = Some(prev);
            plan.half_edge_mut(prev)?.next = Some(edge);
        }
        edges.push(edge);
    }

    if let (Some(&first), Some(&last)) = (edges.first(), edges.last()) {
        if edges.len() > 1 {
            plan.half_edge_mut(first)?.prev = Some(last);
            plan.half_edge_mut(last)?.next = Some(first);
        }
    }

    Ok(edges)
}

/// Walks the ring from `start`, collecting each edge's interior start point.
/// Stops when the ring closes, a link is missing or an edge repeats.
fn collect_interior_corners(plan: &FloorPlan, start: HalfEdgeId) -> Result<Vec<Point2>> {
    let mut points = Vec::new();
    let mut visited = HashSet::new();
    let mut edge = Some(start);

    while let Some(id) = edge {
        if !visited.insert(id) {
            break;
        }
        points.push(plan.half_edge_view(id)?.interior_start()?);
        edge = plan.half_edge(id)?.next;
    }

    Ok(points)
}
