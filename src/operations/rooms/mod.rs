mod dcel;
mod detect;

pub use detect::FindRooms;

use tracing::{debug, warn};

use crate::error::Result;
use crate::topology::FloorPlan;

/// Re-derives rooms and half-edges from the current corner/wall graph.
///
/// Runs in four passes:
///
/// 1. Every wall drops its half-edges and orphan flag; the half-edge arena is
///    cleared.
/// 2. [`FindRooms`] runs over the live corners.
/// 3. Each cycle becomes a room with a linked half-edge ring.
/// 4. Walls bounded by no room become orphans with a back and a front
///    half-edge; walls bounded on one side only get the missing side.
pub struct RebuildRooms;

impl RebuildRooms {
    /// Creates a new `RebuildRooms` operation.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the rebuild.
    ///
    /// Failures while resolving a room leave the plan with fewer rooms; the
    /// error is logged rather than returned.
    pub fn execute(&self, plan: &mut FloorPlan) {
        for wall in plan.walls.values_mut() {
            wall.reset_front_back();
        }
        plan.half_edges.clear();
        plan.rooms.clear();

        let cycles = match FindRooms::new(plan.corner_ids()).execute(plan) {
            Ok(cycles) => cycles,
            Err(err) => {
                warn!(%err, "room detection failed");
                Vec::new()
            }
        };

        for corners in cycles {
            match dcel::build_room(plan, corners) {
                Ok(room) => plan.rooms.push(room),
                Err(err) => warn!(%err, "skipping room"),
            }
        }

        match assign_orphan_edges(plan) {
            Ok(orphans) => debug!(
                rooms = plan.rooms.len(),
                walls = plan.wall_count(),
                orphans,
                "rebuilt rooms"
            ),
            Err(err) => warn!(%err, "failed to assign orphan edges"),
        }
    }
}

impl Default for RebuildRooms {
    fn default() -> Self {
        Self::new()
    }
}

fn assign_orphan_edges(plan: &mut FloorPlan) -> Result<usize> {
    let mut orphans = 0;
    for wall in plan.wall_ids() {
        let (front, back) = {
            let data = plan.wall(wall)?;
            (data.front_edge, data.back_edge)
        };
        match (front, back) {
            (None, None) => {
                plan.wall_mut(wall)?.orphan = true;
                plan.add_half_edge(wall, false)?;
                plan.add_half_edge(wall, true)?;
                orphans += 1;
            }
            (Some(_), None) => {
                plan.add_half_edge(wall, false)?;
            }
            (None, Some(_)) => {
                plan.add_half_edge(wall, true)?;
            }
            (Some(_), Some(_)) => {}
        }
    }
    Ok(orphans)
}
