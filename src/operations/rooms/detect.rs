use std::collections::HashSet;

use tracing::trace;

use crate::error::Result;
use crate::math::angle_2d::angle_2pi;
use crate::math::polygon_2d::is_clockwise;
use crate::math::Point2;
use crate::topology::{CornerId, FloorPlan};

/// Finds the rooms of the plan: the tightest corner cycles of its planar
/// graph, one per orientation-filtered face.
///
/// For each corner and each of its neighbors a depth-first walk always tries
/// the smallest turn first. Rotations of an already found cycle are dropped
/// and only cycles for which [`is_clockwise`] holds are kept.
pub struct FindRooms {
    corners: Vec<CornerId>,
}

impl FindRooms {
    /// Creates a new `FindRooms` operation over the given corners.
    #[must_use]
    pub fn new(corners: Vec<CornerId>) -> Self {
        Self { corners }
    }

    /// Executes the search. Each room is returned as its cyclic corner list.
    ///
    /// # Errors
    ///
    /// Returns an error if a corner or wall reference is not found.
    pub fn execute(&self, plan: &FloorPlan) -> Result<Vec<Vec<CornerId>>> {
        let mut loops = Vec::new();
        for &first in &self.corners {
            for second in plan.adjacent_corners(first)? {
                loops.push(find_tightest_cycle(plan, first, second)?);
            }
        }

        let unique = remove_duplicate_rooms(loops);
        let mut rooms = Vec::with_capacity(unique.len());
        for cycle in unique {
            let points = cycle
                .iter()
                .map(|&c| plan.corner(c).map(|data| data.point))
                .collect::<Result<Vec<Point2>>>()?;
            if is_clockwise(&points) {
                rooms.push(cycle);
            } else {
                trace!(len = cycle.len(), "dropping counter-clockwise cycle");
            }
        }
        Ok(rooms)
    }
}

struct Frame {
    corner: CornerId,
    previous: Vec<CornerId>,
}

/// Clockwise angle at `current` from the edge back to `previous` to the edge
/// out to `next`, in `[0, 2π)`.
fn turn_angle(plan: &FloorPlan, previous: CornerId, current: CornerId, next: CornerId) -> Result<f64> {
    let p = plan.corner(previous)?.point;
    let c = plan.corner(current)?.point;
    let n = plan.corner(next)?.point;
    Ok(angle_2pi(p.x - c.x, p.y - c.y, n.x - c.x, n.y - c.y))
}

/// Depth-first search for the cycle that leaves `first` towards `second`
/// and keeps taking the tightest turn. Returns an empty list when the walk
/// never gets back to `first`.
///
/// The visited set is shared across branches, so a corner reached on one
/// branch is not revisited on another. `first` may close the cycle from any
/// corner other than `second`.
pub(crate) fn find_tightest_cycle(
    plan: &FloorPlan,
    first: CornerId,
    second: CornerId,
) -> Result<Vec<CornerId>> {
    let mut stack: Vec<Frame> = Vec::new();
    let mut visited = HashSet::from([first]);
    let mut next = Some(Frame {
        corner: second,
        previous: vec![first],
    });

    while let Some(frame) = next {
        let current = frame.corner;
        visited.insert(current);

        if current == first && current != second {
            return Ok(frame.previous);
        }

        let closes_loop = |corner: CornerId| corner == first && current != second;
        let mut candidates = Vec::new();
        for corner in plan.adjacent_corners(current)? {
            if visited.contains(&corner) && !closes_loop(corner) {
                continue;
            }
            candidates.push(corner);
        }

        if candidates.len() > 1 {
            if let Some(&previous) = frame.previous.last() {
                let mut ranked = candidates
                    .iter()
                    .map(|&c| Ok((turn_angle(plan, previous, current, c)?, c)))
                    .collect::<Result<Vec<(f64, CornerId)>>>()?;
                // Widest first, so the tightest turn ends up on top of the stack.
                ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
                candidates = ranked.into_iter().map(|(_, c)| c).collect();
            }
        }

        let mut previous = frame.previous;
        previous.push(current);
        for corner in candidates {
            stack.push(Frame {
                corner,
                previous: previous.clone(),
            });
        }

        next = stack.pop();
    }

    Ok(Vec::new())
}

/// Drops empty cycles and cycles that are rotations of one seen earlier.
pub(crate) fn remove_duplicate_rooms(loops: Vec<Vec<CornerId>>) -> Vec<Vec<CornerId>> {
    let mut seen: HashSet<Vec<CornerId>> = HashSet::new();
    let mut unique = Vec::new();

    for cycle in loops {
        if cycle.is_empty() {
            continue;
        }
        let mut rotation = cycle.clone();
        let mut duplicate = false;
        for _ in 0..cycle.len() {
            if seen.contains(&rotation) {
                duplicate = true;
                break;
            }
            rotation.rotate_left(1);
        }
        if !duplicate {
            seen.insert(rotation);
            unique.push(cycle);
        }
    }

    unique
}
