use std::collections::HashSet;

use tracing::debug;

use crate::error::Result;
use crate::math::distance_2d::closest_point_on_line;
use crate::topology::{CornerId, FloorPlan, WallId};

/// Fuses a corner with the first corner or wall it overlaps.
///
/// Corners are checked before walls, each in insertion order, against the
/// plan's `corner_tolerance`:
///
/// 1. A nearby corner is combined into this one (see [`CombineCorners`]).
/// 2. A nearby wall not already attached to this corner is split: the corner
///    snaps onto the wall's closest point, a new wall runs from the corner to
///    the wall's old end, and the wall is shortened to end at the corner.
///    Walls at the corner that now repeat a `(start, end)` pair are removed.
pub struct MergeWithIntersected {
    corner: CornerId,
}

impl MergeWithIntersected {
    /// Creates a new `MergeWithIntersected` operation.
    #[must_use]
    pub fn new(corner: CornerId) -> Self {
        Self { corner }
    }

    /// Executes the merge. Returns `true` when the graph changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the corner is deleted, or if it or an entity it
    /// references is not found.
    pub fn execute(&self, plan: &mut FloorPlan) -> Result<bool> {
        let tolerance = plan.config().corner_tolerance;
        let point = plan.live_corner(self.corner)?.point;

        let near_corner = plan
            .corners()
            .find(|&(id, c)| id != self.corner && c.distance_from(point.x, point.y) < tolerance)
            .map(|(id, _)| id);
        if let Some(other) = near_corner {
            CombineCorners::new(self.corner, other).execute(plan)?;
            return Ok(true);
        }

        for wall in plan.wall_ids() {
            if plan.distance_from_wall(self.corner, wall)? < tolerance
                && !plan.is_wall_connected(self.corner, wall)?
            {
                self.split(plan, wall)?;
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn split(&self, plan: &mut FloorPlan, wall: WallId) -> Result<()> {
        let (start, end, thickness, height) = {
            let data = plan.wall(wall)?;
            (data.start, data.end, data.thickness, data.height)
        };
        let s = plan.corner(start)?.point;
        let e = plan.corner(end)?.point;
        let p = plan.corner(self.corner)?.point;
        plan.corner_mut(self.corner)?.point = closest_point_on_line(p.x, p.y, s.x, s.y, e.x, e.y);

        // The tail piece keeps the split wall's dimensions.
        let tail = plan.insert_wall(self.corner, end, None, thickness, height, Vec::new())?;
        plan.set_wall_end(wall, self.corner)?;
        let removed = remove_duplicate_walls(plan, self.corner)?;
        plan.update();

        debug!(
            wall = %plan.wall(wall)?.id,
            tail = %plan.wall(tail)?.id,
            removed,
            "split wall at corner"
        );
        Ok(())
    }
}

/// Absorbs `source` into `target`.
///
/// The target takes the source's position and every wall of the source is
/// re-pointed onto the target. The source is then deleted, and zero-length or
/// duplicated walls around the target are removed.
pub struct CombineCorners {
    target: CornerId,
    source: CornerId,
}

impl CombineCorners {
    /// Creates a new `CombineCorners` operation.
    #[must_use]
    pub fn new(target: CornerId, source: CornerId) -> Self {
        Self { target, source }
    }

    /// Executes the combination and recomputes rooms.
    ///
    /// # Errors
    ///
    /// Returns an error if either corner is deleted, or if a corner or one
    /// of their walls is not found.
    pub fn execute(&self, plan: &mut FloorPlan) -> Result<()> {
        plan.live_corner(self.target)?;
        let (point, starts, ends) = {
            let source = plan.live_corner(self.source)?;
            (source.point, source.wall_starts.clone(), source.wall_ends.clone())
        };
        plan.corner_mut(self.target)?.point = point;

        for &wall in starts.iter().rev() {
            plan.set_wall_start(wall, self.target)?;
        }
        for &wall in ends.iter().rev() {
            plan.set_wall_end(wall, self.target)?;
        }

        plan.remove_corner_all(self.source)?;
        let removed = remove_duplicate_walls(plan, self.target)?;
        plan.update();

        debug!(
            target = %plan.corner(self.target)?.id,
            source = %plan.corner(self.source)?.id,
            removed,
            "combined corners"
        );
        Ok(())
    }
}

/// Removes zero-length walls at `corner` and walls that repeat another
/// wall's `(start, end)` pair. Later walls in each incidence list go first.
///
/// Returns the number of walls removed.
fn remove_duplicate_walls(plan: &mut FloorPlan, corner: CornerId) -> Result<usize> {
    let mut removed = 0;

    let starts = plan.corner(corner)?.wall_starts.clone();
    let mut ends_seen = HashSet::new();
    for &wall in starts.iter().rev() {
        let data = plan.wall(wall)?;
        if data.deleted {
            continue;
        }
        let end = data.end;
        if end == corner || !ends_seen.insert(end) {
            plan.remove_wall(wall)?;
            removed += 1;
        }
    }

    let ends = plan.corner(corner)?.wall_ends.clone();
    let mut starts_seen = HashSet::new();
    for &wall in ends.iter().rev() {
        let data = plan.wall(wall)?;
        if data.deleted {
            continue;
        }
        let start = data.start;
        if start == corner || !starts_seen.insert(start) {
            plan.remove_wall(wall)?;
            removed += 1;
        }
    }

    Ok(removed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;

    #[test]
    fn nearby_corner_is_absorbed() {
        let mut plan = FloorPlan::new();
        let a = plan.new_corner(0.0, 0.0, None);
        let b = plan.new_corner(100.0, 0.0, None);
        let c = plan.new_corner(200.0, 50.0, None);
        let n = plan.new_corner(200.0, 200.0, None);
        let ab = plan.new_wall(a, b).unwrap();
        let cn = plan.new_wall(c, n).unwrap();
        assert_eq!(plan.corner_count(), 4);

        let merged = plan.move_corner(n, 110.0, 5.0).unwrap();
        assert!(merged);
        assert_eq!(plan.corner_count(), 3);
        assert_eq!(plan.wall_count(), 2);
        assert!(plan.corner(b).unwrap().deleted);
        assert!((plan.corner(n).unwrap().point - Point2::new(100.0, 0.0)).norm() < 1e-12);

        // `a → b` now ends at `n`.
        assert_eq!(plan.wall(ab).unwrap().end, n);
        assert_eq!(plan.wall(cn).unwrap().end, n);
        assert_eq!(plan.wall_to(a, n).unwrap(), Some(ab));
        assert_eq!(plan.corner(n).unwrap().wall_ends.len(), 2);
    }

    #[test]
    fn corner_near_wall_splits_it() {
        let mut plan = FloorPlan::new();
        let a = plan.new_corner(0.0, 0.0, None);
        let b = plan.new_corner(100.0, 0.0, None);
        let c = plan.new_corner(50.0, 200.0, None);
        let n = plan.new_corner(50.0, 100.0, None);
        let ab = plan.new_wall(a, b).unwrap();
        plan.new_wall(c, n).unwrap();
        plan.wall_mut(ab).unwrap().thickness = 24.0;

        let merged = plan.move_corner(n, 50.0, 8.0).unwrap();
        assert!(merged);
        assert_eq!(plan.wall_count(), 3);
        assert_eq!(plan.corner_count(), 4);

        let p = plan.corner(n).unwrap().point;
        assert!((p - Point2::new(50.0, 0.0)).norm() < 1e-12);
        assert_eq!(plan.wall(ab).unwrap().end, n);

        let tail = plan.wall_to(n, b).unwrap().unwrap();
        assert!((plan.wall(tail).unwrap().thickness - 24.0).abs() < 1e-12);
        assert_eq!(plan.adjacent_corners(n).unwrap(), vec![b, c, a]);
    }

    #[test]
    fn split_does_not_duplicate_an_existing_wall() {
        let mut plan = FloorPlan::new();
        let a = plan.new_corner(0.0, 0.0, None);
        let b = plan.new_corner(100.0, 0.0, None);
        let n = plan.new_corner(50.0, 40.0, None);
        let ab = plan.new_wall(a, b).unwrap();
        let nb = plan.new_wall(n, b).unwrap();

        // `n` lands on `a → b` and already has a wall to `b`.
        assert!(plan.move_corner(n, 50.0, 10.0).unwrap());
        assert_eq!(plan.wall_count(), 2);
        assert_eq!(plan.corner_count(), 3);
        assert_eq!(plan.wall(ab).unwrap().end, n);

        let to_b: Vec<_> = plan
            .walls()
            .filter(|(_, w)| w.start == n && w.end == b)
            .map(|(id, _)| id)
            .collect();
        assert_eq!(to_b.len(), 1);
        assert!(plan.wall(nb).unwrap().deleted);
        assert_eq!(plan.corner(b).unwrap().wall_ends, to_b);

        let ids: HashSet<_> = plan.walls().map(|(_, w)| w.id.clone()).collect();
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn deleted_corners_cannot_be_combined() {
        let mut plan = FloorPlan::new();
        let a = plan.new_corner(0.0, 0.0, None);
        let b = plan.new_corner(100.0, 0.0, None);
        let c = plan.new_corner(300.0, 0.0, None);
        let d = plan.new_corner(300.0, 100.0, None);
        let ab = plan.new_wall(a, b).unwrap();
        let cd = plan.new_wall(c, d).unwrap();
        plan.remove_wall(ab).unwrap();
        assert!(plan.corner(a).unwrap().deleted);

        assert!(CombineCorners::new(a, c).execute(&mut plan).is_err());
        assert!(CombineCorners::new(c, a).execute(&mut plan).is_err());
        assert!(MergeWithIntersected::new(a).execute(&mut plan).is_err());

        assert_eq!(plan.wall(cd).unwrap().start, c);
        assert!(!plan.corner(c).unwrap().deleted);
        assert_eq!(plan.corner(c).unwrap().point, Point2::new(300.0, 0.0));
    }

    #[test]
    fn merge_removes_duplicate_walls() {
        let mut plan = FloorPlan::new();
        let a = plan.new_corner(0.0, 0.0, None);
        let b = plan.new_corner(100.0, 0.0, None);
        let c = plan.new_corner(0.0, 100.0, None);
        let ab = plan.new_wall(a, b).unwrap();
        let cb = plan.new_wall(c, b).unwrap();

        plan.move_corner(c, 5.0, 5.0).unwrap();
        assert_eq!(plan.wall_count(), 1);
        assert_eq!(plan.corner_count(), 2);
        // The re-pointed wall was visited first and survives.
        assert!(!plan.wall(ab).unwrap().deleted);
        assert!(plan.wall(cb).unwrap().deleted);
        assert_eq!(plan.wall_to(c, b).unwrap(), Some(ab));
        assert_eq!(plan.corner(b).unwrap().wall_ends, vec![ab]);
    }

    #[test]
    fn merging_wall_endpoints_removes_zero_length_wall() {
        let mut plan = FloorPlan::new();
        let a = plan.new_corner(0.0, 0.0, None);
        let b = plan.new_corner(100.0, 0.0, None);
        let c = plan.new_corner(100.0, 100.0, None);
        let ab = plan.new_wall(a, b).unwrap();
        let bc = plan.new_wall(b, c).unwrap();

        // Pull `c` onto `b`: `b → c` collapses.
        plan.move_corner(c, 100.0, 10.0).unwrap();
        assert!(plan.wall(bc).unwrap().deleted);
        assert!(!plan.wall(ab).unwrap().deleted);
        assert_eq!(plan.wall(ab).unwrap().end, c);
        assert_eq!(plan.wall_count(), 1);
        assert!(plan.corner(b).unwrap().deleted);
    }

    #[test]
    fn closing_a_loop_creates_a_room() {
        let mut plan = FloorPlan::new();
        let a = plan.new_corner(0.0, 0.0, None);
        let b = plan.new_corner(100.0, 0.0, None);
        let c = plan.new_corner(100.0, 100.0, None);
        let d = plan.new_corner(0.0, 100.0, None);
        let e = plan.new_corner(0.0, 30.0, None);
        plan.new_wall(a, b).unwrap();
        plan.new_wall(b, c).unwrap();
        plan.new_wall(c, d).unwrap();
        plan.new_wall(d, e).unwrap();
        assert!(plan.rooms().is_empty());

        assert!(plan.move_corner(e, 3.0, 3.0).unwrap());
        assert_eq!(plan.corner_count(), 4);
        assert_eq!(plan.rooms().len(), 1);
        assert_eq!(plan.rooms()[0].corners.len(), 4);
    }

    #[test]
    fn distant_corner_does_not_merge() {
        let mut plan = FloorPlan::new();
        let a = plan.new_corner(0.0, 0.0, None);
        let b = plan.new_corner(100.0, 0.0, None);
        let n = plan.new_corner(50.0, 60.0, None);
        plan.new_wall(a, b).unwrap();

        assert!(!MergeWithIntersected::new(n).execute(&mut plan).unwrap());
        assert_eq!(plan.wall_count(), 1);
        assert_eq!(plan.corner_count(), 3);
    }
}
