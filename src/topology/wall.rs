use crate::error::Result;
use crate::math::distance_2d::point_distance_from_line;

use super::corner::CornerId;
use super::half_edge::HalfEdgeId;
use super::FloorPlan;

slotmap::new_key_type! {
    /// Unique identifier for a wall in the floor plan.
    pub struct WallId;
}

/// Data associated with a wall (directed graph edge).
///
/// The front side is the plane seen walking from `start` to `end`; the back
/// side is seen walking from `end` to `start`.
#[derive(Debug, Clone)]
pub struct WallData {
    /// Document id, fixed at creation as `"<start id>,<end id>"`.
    pub id: String,
    pub start: CornerId,
    pub end: CornerId,
    pub thickness: f64,
    pub height: f64,
    /// Attached items, carried through documents untouched.
    pub items: Vec<serde_json::Value>,
    /// Derived front half-edge, set by the last update.
    pub front_edge: Option<HalfEdgeId>,
    /// Derived back half-edge, set by the last update.
    pub back_edge: Option<HalfEdgeId>,
    /// Set when no room bounds this wall on either side.
    pub orphan: bool,
    /// Tombstone flag; purged by [`FloorPlan::clean_up`].
    pub deleted: bool,
}

impl WallData {
    /// Clears derived half-edges and the orphan flag ahead of an update.
    pub fn reset_front_back(&mut self) {
        self.front_edge = None;
        self.back_edge = None;
        self.orphan = false;
    }
}

pub(crate) fn generate_id(start: &str, end: &str) -> String {
    format!("{start},{end}")
}

impl FloorPlan {
    /// Detaches a wall from both corners and marks it deleted.
    ///
    /// Corners left without walls delete themselves.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall or one of its corners is not found.
    pub fn remove_wall(&mut self, wall: WallId) -> Result<()> {
        let (start, end) = {
            let data = self.wall(wall)?;
            (data.start, data.end)
        };
        self.detach_wall(start, wall)?;
        self.detach_wall(end, wall)?;
        self.wall_mut(wall)?.deleted = true;
        Ok(())
    }

    /// Re-points the wall's start onto `corner`.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall or either corner is not found.
    pub fn set_wall_start(&mut self, wall: WallId, corner: CornerId) -> Result<()> {
        let old = self.wall(wall)?.start;
        if old == corner {
            return Ok(());
        }
        self.corner(corner)?;
        self.detach_wall(old, wall)?;
        self.attach_start(corner, wall)?;
        self.wall_mut(wall)?.start = corner;
        Ok(())
    }

    /// Re-points the wall's end onto `corner`.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall or either corner is not found.
    pub fn set_wall_end(&mut self, wall: WallId, corner: CornerId) -> Result<()> {
        let old = self.wall(wall)?.end;
        if old == corner {
            return Ok(());
        }
        self.corner(corner)?;
        self.detach_wall(old, wall)?;
        self.attach_end(corner, wall)?;
        self.wall_mut(wall)?.end = corner;
        Ok(())
    }

    /// Distance from `(x, y)` to the wall's centerline segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall or one of its corners is not found.
    pub fn wall_distance_from(&self, wall: WallId, x: f64, y: f64) -> Result<f64> {
        let data = self.wall(wall)?;
        let s = self.corner(data.start)?.point;
        let e = self.corner(data.end)?.point;
        Ok(point_distance_from_line(x, y, s.x, s.y, e.x, e.y))
    }

    /// Drags a whole wall: moves its start, then its end, each of which may
    /// merge into nearby geometry.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall is deleted, or if it or one of its corners
    /// is not found.
    pub fn relative_move_wall(&mut self, wall: WallId, dx: f64, dy: f64) -> Result<()> {
        let start = self.live_wall(wall)?.start;
        self.relative_move_corner(start, dx, dy)?;
        // The start merged into the end and the wall collapsed.
        if self.wall(wall)?.deleted {
            return Ok(());
        }
        let end = self.wall(wall)?.end;
        self.relative_move_corner(end, dx, dy)?;
        Ok(())
    }

    /// Axis-snaps the start corner, then the end corner. The end sees the
    /// start's snapped position.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall or one of its corners is not found.
    pub fn snap_wall_to_axis(&mut self, wall: WallId, tolerance: f64) -> Result<()> {
        let start = self.wall(wall)?.start;
        self.snap_corner_to_axis(start, tolerance)?;
        let end = self.wall(wall)?.end;
        self.snap_corner_to_axis(end, tolerance)?;
        Ok(())
    }
}
