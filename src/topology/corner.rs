use tracing::trace;

use crate::error::Result;
use crate::math::distance_2d::distance;
use crate::math::Point2;

use super::wall::WallId;
use super::FloorPlan;

slotmap::new_key_type! {
    /// Unique identifier for a corner in the floor plan.
    pub struct CornerId;
}

/// Data associated with a corner (graph vertex).
#[derive(Debug, Clone)]
pub struct CornerData {
    /// Stable document id.
    pub id: String,
    /// Position in plan coordinates (cm).
    pub point: Point2,
    /// Walls that start at this corner.
    pub wall_starts: Vec<WallId>,
    /// Walls that end at this corner.
    pub wall_ends: Vec<WallId>,
    /// Tombstone flag; purged by [`FloorPlan::clean_up`].
    pub deleted: bool,
}

impl CornerData {
    /// Creates an unconnected corner at the given point.
    #[must_use]
    pub fn new(id: String, point: Point2) -> Self {
        Self {
            id,
            point,
            wall_starts: Vec::new(),
            wall_ends: Vec::new(),
            deleted: false,
        }
    }

    #[must_use]
    pub fn x(&self) -> f64 {
        self.point.x
    }

    #[must_use]
    pub fn y(&self) -> f64 {
        self.point.y
    }

    /// Distance from this corner to `(x, y)`.
    #[must_use]
    pub fn distance_from(&self, x: f64, y: f64) -> f64 {
        distance(x, y, self.point.x, self.point.y)
    }

    fn is_isolated(&self) -> bool {
        self.wall_starts.is_empty() && self.wall_ends.is_empty()
    }
}

/// Which axes a [`FloorPlan::snap_corner_to_axis`] call aligned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisSnap {
    pub x: bool,
    pub y: bool,
}

impl FloorPlan {
    pub(crate) fn attach_start(&mut self, corner: CornerId, wall: WallId) -> Result<()> {
        self.corner_mut(corner)?.wall_starts.push(wall);
        Ok(())
    }

    pub(crate) fn attach_end(&mut self, corner: CornerId, wall: WallId) -> Result<()> {
        self.corner_mut(corner)?.wall_ends.push(wall);
        Ok(())
    }

    /// Removes `wall` from the corner's incidence lists. A corner left with no
    /// walls deletes itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the corner is not found in the plan.
    pub fn detach_wall(&mut self, corner: CornerId, wall: WallId) -> Result<()> {
        let data = self.corner_mut(corner)?;
        data.wall_starts.retain(|&w| w != wall);
        data.wall_ends.retain(|&w| w != wall);
        if data.is_isolated() {
            data.deleted = true;
        }
        Ok(())
    }

    /// Removes every wall incident to the corner, then deletes the corner.
    ///
    /// # Errors
    ///
    /// Returns an error if the corner or one of its walls is not found.
    pub fn remove_corner_all(&mut self, corner: CornerId) -> Result<()> {
        let data = self.corner(corner)?;
        let incident: Vec<WallId> = data
            .wall_starts
            .iter()
            .chain(data.wall_ends.iter())
            .copied()
            .collect();
        for wall in incident {
            if !self.wall(wall)?.deleted {
                self.remove_wall(wall)?;
            }
        }
        self.corner_mut(corner)?.deleted = true;
        Ok(())
    }

    /// Corners one wall away: the end of each starting wall, then the start
    /// of each ending wall.
    ///
    /// # Errors
    ///
    /// Returns an error if the corner or one of its walls is not found.
    pub fn adjacent_corners(&self, corner: CornerId) -> Result<Vec<CornerId>> {
        let data = self.corner(corner)?;
        let mut adjacent = Vec::with_capacity(data.wall_starts.len() + data.wall_ends.len());
        for &wall in &data.wall_starts {
            adjacent.push(self.wall(wall)?.end);
        }
        for &wall in &data.wall_ends {
            adjacent.push(self.wall(wall)?.start);
        }
        Ok(adjacent)
    }

    /// Whether `wall` starts or ends at `corner`.
    ///
    /// # Errors
    ///
    /// Returns an error if the corner is not found in the plan.
    pub fn is_wall_connected(&self, corner: CornerId, wall: WallId) -> Result<bool> {
        let data = self.corner(corner)?;
        Ok(data.wall_starts.contains(&wall) || data.wall_ends.contains(&wall))
    }

    /// The wall running from `from` to `to`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if a corner or wall is not found in the plan.
    pub fn wall_to(&self, from: CornerId, to: CornerId) -> Result<Option<WallId>> {
        for &wall in &self.corner(from)?.wall_starts {
            if self.wall(wall)?.end == to {
                return Ok(Some(wall));
            }
        }
        Ok(None)
    }

    /// The wall ending at `at` that starts from `from`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if a corner or wall is not found in the plan.
    pub fn wall_from(&self, at: CornerId, from: CornerId) -> Result<Option<WallId>> {
        for &wall in &self.corner(at)?.wall_ends {
            if self.wall(wall)?.start == from {
                return Ok(Some(wall));
            }
        }
        Ok(None)
    }

    /// Distance between two corners.
    ///
    /// # Errors
    ///
    /// Returns an error if either corner is not found in the plan.
    pub fn distance_from_corner(&self, corner: CornerId, other: CornerId) -> Result<f64> {
        let p = self.corner(other)?.point;
        Ok(self.corner(corner)?.distance_from(p.x, p.y))
    }

    /// Distance from a corner to the segment of a wall.
    ///
    /// # Errors
    ///
    /// Returns an error if the corner or wall is not found in the plan.
    pub fn distance_from_wall(&self, corner: CornerId, wall: WallId) -> Result<f64> {
        let p = self.corner(corner)?.point;
        self.wall_distance_from(wall, p.x, p.y)
    }

    /// Moves a corner, then fuses it with whatever it now overlaps.
    ///
    /// Returns `true` when the move merged the corner or split a wall.
    ///
    /// # Errors
    ///
    /// Returns an error if the corner is not found or has been deleted.
    pub fn move_corner(&mut self, corner: CornerId, x: f64, y: f64) -> Result<bool> {
        self.live_corner(corner)?;
        self.corner_mut(corner)?.point = Point2::new(x, y);
        self.merge_with_intersected(corner)
    }

    /// Moves a corner by a delta; see [`move_corner`](Self::move_corner).
    ///
    /// # Errors
    ///
    /// Returns an error if the corner is not found or has been deleted.
    pub fn relative_move_corner(&mut self, corner: CornerId, dx: f64, dy: f64) -> Result<bool> {
        let p = self.live_corner(corner)?.point;
        self.move_corner(corner, p.x + dx, p.y + dy)
    }

    /// Aligns the corner with any adjacent corner whose x (or y) differs by
    /// less than `tolerance`. Adjacent corners are visited in
    /// [`adjacent_corners`](Self::adjacent_corners) order; the last one to
    /// snap an axis wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the corner or one of its walls is not found.
    pub fn snap_corner_to_axis(&mut self, corner: CornerId, tolerance: f64) -> Result<AxisSnap> {
        let mut snapped = AxisSnap::default();
        let mut point = self.corner(corner)?.point;

        for neighbor in self.adjacent_corners(corner)? {
            let other = self.corner(neighbor)?.point;
            if (other.x - point.x).abs() < tolerance {
                point.x = other.x;
                snapped.x = true;
            }
            if (other.y - point.y).abs() < tolerance {
                point.y = other.y;
                snapped.y = true;
            }
        }

        if snapped != AxisSnap::default() {
            trace!(x = point.x, y = point.y, "corner snapped to axis");
        }
        self.corner_mut(corner)?.point = point;
        Ok(snapped)
    }
}
