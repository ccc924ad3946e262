//! Headless editing state machine.
//!
//! An [`EditSession`] turns world-space pointer events into plan edits for
//! the three designer modes. It holds no geometry of its own; every edit goes
//! through the [`FloorPlan`] passed to each event.

use tracing::debug;

use crate::error::Result;
use crate::math::Point2;
use crate::topology::{CornerId, FloorPlan, WallId};

/// The active editing tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DesignerMode {
    /// Clicks place corners and chain walls between them.
    #[default]
    Draw,
    /// Dragging moves the hovered corner or wall.
    Move,
    /// Clicking removes the hovered corner or wall.
    Delete,
}

/// Pointer-driven editing session over a [`FloorPlan`].
#[derive(Debug, Clone)]
pub struct EditSession {
    mode: DesignerMode,
    pressed: bool,
    moved: bool,
    pointer: Point2,
    /// Pointer position at the last press, or the last wall-drag step.
    anchor: Point2,
    /// Snapped pointer position where the next corner would land.
    target: Point2,
    last_node: Option<CornerId>,
    active_corner: Option<CornerId>,
    active_wall: Option<WallId>,
}

impl EditSession {
    /// Creates a session in [`DesignerMode::Draw`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: DesignerMode::Draw,
            pressed: false,
            moved: false,
            pointer: Point2::origin(),
            anchor: Point2::origin(),
            target: Point2::origin(),
            last_node: None,
            active_corner: None,
            active_wall: None,
        }
    }

    #[must_use]
    pub fn mode(&self) -> DesignerMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: DesignerMode) {
        if mode != self.mode {
            debug!(from = ?self.mode, to = ?mode, "designer mode changed");
        }
        self.mode = mode;
    }

    #[must_use]
    pub fn target(&self) -> Point2 {
        self.target
    }

    #[must_use]
    pub fn last_node(&self) -> Option<CornerId> {
        self.last_node
    }

    #[must_use]
    pub fn active_corner(&self) -> Option<CornerId> {
        self.active_corner
    }

    #[must_use]
    pub fn active_wall(&self) -> Option<WallId> {
        self.active_wall
    }

    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Segment from the last placed corner to the target, while drawing.
    #[must_use]
    pub fn preview_segment(&self, plan: &FloorPlan) -> Option<(Point2, Point2)> {
        if self.mode != DesignerMode::Draw || !self.moved {
            return None;
        }
        let last = plan.corner(self.last_node?).ok()?;
        Some((last.point, self.target))
    }

    /// Handles pointer movement to world position `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns an error if a dragged corner or wall is no longer in the plan.
    pub fn pointer_moved(&mut self, plan: &mut FloorPlan, x: f64, y: f64) -> Result<()> {
        self.moved = true;
        self.pointer = Point2::new(x, y);

        if self.mode == DesignerMode::Draw || (self.mode == DesignerMode::Move && self.pressed) {
            self.update_target(plan);
        }

        if self.mode != DesignerMode::Draw && !self.pressed {
            // Corners take precedence over walls.
            self.active_corner = plan.overlapped_corner(x, y, None);
            self.active_wall = match self.active_corner {
                Some(_) => None,
                None => plan.overlapped_wall(x, y, None),
            };
        }

        if self.mode == DesignerMode::Move && self.pressed {
            self.forget_stale(plan);
            let tolerance = plan.config().snap_tolerance;
            if let Some(corner) = self.active_corner {
                plan.move_corner(corner, x, y)?;
                if plan.live_corner(corner).is_ok() {
                    plan.snap_corner_to_axis(corner, tolerance)?;
                } else {
                    debug!("dragged corner merged away");
                    self.active_corner = None;
                }
            } else if let Some(wall) = self.active_wall {
                let delta = self.pointer - self.anchor;
                plan.relative_move_wall(wall, delta.x, delta.y)?;
                if plan.live_wall(wall).is_ok() {
                    plan.snap_wall_to_axis(wall, tolerance)?;
                } else {
                    debug!("dragged wall collapsed");
                    self.active_wall = None;
                }
                self.anchor = self.pointer;
            }
        }

        Ok(())
    }

    /// Handles a pointer press at the current position.
    ///
    /// # Errors
    ///
    /// Returns an error if the hovered corner or wall is no longer in the plan.
    pub fn press(&mut self, plan: &mut FloorPlan) -> Result<()> {
        self.pressed = true;
        self.moved = false;
        self.anchor = self.pointer;

        if self.mode == DesignerMode::Delete {
            if let Some(corner) = self.active_corner.take() {
                debug!(corner = %plan.corner(corner)?.id, "deleting corner");
                plan.remove_corner_all(corner)?;
            } else if let Some(wall) = self.active_wall.take() {
                debug!(wall = %plan.wall(wall)?.id, "deleting wall");
                plan.remove_wall(wall)?;
            } else {
                self.set_mode(DesignerMode::Move);
            }
            plan.clean_up();
            self.forget_stale(plan);
        }

        Ok(())
    }

    /// Handles a pointer release.
    ///
    /// In draw mode a click without movement places a corner at the target
    /// and connects it to the previous one. A click that merges into existing
    /// geometry ends the chain and switches to move mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the previous corner of the chain is gone.
    pub fn release(&mut self, plan: &mut FloorPlan) -> Result<()> {
        self.pressed = false;

        if self.mode == DesignerMode::Draw && !self.moved {
            let corner = plan.new_corner(self.target.x, self.target.y, None);
            if let Some(last) = self.last_node {
                plan.new_wall(last, corner)?;
            }
            if plan.merge_with_intersected(corner)? && self.last_node.is_some() {
                self.set_mode(DesignerMode::Move);
                self.last_node = None;
            } else {
                self.last_node = Some(corner);
            }
        }

        plan.clean_up();
        self.forget_stale(plan);
        Ok(())
    }

    /// Pointer left the canvas: drops the press without committing anything.
    pub fn cancel(&mut self) {
        self.pressed = false;
        self.moved = false;
    }

    /// Ends the current wall chain and switches to move mode.
    pub fn escape(&mut self) {
        self.set_mode(DesignerMode::Move);
        self.last_node = None;
    }

    fn update_target(&mut self, plan: &FloorPlan) {
        let tolerance = plan.config().snap_tolerance;
        let anchor = match (self.mode, self.last_node) {
            (DesignerMode::Draw, Some(last)) => plan.corner(last).ok().map(|c| c.point),
            _ => None,
        };

        self.target = self.pointer;
        if let Some(last) = anchor {
            if (self.pointer.x - last.x).abs() < tolerance {
                self.target.x = last.x;
            }
            if (self.pointer.y - last.y).abs() < tolerance {
                self.target.y = last.y;
            }
        }
    }

    /// Drops references to entities that were deleted or purged.
    fn forget_stale(&mut self, plan: &FloorPlan) {
        let live_corner = |c: &CornerId| plan.live_corner(*c).is_ok();
        let live_wall = |w: &WallId| plan.live_wall(*w).is_ok();
        self.last_node = self.last_node.filter(live_corner);
        self.active_corner = self.active_corner.filter(live_corner);
        self.active_wall = self.active_wall.filter(live_wall);
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}
