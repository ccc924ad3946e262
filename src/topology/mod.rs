pub mod corner;
pub mod half_edge;
pub mod room;
pub mod wall;

pub use corner::{AxisSnap, CornerData, CornerId};
pub use half_edge::{HalfEdgeData, HalfEdgeId, HalfEdgeView};
pub use room::RoomData;
pub use wall::{WallData, WallId};

use slotmap::SlotMap;
use tracing::debug;

use crate::config::PlanConfig;
use crate::error::{Result, TopologyError};
use crate::math::Point2;
use crate::operations::merge::MergeWithIntersected;
use crate::operations::rooms::RebuildRooms;

/// Central arena that owns every corner, wall and derived half-edge of a plan.
///
/// Entities reference each other via typed IDs (generational indices), so the
/// corner/wall back-references never form ownership cycles. Rooms and
/// half-edges are views recomputed by [`FloorPlan::update`]; half-edge keys
/// from an earlier pass go stale rather than dangling.
///
/// The plan is single-threaded by contract: every mutation takes `&mut self`
/// and runs to completion, so edits must be serialized by the caller.
#[derive(Debug)]
pub struct FloorPlan {
    pub(crate) id: String,
    pub(crate) config: PlanConfig,
    pub(crate) corners: SlotMap<CornerId, CornerData>,
    pub(crate) walls: SlotMap<WallId, WallData>,
    pub(crate) half_edges: SlotMap<HalfEdgeId, HalfEdgeData>,
    pub(crate) rooms: Vec<RoomData>,
    /// Insertion order of corners. Merge and hit-test scans follow it.
    pub(crate) corner_order: Vec<CornerId>,
    /// Insertion order of walls.
    pub(crate) wall_order: Vec<WallId>,
}

impl Default for FloorPlan {
    fn default() -> Self {
        Self::new()
    }
}

impl FloorPlan {
    /// Creates an empty plan with a random id and default config.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(PlanConfig::default())
    }

    /// Creates an empty plan with the given tolerances and wall defaults.
    #[must_use]
    pub fn with_config(config: PlanConfig) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), config)
    }

    pub(crate) fn with_id(id: String, config: PlanConfig) -> Self {
        Self {
            id,
            config,
            corners: SlotMap::with_key(),
            walls: SlotMap::with_key(),
            half_edges: SlotMap::with_key(),
            rooms: Vec::new(),
            corner_order: Vec::new(),
            wall_order: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    // --- Corner access ---

    /// Returns a reference to the corner data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the plan.
    pub fn corner(&self, id: CornerId) -> Result<&CornerData> {
        self.corners
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("corner".into()).into())
    }

    /// Returns a mutable reference to the corner data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the plan.
    pub(crate) fn corner_mut(&mut self, id: CornerId) -> Result<&mut CornerData> {
        self.corners
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("corner".into()).into())
    }

    /// Like [`corner`](Self::corner), but a tombstoned corner is not found.
    ///
    /// Edits that move or merge a corner go through this accessor.
    ///
    /// # Errors
    ///
    /// Returns an error if the corner is unknown or deleted.
    pub fn live_corner(&self, id: CornerId) -> Result<&CornerData> {
        self.corners
            .get(id)
            .filter(|c| !c.deleted)
            .ok_or_else(|| TopologyError::EntityNotFound("corner".into()).into())
    }

    /// Live corners in insertion order.
    pub fn corners(&self) -> impl Iterator<Item = (CornerId, &CornerData)> + '_ {
        self.corner_order
            .iter()
            .filter_map(|&id| self.corners.get(id).map(|c| (id, c)))
            .filter(|(_, c)| !c.deleted)
    }

    /// Ids of the live corners in insertion order.
    #[must_use]
    pub fn corner_ids(&self) -> Vec<CornerId> {
        self.corners().map(|(id, _)| id).collect()
    }

    #[must_use]
    pub fn corner_count(&self) -> usize {
        self.corners().count()
    }

    // --- Wall access ---

    /// Returns a reference to the wall data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the plan.
    pub fn wall(&self, id: WallId) -> Result<&WallData> {
        self.walls
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("wall".into()).into())
    }

    /// Returns a mutable reference to the wall data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the plan.
    pub(crate) fn wall_mut(&mut self, id: WallId) -> Result<&mut WallData> {
        self.walls
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("wall".into()).into())
    }

    /// Like [`wall`](Self::wall), but a tombstoned wall is not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall is unknown or deleted.
    pub fn live_wall(&self, id: WallId) -> Result<&WallData> {
        self.walls
            .get(id)
            .filter(|w| !w.deleted)
            .ok_or_else(|| TopologyError::EntityNotFound("wall".into()).into())
    }

    /// Live walls in insertion order.
    pub fn walls(&self) -> impl Iterator<Item = (WallId, &WallData)> + '_ {
        self.wall_order
            .iter()
            .filter_map(|&id| self.walls.get(id).map(|w| (id, w)))
            .filter(|(_, w)| !w.deleted)
    }

    /// Ids of the live walls in insertion order.
    #[must_use]
    pub fn wall_ids(&self) -> Vec<WallId> {
        self.walls().map(|(id, _)| id).collect()
    }

    #[must_use]
    pub fn wall_count(&self) -> usize {
        self.walls().count()
    }

    // --- Derived state ---

    /// Returns a reference to the half-edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or predates the last update.
    pub fn half_edge(&self, id: HalfEdgeId) -> Result<&HalfEdgeData> {
        self.half_edges
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("half-edge".into()).into())
    }

    pub(crate) fn half_edge_mut(&mut self, id: HalfEdgeId) -> Result<&mut HalfEdgeData> {
        self.half_edges
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("half-edge".into()).into())
    }

    /// Returns an offset-geometry view of a half-edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or predates the last update.
    pub fn half_edge_view(&self, id: HalfEdgeId) -> Result<HalfEdgeView<'_>> {
        HalfEdgeView::new(self, id)
    }

    /// Rooms found by the last [`update`](Self::update).
    #[must_use]
    pub fn rooms(&self) -> &[RoomData] {
        &self.rooms
    }

    // --- Structural edits ---

    /// Adds a corner without checking for merges.
    ///
    /// When `id` is `None` a random UUID is assigned.
    pub fn new_corner(&mut self, x: f64, y: f64, id: Option<String>) -> CornerId {
        let name = id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let corner = self.corners.insert(CornerData::new(name, Point2::new(x, y)));
        self.corner_order.push(corner);
        corner
    }

    /// Creates a wall from `start` to `end` and recomputes rooms.
    ///
    /// # Errors
    ///
    /// Returns an error if either corner is not owned by this plan.
    pub fn new_wall(&mut self, start: CornerId, end: CornerId) -> Result<WallId> {
        let (thickness, height) = (self.config.wall_thickness, self.config.wall_height);
        let wall = self.insert_wall(start, end, None, thickness, height, Vec::new())?;
        self.update();
        Ok(wall)
    }

    /// Creates a wall and registers it on both corners' incidence lists.
    pub(crate) fn insert_wall(
        &mut self,
        start: CornerId,
        end: CornerId,
        id: Option<String>,
        thickness: f64,
        height: f64,
        items: Vec<serde_json::Value>,
    ) -> Result<WallId> {
        // Both endpoints must exist before anything is attached.
        let generated = wall::generate_id(&self.corner(start)?.id, &self.corner(end)?.id);
        let name = id.unwrap_or(generated);

        let wall = self.walls.insert(WallData {
            id: name,
            start,
            end,
            thickness,
            height,
            items,
            front_edge: None,
            back_edge: None,
            orphan: false,
            deleted: false,
        });
        self.wall_order.push(wall);
        self.attach_start(start, wall)?;
        self.attach_end(end, wall)?;
        Ok(wall)
    }

    /// First live corner within `tolerance` of `(x, y)`; defaults to the
    /// configured hit tolerance.
    #[must_use]
    pub fn overlapped_corner(&self, x: f64, y: f64, tolerance: Option<f64>) -> Option<CornerId> {
        let tolerance = tolerance.unwrap_or(self.config.hit_tolerance);
        self.corners()
            .find(|(_, c)| c.distance_from(x, y) < tolerance)
            .map(|(id, _)| id)
    }

    /// First live wall within `tolerance` of `(x, y)`; defaults to the
    /// configured hit tolerance.
    #[must_use]
    pub fn overlapped_wall(&self, x: f64, y: f64, tolerance: Option<f64>) -> Option<WallId> {
        let tolerance = tolerance.unwrap_or(self.config.hit_tolerance);
        self.walls()
            .find(|&(id, _)| {
                self.wall_distance_from(id, x, y)
                    .is_ok_and(|d| d < tolerance)
            })
            .map(|(id, _)| id)
    }

    /// Fuses `corner` into a nearby corner or splits a nearby wall at it.
    ///
    /// Returns `true` when the graph changed.
    ///
    /// # Errors
    ///
    /// Returns an error if `corner` is not owned by this plan.
    pub fn merge_with_intersected(&mut self, corner: CornerId) -> Result<bool> {
        MergeWithIntersected::new(corner).execute(self)
    }

    /// Recomputes rooms, half-edges and orphan flags from the current graph.
    pub fn update(&mut self) {
        RebuildRooms::new().execute(self);
    }

    /// Runs [`update`](Self::update), then drops every tombstoned corner and wall.
    pub fn clean_up(&mut self) {
        self.update();

        let before = (self.corners.len(), self.walls.len());
        let corners = &mut self.corners;
        self.corner_order.retain(|&id| match corners.get(id) {
            Some(c) if c.deleted => {
                corners.remove(id);
                false
            }
            Some(_) => true,
            None => false,
        });
        let walls = &mut self.walls;
        self.wall_order.retain(|&id| match walls.get(id) {
            Some(w) if w.deleted => {
                walls.remove(id);
                false
            }
            Some(_) => true,
            None => false,
        });

        let purged = (before.0 - self.corners.len(), before.1 - self.walls.len());
        if purged != (0, 0) {
            debug!(corners = purged.0, walls = purged.1, "purged deleted entities");
        }
    }
}
