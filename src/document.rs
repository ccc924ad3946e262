//! Serialized floorplan documents.
//!
//! A document lists corners by id and position, and walls by their two
//! endpoint records. Loading resolves each wall endpoint against the corner
//! table by id; the embedded coordinates of a wall's endpoints are ignored.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PlanConfig;
use crate::error::{DocumentError, Result};
use crate::topology::{CornerId, FloorPlan};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FloorPlanDocument {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub corners: Vec<CornerRecord>,
    #[serde(default)]
    pub walls: Vec<WallRecord>,
}

/// A corner position in centimeters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CornerRecord {
    #[serde(default)]
    pub id: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallRecord {
    #[serde(default)]
    pub id: String,
    pub start: CornerRecord,
    pub end: CornerRecord,
    #[serde(default)]
    pub thickness: f64,
    /// Attached items, kept as opaque JSON.
    #[serde(default)]
    pub items: Vec<serde_json::Value>,
}

impl FloorPlanDocument {
    /// Parses a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::Json` if the text is not a valid document.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text).map_err(DocumentError::from)?)
    }

    /// Serializes the document as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::Json` if an item cannot be serialized.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self).map_err(DocumentError::from)?)
    }
}

impl FloorPlan {
    /// Builds a live plan from a document and derives its rooms.
    ///
    /// Empty ids are regenerated. Walls without a positive thickness use the
    /// configured default; wall height always comes from the config.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::DuplicateCorner` if two corners share an id and
    /// `DocumentError::UnknownCorner` if a wall endpoint is not in the corner
    /// table.
    pub fn from_document(doc: &FloorPlanDocument, config: PlanConfig) -> Result<Self> {
        let id = if doc.id.is_empty() {
            uuid::Uuid::new_v4().to_string()
        } else {
            doc.id.clone()
        };
        let mut plan = Self::with_id(id, config);

        let mut by_id: HashMap<String, CornerId> = HashMap::with_capacity(doc.corners.len());
        for record in &doc.corners {
            let name = (!record.id.is_empty()).then(|| record.id.clone());
            if let Some(name) = &name {
                if by_id.contains_key(name) {
                    return Err(DocumentError::DuplicateCorner(name.clone()).into());
                }
            }
            let corner = plan.new_corner(record.x, record.y, name);
            by_id.insert(plan.corner(corner)?.id.clone(), corner);
        }

        for record in &doc.walls {
            let resolve = |endpoint: &CornerRecord| {
                by_id.get(&endpoint.id).copied().ok_or_else(|| DocumentError::UnknownCorner {
                    wall: record.id.clone(),
                    corner: endpoint.id.clone(),
                })
            };
            let start = resolve(&record.start)?;
            let end = resolve(&record.end)?;

            let thickness = if record.thickness > 0.0 {
                record.thickness
            } else {
                config.wall_thickness
            };
            let name = (!record.id.is_empty()).then(|| record.id.clone());
            plan.insert_wall(start, end, name, thickness, config.wall_height, record.items.clone())?;
        }

        plan.update();
        debug!(
            corners = plan.corner_count(),
            walls = plan.wall_count(),
            rooms = plan.rooms().len(),
            "loaded floorplan document"
        );
        Ok(plan)
    }

    /// Snapshot of the live corners and walls as a document.
    ///
    /// # Errors
    ///
    /// Returns an error if a wall references a corner that is not found.
    pub fn to_document(&self) -> Result<FloorPlanDocument> {
        let corners = self
            .corners()
            .map(|(_, c)| CornerRecord {
                id: c.id.clone(),
                x: c.x(),
                y: c.y(),
            })
            .collect();

        let mut walls = Vec::with_capacity(self.wall_count());
        for (_, wall) in self.walls() {
            let record = |id| {
                self.corner(id).map(|c| CornerRecord {
                    id: c.id.clone(),
                    x: c.x(),
                    y: c.y(),
                })
            };
            walls.push(WallRecord {
                id: wall.id.clone(),
                start: record(wall.start)?,
                end: record(wall.end)?,
                thickness: wall.thickness,
                items: wall.items.clone(),
            });
        }

        Ok(FloorPlanDocument {
            id: self.id.clone(),
            corners,
            walls,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::FloorplanError;

    const SQUARE: &str = r#"{
        "id": "plan-1",
        "corners": [
            {"id": "a", "x": 0, "y": 0},
            {"id": "b", "x": 100, "y": 0},
            {"id": "c", "x": 100, "y": 100},
            {"id": "d", "x": 0, "y": 100}
        ],
        "walls": [
            {"id": "a,b", "start": {"id": "a", "x": 0, "y": 0}, "end": {"id": "b", "x": 100, "y": 0}, "thickness": 20, "items": [{"kind": "door", "offset": 30}]},
            {"id": "b,c", "start": {"id": "b", "x": 100, "y": 0}, "end": {"id": "c", "x": 100, "y": 100}, "thickness": 0, "items": []},
            {"id": "c,d", "start": {"id": "c", "x": 100, "y": 100}, "end": {"id": "d", "x": 0, "y": 100}, "thickness": 10, "items": []},
            {"id": "", "start": {"id": "d", "x": 0, "y": 100}, "end": {"id": "a", "x": 0, "y": 0}}
        ]
    }"#;

    #[test]
    fn load_builds_incidence_and_rooms() {
        let doc = FloorPlanDocument::from_json(SQUARE).unwrap();
        let plan = FloorPlan::from_document(&doc, PlanConfig::default()).unwrap();

        assert_eq!(plan.id(), "plan-1");
        assert_eq!(plan.corner_count(), 4);
        assert_eq!(plan.wall_count(), 4);
        assert_eq!(plan.rooms().len(), 1);

        let walls: Vec<_> = plan.walls().map(|(_, w)| w).collect();
        assert!((walls[0].thickness - 20.0).abs() < 1e-12);
        // Zero and missing thickness fall back to the default.
        assert!((walls[1].thickness - 10.0).abs() < 1e-12);
        assert!((walls[3].thickness - 10.0).abs() < 1e-12);
        assert_eq!(walls[3].id, "d,a");
        assert_eq!(walls[0].items[0]["kind"], "door");
    }

    #[test]
    fn round_trip_preserves_geometry_and_connectivity() {
        let doc = FloorPlanDocument::from_json(SQUARE).unwrap();
        let plan = FloorPlan::from_document(&doc, PlanConfig::default()).unwrap();

        let text = plan.to_document().unwrap().to_json().unwrap();
        let again = FloorPlanDocument::from_json(&text).unwrap();
        let reloaded = FloorPlan::from_document(&again, PlanConfig::default()).unwrap();

        assert_eq!(again.corners, doc.corners);
        assert_eq!(reloaded.rooms().len(), 1);
        for (before, after) in plan.walls().zip(reloaded.walls()) {
            let (b, a) = (before.1, after.1);
            assert_eq!(b.id, a.id);
            assert_eq!(plan.corner(b.start).unwrap().id, reloaded.corner(a.start).unwrap().id);
            assert_eq!(plan.corner(b.end).unwrap().id, reloaded.corner(a.end).unwrap().id);
            assert_eq!(b.items, a.items);
        }
    }

    #[test]
    fn unknown_corner_is_rejected() {
        let doc = FloorPlanDocument {
            id: "x".into(),
            corners: vec![CornerRecord {
                id: "a".into(),
                x: 0.0,
                y: 0.0,
            }],
            walls: vec![WallRecord {
                id: "a,z".into(),
                start: CornerRecord {
                    id: "a".into(),
                    x: 0.0,
                    y: 0.0,
                },
                end: CornerRecord {
                    id: "z".into(),
                    x: 5.0,
                    y: 5.0,
                },
                thickness: 10.0,
                items: Vec::new(),
            }],
        };

        let err = FloorPlan::from_document(&doc, PlanConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            FloorplanError::Document(DocumentError::UnknownCorner { ref corner, .. }) if corner == "z"
        ));
    }

    #[test]
    fn duplicate_corner_is_rejected() {
        let record = CornerRecord {
            id: "a".into(),
            x: 0.0,
            y: 0.0,
        };
        let doc = FloorPlanDocument {
            id: String::new(),
            corners: vec![record.clone(), record],
            walls: Vec::new(),
        };

        let err = FloorPlan::from_document(&doc, PlanConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            FloorplanError::Document(DocumentError::DuplicateCorner(_))
        ));
    }

    #[test]
    fn malformed_json_is_a_document_error() {
        let err = FloorPlanDocument::from_json("{\"corners\": 3}").unwrap_err();
        assert!(matches!(err, FloorplanError::Document(DocumentError::Json(_))));
    }

    #[test]
    fn empty_ids_are_regenerated() {
        let doc = FloorPlanDocument {
            id: String::new(),
            corners: vec![CornerRecord {
                id: String::new(),
                x: 1.0,
                y: 2.0,
            }],
            walls: Vec::new(),
        };
        let plan = FloorPlan::from_document(&doc, PlanConfig::default()).unwrap();
        assert!(!plan.id().is_empty());
        let (_, corner) = plan.corners().next().unwrap();
        assert!(!corner.id.is_empty());
    }
}
