use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Distance under which a corner fuses into another corner or splits a wall (cm).
pub const DEFAULT_CORNER_TOLERANCE: f64 = 20.0;

/// Hit-test radius used by hover and delete picking (cm).
pub const DEFAULT_HIT_TOLERANCE: f64 = 10.0;

/// How far a corner may be pulled to make a wall axis aligned (cm).
pub const DEFAULT_SNAP_TOLERANCE: f64 = 25.0;

pub const DEFAULT_WALL_THICKNESS: f64 = 10.0;

pub const DEFAULT_WALL_HEIGHT: f64 = 250.0;

/// Tolerances and wall defaults for a [`FloorPlan`](crate::topology::FloorPlan).
///
/// All lengths are centimeters. Missing fields in a serialized config fall
/// back to the defaults above.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    pub corner_tolerance: f64,
    pub hit_tolerance: f64,
    pub snap_tolerance: f64,
    pub wall_thickness: f64,
    pub wall_height: f64,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            corner_tolerance: DEFAULT_CORNER_TOLERANCE,
            hit_tolerance: DEFAULT_HIT_TOLERANCE,
            snap_tolerance: DEFAULT_SNAP_TOLERANCE,
            wall_thickness: DEFAULT_WALL_THICKNESS,
            wall_height: DEFAULT_WALL_HEIGHT,
        }
    }
}

impl PlanConfig {
    /// Parses a config from JSON, filling absent fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON and
    /// `ConfigError::NonPositive` if any length is zero or negative.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every length is strictly positive.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NonPositive` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("corner_tolerance", self.corner_tolerance),
            ("hit_tolerance", self.hit_tolerance),
            ("snap_tolerance", self.snap_tolerance),
            ("wall_thickness", self.wall_thickness),
            ("wall_height", self.wall_height),
        ];
        for (field, value) in fields {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value }.into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::FloorplanError;

    #[test]
    fn defaults_match_editor_constants() {
        let config = PlanConfig::default();
        assert!((config.corner_tolerance - 20.0).abs() < 1e-12);
        assert!((config.hit_tolerance - 10.0).abs() < 1e-12);
        assert!((config.snap_tolerance - 25.0).abs() < 1e-12);
        assert!((config.wall_thickness - 10.0).abs() < 1e-12);
        assert!((config.wall_height - 250.0).abs() < 1e-12);
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config = PlanConfig::from_json(r#"{ "snap_tolerance": 5.0 }"#).unwrap();
        assert!((config.snap_tolerance - 5.0).abs() < 1e-12);
        assert!((config.corner_tolerance - DEFAULT_CORNER_TOLERANCE).abs() < 1e-12);
    }

    #[test]
    fn rejects_non_positive_lengths() {
        let err = PlanConfig::from_json(r#"{ "wall_thickness": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            FloorplanError::Config(ConfigError::NonPositive {
                field: "wall_thickness",
                ..
            })
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = PlanConfig::from_json("{ corner_tolerance: ").unwrap_err();
        assert!(matches!(err, FloorplanError::Config(ConfigError::Parse(_))));
    }
}
