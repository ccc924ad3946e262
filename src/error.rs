use thiserror::Error;

/// Top-level error type for the floorplan kernel.
#[derive(Debug, Error)]
pub enum FloorplanError {
    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to the corner/wall graph.
///
/// These signal a caller handing the plan an id it does not own, which is a
/// contract violation rather than a recoverable editing condition.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),
}

/// Errors raised while reading a floorplan document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("wall {wall} references unknown corner {corner}")]
    UnknownCorner { wall: String, corner: String },

    #[error("corner id {0} appears more than once")]
    DuplicateCorner(String),
}

/// Errors raised while loading a [`PlanConfig`](crate::config::PlanConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
}

/// Convenience type alias for results using [`FloorplanError`].
pub type Result<T> = std::result::Result<T, FloorplanError>;
