pub mod config;
pub mod document;
pub mod error;
pub mod math;
pub mod operations;
pub mod session;
pub mod topology;

pub use config::PlanConfig;
pub use document::FloorPlanDocument;
pub use error::{FloorplanError, Result};
pub use session::{DesignerMode, EditSession};
pub use topology::FloorPlan;
