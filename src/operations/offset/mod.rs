mod miter;

pub use miter::{half_angle_vector, EdgeSegment};
