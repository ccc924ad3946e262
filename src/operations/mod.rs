pub mod merge;
pub mod offset;
pub mod rooms;
