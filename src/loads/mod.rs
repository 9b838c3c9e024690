//! Member loads

mod point_load;

pub use point_load::{LoadKind, PointLoad};
