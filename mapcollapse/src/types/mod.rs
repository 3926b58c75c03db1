//! Input entities, bounding boxes and the extent accumulator.

mod bounding_box;
pub use bounding_box::*;

mod box_geometry;
pub use box_geometry::*;

mod entity;
pub use entity::*;

mod extent;
pub use extent::*;
