//! Point-in-Polygon (PIP) primitives.
//!
//! Ray-casting containment against single geometries, and topmost-feature
//! lookup over a layer. Layers are scanned linearly; there is no spatial index.

mod geometry;
mod scanner;

pub use geometry::{contains, multipolygon_contains, polygon_contains, ring_position, RingPosition};
pub use scanner::{any_contains, feature_contains, find_feature};
