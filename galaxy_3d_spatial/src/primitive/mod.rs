//! Primitive module: spatial index over points, lines and triangles.
//!
//! A `PrimitiveIndex` decomposes a position/index buffer according to its
//! topology and stores each primitive in a `Tree<Primitive>`. The picker
//! queries it in mesh-local space and confirms candidates with a
//! `PrimitiveIntersector`.

mod intersect;
mod primitive;
mod primitive_index;

pub use intersect::{DefaultIntersector, PrimitiveIntersector};
pub use primitive::{Primitive, PrimitiveKind, PrimitiveTopology};
pub use primitive_index::{PrimitiveIndex, PrimitiveIndexConfig, DEFAULT_PADDING};
