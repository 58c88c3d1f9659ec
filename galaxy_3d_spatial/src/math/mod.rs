//! Math module: bounding volumes and query shapes.
//!
//! Vectors and matrices come from `glam`. This module adds the
//! volumes the index is built from (`AABB`) and the shapes it is
//! queried with (`AABB`, `Frustum`, `Ray`).

mod aabb;
mod classification;
mod frustum;
mod ray;

pub use aabb::AABB;
pub use classification::Classification;
pub use frustum::{
    Frustum,
    PLANE_LEFT, PLANE_RIGHT, PLANE_BOTTOM, PLANE_TOP, PLANE_NEAR, PLANE_FAR,
};
pub use ray::Ray;
