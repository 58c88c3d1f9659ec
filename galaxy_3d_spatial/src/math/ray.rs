/// Ray: origin plus direction, used for picking.
///
/// The direction is not normalized on construction. Distances returned by
/// the intersection helpers are expressed in units of the direction's
/// length, so a unit direction yields world-space distances.

use glam::{Mat4, Vec3};
use super::{AABB, Classification};

/// Directions shorter than this on an axis are treated as parallel to it.
const PARALLEL_EPSILON: f32 = 1e-12;

/// A half-line starting at `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point
    pub origin: Vec3,
    /// Direction (non-zero, not necessarily unit length)
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray. `direction` must be non-zero.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Copy of this ray with a unit-length direction.
    pub fn normalized(&self) -> Self {
        Self {
            origin: self.origin,
            direction: self.direction.normalize_or_zero(),
        }
    }

    /// Point at parameter `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Transform origin and direction by `matrix`.
    ///
    /// Parameters along the transformed ray map to the same points as on the
    /// original ray, so hit distances stay comparable across spaces.
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        Self {
            origin: matrix.transform_point3(self.origin),
            direction: matrix.transform_vector3(self.direction),
        }
    }

    /// Slab test against an AABB.
    ///
    /// Returns the entry parameter (0 when the origin is inside the box),
    /// or `None` if the ray misses the box or the box lies behind the origin.
    pub fn intersect_aabb(&self, aabb: &AABB) -> Option<f32> {
        let mut t_min = 0.0f32;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let origin = self.origin[axis];
            let dir = self.direction[axis];
            let (lo, hi) = (aabb.min[axis], aabb.max[axis]);

            if dir.abs() < PARALLEL_EPSILON {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let t1 = (lo - origin) * inv;
            let t2 = (hi - origin) * inv;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));

            if t_max < t_min {
                return None;
            }
        }

        Some(t_min)
    }

    /// Whether the ray hits `aabb`.
    pub fn intersects_aabb(&self, aabb: &AABB) -> bool {
        self.intersect_aabb(aabb).is_some()
    }

    /// Classify an AABB against the ray.
    ///
    /// A ray never contains a volume, so the result is `Intersect` or `Outside`.
    pub fn classify_aabb(&self, aabb: &AABB) -> Classification {
        if self.intersects_aabb(aabb) {
            Classification::Intersect
        } else {
            Classification::Outside
        }
    }
}

#[cfg(test)]
#[path = "ray_tests.rs"]
mod tests;
