/// Axis-aligned bounding box.
///
/// Every node and item in a `Tree` carries one of these. The 6-float layout
/// used by scene files (`[min x, min y, min z, max x, max y, max z]`) is
/// available through `from_array`/`to_array`.

use glam::{Mat4, Vec3};
use super::Classification;

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner (x, y, z)
    pub min: Vec3,
    /// Maximum corner (x, y, z)
    pub max: Vec3,
}

impl AABB {
    /// An inverted box that any `expand` call replaces.
    pub const EMPTY: AABB = AABB {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Create a box from its two corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create a box from `[min x, min y, min z, max x, max y, max z]`.
    pub fn from_array(v: [f32; 6]) -> Self {
        Self {
            min: Vec3::new(v[0], v[1], v[2]),
            max: Vec3::new(v[3], v[4], v[5]),
        }
    }

    /// `[min x, min y, min z, max x, max y, max z]`
    pub fn to_array(&self) -> [f32; 6] {
        [self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z]
    }

    /// Smallest box enclosing all `points`. Returns `EMPTY` for no points.
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        let mut aabb = Self::EMPTY;
        for p in points {
            aabb.min = aabb.min.min(p);
            aabb.max = aabb.max.max(p);
        }
        aabb
    }

    /// Whether `min > max` on any axis (e.g. `EMPTY`).
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Center point of this AABB.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Extent along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Index (0 = x, 1 = y, 2 = z) of the longest axis.
    ///
    /// Ties resolve to the lowest axis index.
    pub fn longest_axis(&self) -> usize {
        let size = self.size();
        if size.x >= size.y && size.x >= size.z {
            0
        } else if size.y >= size.z {
            1
        } else {
            2
        }
    }

    /// Grow this box to enclose `other`.
    pub fn expand(&mut self, other: &AABB) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Union of two boxes.
    pub fn union(&self, other: &AABB) -> AABB {
        let mut out = *self;
        out.expand(other);
        out
    }

    /// Copy of this box inflated by `amount` on every side.
    pub fn padded(&self, amount: f32) -> AABB {
        AABB {
            min: self.min - Vec3::splat(amount),
            max: self.max + Vec3::splat(amount),
        }
    }

    /// Transform this AABB by a matrix, returning a new AABB.
    ///
    /// Uses the Arvo method: projects each matrix axis onto the AABB extents
    /// for an exact (tight) result without transforming all 8 corners.
    pub fn transformed(&self, matrix: &Mat4) -> AABB {
        let translation = matrix.col(3).truncate();
        let mut new_min = translation;
        let mut new_max = translation;

        for i in 0..3 {
            let axis = matrix.col(i).truncate();
            let a = axis * self.min[i];
            let b = axis * self.max[i];
            new_min += a.min(b);
            new_max += a.max(b);
        }

        AABB { min: new_min, max: new_max }
    }

    /// Test if this AABB fully contains another AABB (boundaries inclusive).
    pub fn contains(&self, other: &AABB) -> bool {
        self.min.x <= other.min.x && self.max.x >= other.max.x
        && self.min.y <= other.min.y && self.max.y >= other.max.y
        && self.min.z <= other.min.z && self.max.z >= other.max.z
    }

    /// Test if this AABB intersects (overlaps or touches) another AABB.
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x
        && self.min.y <= other.max.y && self.max.y >= other.min.y
        && self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Classify `other` against this box used as a query volume.
    pub fn classify_aabb(&self, other: &AABB) -> Classification {
        if !self.intersects(other) {
            Classification::Outside
        } else if self.contains(other) {
            Classification::Inside
        } else {
            Classification::Intersect
        }
    }
}

#[cfg(test)]
#[path = "aabb_tests.rs"]
mod tests;
