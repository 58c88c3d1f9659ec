/// Frustum: six clipping planes for view culling and marquee picking.
///
/// Each plane is represented as a Vec4 (A, B, C, D) where:
/// - (A, B, C) is the inward-pointing normal
/// - D is the signed distance
/// - A point P is inside the frustum if dot(plane, P_homogeneous) >= 0 for all planes
///
/// The caller is responsible for computing the frustum. `from_view_projection()`
/// and `from_marquee()` are provided as utilities.

use glam::{Mat4, Vec2, Vec3, Vec4};
use super::{AABB, Classification};

/// Frustum plane indices
pub const PLANE_LEFT: usize = 0;
pub const PLANE_RIGHT: usize = 1;
pub const PLANE_BOTTOM: usize = 2;
pub const PLANE_TOP: usize = 3;
pub const PLANE_NEAR: usize = 4;
pub const PLANE_FAR: usize = 5;

/// Six frustum planes for culling.
///
/// Each plane is (A, B, C, D) where Ax + By + Cz + D = 0.
/// Normal (A, B, C) points inward (toward the visible volume).
/// Works with both perspective and orthographic projections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// Frustum planes: left, right, bottom, top, near, far
    pub planes: [Vec4; 6],
}

impl Frustum {
    /// Build a frustum from explicit planes (normals pointing inward).
    pub fn from_planes(planes: [Vec4; 6]) -> Self {
        let mut frustum = Self { planes };
        frustum.normalize();
        frustum
    }

    /// Extract frustum planes from a view-projection matrix.
    ///
    /// Uses the Gribb & Hartmann method. Works for both perspective
    /// and orthographic projections.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let m = vp.to_cols_array_2d();

        // Gribb & Hartmann: extract planes from rows of the VP matrix
        let planes = [
            // Left:   row3 + row0
            Vec4::new(m[0][3] + m[0][0], m[1][3] + m[1][0], m[2][3] + m[2][0], m[3][3] + m[3][0]),
            // Right:  row3 - row0
            Vec4::new(m[0][3] - m[0][0], m[1][3] - m[1][0], m[2][3] - m[2][0], m[3][3] - m[3][0]),
            // Bottom: row3 + row1
            Vec4::new(m[0][3] + m[0][1], m[1][3] + m[1][1], m[2][3] + m[2][1], m[3][3] + m[3][1]),
            // Top:    row3 - row1
            Vec4::new(m[0][3] - m[0][1], m[1][3] - m[1][1], m[2][3] - m[2][1], m[3][3] - m[3][1]),
            // Near:   row3 + row2
            Vec4::new(m[0][3] + m[0][2], m[1][3] + m[1][2], m[2][3] + m[2][2], m[3][3] + m[3][2]),
            // Far:    row3 - row2
            Vec4::new(m[0][3] - m[0][2], m[1][3] - m[1][2], m[2][3] - m[2][2], m[3][3] - m[3][2]),
        ];

        Self::from_planes(planes)
    }

    /// Frustum of a screen-space selection rectangle (marquee pick).
    ///
    /// `ndc_min`/`ndc_max` are the rectangle corners in normalized device
    /// coordinates (`[-1, 1]` on both axes). A pick matrix maps the
    /// rectangle onto the full NDC square before plane extraction.
    pub fn from_marquee(view_projection: &Mat4, ndc_min: Vec2, ndc_max: Vec2) -> Self {
        let lo = ndc_min.min(ndc_max);
        let hi = ndc_min.max(ndc_max);
        let extent = (hi - lo).max(Vec2::splat(f32::EPSILON));

        let scale = Vec2::splat(2.0) / extent;
        let offset = -(hi + lo) / extent;

        let pick = Mat4::from_cols(
            Vec4::new(scale.x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, scale.y, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::new(offset.x, offset.y, 0.0, 1.0),
        );

        Self::from_view_projection(&(pick * *view_projection))
    }

    /// Express this frustum in the local space of an object.
    ///
    /// `local_to_world` is the object's world matrix. A local point `p` is
    /// inside the result exactly when `local_to_world * p` is inside `self`.
    pub fn transformed(&self, local_to_world: &Mat4) -> Self {
        let transpose = local_to_world.transpose();
        let mut planes = self.planes;
        for plane in &mut planes {
            *plane = transpose * *plane;
        }
        Self::from_planes(planes)
    }

    /// Normalize each plane so that (A, B, C) is a unit vector.
    fn normalize(&mut self) {
        for plane in &mut self.planes {
            let normal_len = Vec3::new(plane.x, plane.y, plane.z).length();
            if normal_len > 0.0 {
                *plane /= normal_len;
            }
        }
    }

    /// Whether `point` lies inside (or on) every plane.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.truncate().dot(point) + plane.w >= 0.0)
    }

    /// Test if an AABB intersects this frustum.
    ///
    /// Uses the "positive vertex" test: for each plane, find the AABB corner
    /// most in the direction of the plane normal. If that corner is outside,
    /// the AABB is fully outside.
    ///
    /// May return false positives (conservative), never false negatives.
    pub fn intersects_aabb(&self, aabb: &AABB) -> bool {
        for plane in &self.planes {
            let normal = plane.truncate();

            let p_vertex = Vec3::new(
                if normal.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if normal.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if normal.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );

            if normal.dot(p_vertex) + plane.w < 0.0 {
                return false;
            }
        }

        true
    }

    /// Classify an AABB against the frustum (3-way test).
    ///
    /// Tests both the positive vertex (p-vertex) and negative vertex (n-vertex)
    /// against each plane:
    /// - If the p-vertex is outside any plane → `Outside` (early out)
    /// - If the n-vertex is outside any plane → at least `Intersect`
    /// - If all n-vertices are inside all planes → `Inside`
    pub fn classify_aabb(&self, aabb: &AABB) -> Classification {
        let mut all_inside = true;

        for plane in &self.planes {
            let normal = plane.truncate();

            // Positive vertex: corner most in the direction of the normal
            let p_vertex = Vec3::new(
                if normal.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if normal.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if normal.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );

            if normal.dot(p_vertex) + plane.w < 0.0 {
                return Classification::Outside;
            }

            // Negative vertex: corner least in the direction of the normal
            let n_vertex = Vec3::new(
                if normal.x >= 0.0 { aabb.min.x } else { aabb.max.x },
                if normal.y >= 0.0 { aabb.min.y } else { aabb.max.y },
                if normal.z >= 0.0 { aabb.min.z } else { aabb.max.z },
            );

            if normal.dot(n_vertex) + plane.w < 0.0 {
                all_inside = false;
            }
        }

        if all_inside { Classification::Inside } else { Classification::Intersect }
    }
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
