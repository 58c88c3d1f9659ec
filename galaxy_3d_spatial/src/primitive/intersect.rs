/// Exact ray/primitive tests used by the picker.
///
/// All tests return the ray parameter `t >= 0` of the hit, in units of the
/// ray direction's length. Directions need not be normalized.

use glam::Vec3;
use crate::math::Ray;
use super::{Primitive, PrimitiveIndex};

const EPSILON: f32 = 1e-8;

/// Pluggable ray/primitive intersection.
///
/// Implement this to replace the default tests, e.g. with back-face culling
/// or screen-space thresholds.
pub trait PrimitiveIntersector {
    /// Ray against triangle `a, b, c` (both faces)
    fn ray_triangle(&self, ray: &Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<f32>;

    /// Ray against segment `a, b`, hit when closer than `threshold`
    fn ray_line(&self, ray: &Ray, a: Vec3, b: Vec3, threshold: f32) -> Option<f32>;

    /// Ray against `point`, hit when closer than `threshold`
    fn ray_point(&self, ray: &Ray, point: Vec3, threshold: f32) -> Option<f32>;

    /// Dispatch on the kind of `primitive`.
    fn ray_primitive(
        &self,
        ray: &Ray,
        index: &PrimitiveIndex,
        primitive: &Primitive,
        line_threshold: f32,
        point_threshold: f32,
    ) -> Option<f32> {
        match *primitive {
            Primitive::Triangle([a, b, c]) => {
                self.ray_triangle(ray, index.position(a), index.position(b), index.position(c))
            }
            Primitive::Line([a, b]) => {
                self.ray_line(ray, index.position(a), index.position(b), line_threshold)
            }
            Primitive::Point([a]) => {
                self.ray_point(ray, index.position(a), point_threshold)
            }
        }
    }
}

/// Möller–Trumbore for triangles, closest approach for lines and points
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultIntersector;

impl PrimitiveIntersector for DefaultIntersector {
    fn ray_triangle(&self, ray: &Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
        let edge1 = b - a;
        let edge2 = c - a;
        let p = ray.direction.cross(edge2);
        let det = edge1.dot(p);
        if det.abs() < EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let s = ray.origin - a;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = ray.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(q) * inv_det;
        (t >= 0.0).then_some(t)
    }

    fn ray_line(&self, ray: &Ray, a: Vec3, b: Vec3, threshold: f32) -> Option<f32> {
        let d1 = ray.direction;
        let d2 = b - a;
        let r = ray.origin - a;
        let dd1 = d1.dot(d1);
        let dd2 = d2.dot(d2);
        if dd1 <= EPSILON {
            return None;
        }
        if dd2 <= EPSILON {
            return self.ray_point(ray, a, threshold);
        }

        let b12 = d1.dot(d2);
        let c1 = d1.dot(r);
        let f2 = d2.dot(r);
        let denom = dd1 * dd2 - b12 * b12;

        // Closest points, ray parameter clamped to t >= 0 and segment to [0, 1]
        let mut t = if denom > EPSILON {
            ((b12 * f2 - c1 * dd2) / denom).max(0.0)
        } else {
            0.0
        };
        let mut s = (b12 * t + f2) / dd2;
        if s < 0.0 {
            s = 0.0;
            t = (-c1 / dd1).max(0.0);
        } else if s > 1.0 {
            s = 1.0;
            t = ((b12 - c1) / dd1).max(0.0);
        }

        let distance = ray.at(t).distance(a + d2 * s);
        (distance <= threshold).then_some(t)
    }

    fn ray_point(&self, ray: &Ray, point: Vec3, threshold: f32) -> Option<f32> {
        let dd = ray.direction.dot(ray.direction);
        if dd <= EPSILON {
            return None;
        }
        let t = ((point - ray.origin).dot(ray.direction) / dd).max(0.0);
        (ray.at(t).distance(point) <= threshold).then_some(t)
    }
}

#[cfg(test)]
#[path = "intersect_tests.rs"]
mod tests;
