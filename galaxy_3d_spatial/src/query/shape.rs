/// Query shapes: the predicate a traversal prunes with.

use crate::math::{AABB, Classification, Frustum, Ray};

/// A volume or half-line a `Tree` can be queried with.
///
/// `classify` must be conservative: it may report `Intersect` for a box
/// that is actually outside, but never `Outside` for one that overlaps,
/// and never `Inside` for one that is not fully contained.
pub trait QueryShape {
    /// Classify a node or item AABB against this shape.
    fn classify(&self, aabb: &AABB) -> Classification;

    /// Whether `aabb` is at least partially covered by this shape.
    fn intersects(&self, aabb: &AABB) -> bool {
        self.classify(aabb).is_hit()
    }
}

impl QueryShape for AABB {
    fn classify(&self, aabb: &AABB) -> Classification {
        self.classify_aabb(aabb)
    }

    fn intersects(&self, aabb: &AABB) -> bool {
        AABB::intersects(self, aabb)
    }
}

impl QueryShape for Frustum {
    fn classify(&self, aabb: &AABB) -> Classification {
        self.classify_aabb(aabb)
    }

    fn intersects(&self, aabb: &AABB) -> bool {
        self.intersects_aabb(aabb)
    }
}

impl QueryShape for Ray {
    fn classify(&self, aabb: &AABB) -> Classification {
        self.classify_aabb(aabb)
    }

    fn intersects(&self, aabb: &AABB) -> bool {
        self.intersects_aabb(aabb)
    }
}
