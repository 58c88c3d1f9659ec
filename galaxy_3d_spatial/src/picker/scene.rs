/// PickScene: the minimal scene model the picker reads.
///
/// Objects own meshes; meshes reference shared geometry and carry a world
/// matrix; geometry is split into buckets of one topology each.
///
/// ```text
/// PickScene
/// └── ObjectKey → PickObject (world AABB)
///     └── meshes[i] → PickMesh (world matrix)
///         └── Arc<PickGeometry> "wall-type-3"
///             ├── buckets[0] → GeometryBucket (TriangleList)
///             └── buckets[1] → GeometryBucket (LineList)
/// ```

use std::sync::Arc;
use glam::{Mat4, Vec3};
use slotmap::{new_key_type, SlotMap};
use crate::math::AABB;
use crate::primitive::PrimitiveTopology;
use crate::tree::TreeSource;

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable key for a PickObject within a PickScene.
    ///
    /// Keys remain valid after other objects are removed.
    pub struct ObjectKey;
}

// ============================================================================
// GEOMETRY
// ============================================================================

/// Positions plus optional indices, assembled with one topology
#[derive(Debug, Clone)]
pub struct GeometryBucket {
    pub positions: Vec<Vec3>,
    pub indices: Option<Vec<u32>>,
    pub topology: PrimitiveTopology,
}

impl GeometryBucket {
    pub fn new(positions: Vec<Vec3>, indices: Option<Vec<u32>>, topology: PrimitiveTopology) -> Self {
        Self { positions, indices, topology }
    }

    /// Bounds of all positions, in geometry-local space
    pub fn local_aabb(&self) -> AABB {
        AABB::from_points(self.positions.iter().copied())
    }
}

/// Geometry shared between meshes.
///
/// `id` must be unique per geometry: primitive indices are cached under it.
#[derive(Debug, Clone)]
pub struct PickGeometry {
    pub id: String,
    pub buckets: Vec<GeometryBucket>,
}

impl PickGeometry {
    pub fn new(id: impl Into<String>, buckets: Vec<GeometryBucket>) -> Self {
        Self { id: id.into(), buckets }
    }

    /// Union of all bucket bounds, in geometry-local space
    pub fn local_aabb(&self) -> AABB {
        self.buckets
            .iter()
            .fold(AABB::EMPTY, |acc, bucket| acc.union(&bucket.local_aabb()))
    }
}

// ============================================================================
// OBJECTS
// ============================================================================

/// One placement of a geometry
#[derive(Debug, Clone)]
pub struct PickMesh {
    pub geometry: Arc<PickGeometry>,
    /// Local-to-world transform
    pub world_matrix: Mat4,
}

impl PickMesh {
    pub fn new(geometry: Arc<PickGeometry>, world_matrix: Mat4) -> Self {
        Self { geometry, world_matrix }
    }

    /// World-space bounds of the transformed geometry
    pub fn world_aabb(&self) -> AABB {
        self.geometry.local_aabb().transformed(&self.world_matrix)
    }
}

/// A pickable object: world AABB plus meshes
#[derive(Debug, Clone)]
pub struct PickObject {
    /// World-space bounds used by the object tree
    pub aabb: AABB,
    pub meshes: Vec<PickMesh>,
}

impl PickObject {
    pub fn new(aabb: AABB, meshes: Vec<PickMesh>) -> Self {
        Self { aabb, meshes }
    }

    /// Object whose AABB is the union of its meshes' world bounds
    pub fn from_meshes(meshes: Vec<PickMesh>) -> Self {
        let aabb = meshes
            .iter()
            .fold(AABB::EMPTY, |acc, mesh| acc.union(&mesh.world_aabb()));
        Self { aabb, meshes }
    }
}

// ============================================================================
// SCENE
// ============================================================================

/// Collection of pickable objects with stable keys.
///
/// The scene does not notify the picker. After removing objects (or moving
/// them) call `Picker::mark_dirty()`; after adding one, either
/// `Picker::object_added()` or `Picker::mark_dirty()`.
#[derive(Debug, Default)]
pub struct PickScene {
    objects: SlotMap<ObjectKey, PickObject>,
}

impl PickScene {
    pub fn new() -> Self {
        Self { objects: SlotMap::with_key() }
    }

    /// Add an object, returning its key
    pub fn add_object(&mut self, object: PickObject) -> ObjectKey {
        self.objects.insert(object)
    }

    /// Remove an object. Returns it, or `None` if the key is invalid.
    pub fn remove_object(&mut self, key: ObjectKey) -> Option<PickObject> {
        self.objects.remove(key)
    }

    pub fn object(&self, key: ObjectKey) -> Option<&PickObject> {
        self.objects.get(key)
    }

    pub fn object_mut(&mut self, key: ObjectKey) -> Option<&mut PickObject> {
        self.objects.get_mut(key)
    }

    /// Iterate `(key, object)` pairs
    pub fn objects(&self) -> impl Iterator<Item = (ObjectKey, &PickObject)> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl TreeSource for PickScene {
    type Item = ObjectKey;

    fn visit_items(&self, visitor: &mut dyn FnMut(ObjectKey, AABB)) {
        for (key, object) in &self.objects {
            visitor(key, object.aabb);
        }
    }
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
