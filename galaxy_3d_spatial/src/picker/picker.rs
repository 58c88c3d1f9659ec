/// Picker: two-level ray and marquee picking.
///
/// Level one is a `Tree<ObjectKey>` over object world AABBs, rebuilt
/// lazily from the `PickScene` when marked dirty. Level two is one
/// `PrimitiveIndex` per geometry bucket, built on first use and cached
/// under `"{geometry_id}#{bucket_index}"`. Meshes sharing a geometry share
/// its indices; the query shape is moved into each mesh's local space
/// instead of moving the primitives.
///
/// The primitive cache is never invalidated automatically. Call
/// `clear_cache()` after editing geometry in place.

use std::collections::hash_map::Entry;
use glam::Mat4;
use rustc_hash::FxHashMap;
use crate::error::Result;
use crate::math::{AABB, Frustum, Ray};
use crate::primitive::{
    DefaultIntersector, Primitive, PrimitiveIndex, PrimitiveIndexConfig,
    PrimitiveIntersector, PrimitiveKind, DEFAULT_PADDING,
};
use crate::query::{Query, QueryShape};
use crate::tree::{Tree, TreeConfig};
use crate::{spatial_bail, spatial_debug, spatial_warn};
use super::result::{BucketHit, MeshHit, ObjectHit, PickResult, PrimitiveHit};
use super::scene::{GeometryBucket, ObjectKey, PickScene};

bitflags::bitflags! {
    /// Primitive kinds a pick reports.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PickFilter: u32 {
        /// Triangle lists and strips
        const TRIANGLES = 0b0000_0001;
        /// Line lists and strips
        const LINES     = 0b0000_0010;
        /// Point lists
        const POINTS    = 0b0000_0100;
    }
}

impl Default for PickFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl From<PrimitiveKind> for PickFilter {
    fn from(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Triangle => PickFilter::TRIANGLES,
            PrimitiveKind::Line => PickFilter::LINES,
            PrimitiveKind::Point => PickFilter::POINTS,
        }
    }
}

impl PickFilter {
    /// Whether primitives of `kind` pass this filter
    pub fn accepts(self, kind: PrimitiveKind) -> bool {
        self.contains(PickFilter::from(kind))
    }
}

/// Picker configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickerConfig {
    /// Configuration of the object-level tree
    pub object_tree: TreeConfig,
    /// Configuration of every primitive index
    pub primitive_index: PrimitiveIndexConfig,
    /// Maximum ray-to-segment distance for a line hit, in mesh-local units.
    /// Keep it at or below `primitive_index.padding`.
    pub line_threshold: f32,
    /// Maximum ray-to-point distance for a point hit, in mesh-local units.
    /// Keep it at or below `primitive_index.padding`.
    pub point_threshold: f32,
    /// Primitive kinds to report
    pub filter: PickFilter,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            object_tree: TreeConfig::default(),
            primitive_index: PrimitiveIndexConfig::default(),
            line_threshold: DEFAULT_PADDING,
            point_threshold: DEFAULT_PADDING,
            filter: PickFilter::default(),
        }
    }
}

/// Ray and frustum picker over a `PickScene`
pub struct Picker {
    config: PickerConfig,
    object_tree: Tree<ObjectKey>,
    primitive_indices: FxHashMap<String, PrimitiveIndex>,
    intersector: Box<dyn PrimitiveIntersector>,
    destroyed: bool,
}

impl Picker {
    /// Create a picker using `DefaultIntersector`.
    ///
    /// The object tree starts dirty, so the first pick builds it.
    pub fn new(config: PickerConfig) -> Self {
        Self::with_intersector(config, Box::new(DefaultIntersector))
    }

    /// Create a picker with custom exact primitive tests.
    pub fn with_intersector(config: PickerConfig, intersector: Box<dyn PrimitiveIntersector>) -> Self {
        let mut object_tree = Tree::new(config.object_tree);
        object_tree.mark_dirty();
        Self {
            config,
            object_tree,
            primitive_indices: FxHashMap::default(),
            intersector,
            destroyed: false,
        }
    }

    /// Picker configuration
    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    /// Change the reported primitive kinds. Cached indices stay valid.
    pub fn set_filter(&mut self, filter: PickFilter) {
        self.config.filter = filter;
    }

    /// Object-level tree (as of the last pick)
    pub fn object_tree(&self) -> &Tree<ObjectKey> {
        &self.object_tree
    }

    /// Rebuild the object tree on the next pick.
    ///
    /// Required after removing or moving objects.
    pub fn mark_dirty(&mut self) {
        self.object_tree.mark_dirty();
    }

    /// Index a newly added object without a full rebuild.
    pub fn object_added(&mut self, key: ObjectKey, aabb: AABB) -> Result<()> {
        self.ensure_alive()?;
        if self.object_tree.is_dirty() {
            // Picked up by the pending rebuild
            return Ok(());
        }
        self.object_tree.insert(key, aabb)?;
        Ok(())
    }

    /// Drop every cached primitive index.
    pub fn clear_cache(&mut self) {
        spatial_debug!("galaxy3d::Picker", "Dropping {} cached primitive indices",
            self.primitive_indices.len());
        self.primitive_indices.clear();
    }

    /// Number of cached primitive indices
    pub fn cached_index_count(&self) -> usize {
        self.primitive_indices.len()
    }

    /// Whether `destroy()` has been called
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Release the object tree and every cached index. Later picks fail.
    pub fn destroy(&mut self) {
        self.primitive_indices = FxHashMap::default();
        self.object_tree.destroy();
        self.destroyed = true;
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.destroyed {
            spatial_bail!(destroyed, "galaxy3d::Picker", "picker");
        }
        Ok(())
    }

    /// Pick along a world-space ray.
    ///
    /// The ray is normalized first, so hit distances are world units.
    /// Every hit carries a distance; `PickResult::closest()` selects the
    /// nearest one.
    pub fn pick_ray(&mut self, scene: &PickScene, ray: &Ray) -> Result<PickResult> {
        let world_ray = ray.normalized();
        let line_threshold = self.config.line_threshold;
        let point_threshold = self.config.point_threshold;

        let result = self.pick_with(
            scene,
            &world_ray,
            |ray, world_matrix| ray.transformed(&world_matrix.inverse()),
            |intersector, index, primitive, local_ray, _| {
                let t = intersector.ray_primitive(local_ray, index, primitive, line_threshold, point_threshold)?;
                Some(PrimitiveHit {
                    primitive: *primitive,
                    position: world_ray.at(t),
                    distance: Some(t),
                })
            },
        )?;
        spatial_debug!("galaxy3d::Picker", "Ray pick: {} hits on {} objects",
            result.hit_count(), result.objects.len());
        Ok(result)
    }

    /// Pick every primitive whose AABB meets a world-space frustum.
    ///
    /// Build the frustum of a screen rectangle with `Frustum::from_marquee`.
    /// Hit positions are primitive centroids in world space.
    pub fn pick_frustum(&mut self, scene: &PickScene, frustum: &Frustum) -> Result<PickResult> {
        let result = self.pick_with(
            scene,
            frustum,
            |frustum, world_matrix| frustum.transformed(world_matrix),
            |_, index, primitive, _, world_matrix| {
                Some(PrimitiveHit {
                    primitive: *primitive,
                    position: world_matrix.transform_point3(index.centroid(primitive)),
                    distance: None,
                })
            },
        )?;
        spatial_debug!("galaxy3d::Picker", "Frustum pick: {} hits on {} objects",
            result.hit_count(), result.objects.len());
        Ok(result)
    }

    /// Shared two-level walk.
    ///
    /// `to_local` moves the world shape into a mesh's local space; `accept`
    /// turns a candidate primitive into a hit (or rejects it).
    fn pick_with<S, L, H>(
        &mut self,
        scene: &PickScene,
        shape: &S,
        to_local: L,
        mut accept: H,
    ) -> Result<PickResult>
    where
        S: QueryShape + Copy,
        L: Fn(&S, &Mat4) -> S,
        H: FnMut(&dyn PrimitiveIntersector, &PrimitiveIndex, &Primitive, &S, &Mat4) -> Option<PrimitiveHit>,
    {
        self.ensure_alive()?;
        let Self { config, object_tree, primitive_indices, intersector, .. } = self;

        object_tree.root_or_rebuild(scene)?;
        let mut object_query = Query::new(*shape);
        let candidates = object_query.execute(object_tree)?;

        let mut result = PickResult::default();
        for &key in candidates {
            let Some(object) = scene.object(key) else {
                spatial_warn!("galaxy3d::Picker",
                    "Object {:?} is indexed but no longer in the scene; call mark_dirty() after removals", key);
                continue;
            };

            let mut meshes = Vec::new();
            for (mesh_index, mesh) in object.meshes.iter().enumerate() {
                let local_shape = to_local(shape, &mesh.world_matrix);
                let mut buckets = Vec::new();

                for (bucket_index, bucket) in mesh.geometry.buckets.iter().enumerate() {
                    if !config.filter.accepts(bucket.topology.kind()) {
                        continue;
                    }
                    let index = fetch_or_build(
                        primitive_indices,
                        &mesh.geometry.id,
                        bucket_index,
                        bucket,
                        &config.primitive_index,
                    )?;

                    let mut primitive_query = Query::new(local_shape);
                    let hits: Vec<PrimitiveHit> = primitive_query
                        .execute(index.tree())?
                        .iter()
                        .filter_map(|primitive| {
                            accept(&**intersector, index, primitive, &local_shape, &mesh.world_matrix)
                        })
                        .collect();
                    if !hits.is_empty() {
                        buckets.push(BucketHit { bucket_index, primitives: hits });
                    }
                }

                if !buckets.is_empty() {
                    meshes.push(MeshHit { mesh_index, buckets });
                }
            }

            if !meshes.is_empty() {
                result.objects.push(ObjectHit { key, meshes });
            }
        }
        Ok(result)
    }
}

/// Cached primitive index of one bucket, built on first request.
fn fetch_or_build<'a>(
    cache: &'a mut FxHashMap<String, PrimitiveIndex>,
    geometry_id: &str,
    bucket_index: usize,
    bucket: &GeometryBucket,
    config: &PrimitiveIndexConfig,
) -> Result<&'a PrimitiveIndex> {
    match cache.entry(format!("{}#{}", geometry_id, bucket_index)) {
        Entry::Occupied(entry) => Ok(entry.into_mut()),
        Entry::Vacant(entry) => {
            let index = PrimitiveIndex::build(
                &bucket.positions,
                bucket.indices.as_deref(),
                bucket.topology,
                config,
            )?;
            spatial_debug!("galaxy3d::Picker", "Built primitive index '{}' ({} primitives)",
                entry.key(), index.len());
            Ok(entry.insert(index))
        }
    }
}

#[cfg(test)]
#[path = "picker_tests.rs"]
mod tests;
