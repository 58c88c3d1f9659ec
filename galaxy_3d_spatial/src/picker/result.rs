/// Pick results, nested object → mesh → bucket → primitive.

use glam::Vec3;
use crate::primitive::Primitive;
use super::ObjectKey;

/// One primitive accepted by a pick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimitiveHit {
    pub primitive: Primitive,
    /// World-space hit point (ray picks) or primitive centroid (frustum picks)
    pub position: Vec3,
    /// Distance from the ray origin. `None` for frustum picks.
    pub distance: Option<f32>,
}

/// Hits within one geometry bucket
#[derive(Debug, Clone, PartialEq)]
pub struct BucketHit {
    pub bucket_index: usize,
    pub primitives: Vec<PrimitiveHit>,
}

/// Hits within one mesh of an object
#[derive(Debug, Clone, PartialEq)]
pub struct MeshHit {
    pub mesh_index: usize,
    pub buckets: Vec<BucketHit>,
}

/// Hits within one object
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectHit {
    pub key: ObjectKey,
    pub meshes: Vec<MeshHit>,
}

/// Flattened address of the nearest ray hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestHit {
    pub key: ObjectKey,
    pub mesh_index: usize,
    pub bucket_index: usize,
    pub hit: PrimitiveHit,
}

/// Everything a pick found. Objects without any primitive hit are omitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PickResult {
    pub objects: Vec<ObjectHit>,
}

impl PickResult {
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Total number of primitive hits
    pub fn hit_count(&self) -> usize {
        self.hits().count()
    }

    /// Every primitive hit with its address
    pub fn hits(&self) -> impl Iterator<Item = ClosestHit> + '_ {
        self.objects.iter().flat_map(|object| {
            object.meshes.iter().flat_map(move |mesh| {
                mesh.buckets.iter().flat_map(move |bucket| {
                    bucket.primitives.iter().map(move |hit| ClosestHit {
                        key: object.key,
                        mesh_index: mesh.mesh_index,
                        bucket_index: bucket.bucket_index,
                        hit: *hit,
                    })
                })
            })
        })
    }

    /// Nearest hit that carries a distance
    pub fn closest(&self) -> Option<ClosestHit> {
        self.hits()
            .filter_map(|entry| entry.hit.distance.map(|d| (d, entry)))
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, entry)| entry)
    }

    /// Keys of all hit objects, in result order
    pub fn keys(&self) -> impl Iterator<Item = ObjectKey> + '_ {
        self.objects.iter().map(|object| object.key)
    }
}
