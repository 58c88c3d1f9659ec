//! Picker module: object and primitive picking over a `PickScene`.

mod picker;
mod result;
mod scene;

pub use picker::{PickFilter, Picker, PickerConfig};
pub use result::{BucketHit, ClosestHit, MeshHit, ObjectHit, PickResult, PrimitiveHit};
pub use scene::{GeometryBucket, ObjectKey, PickGeometry, PickMesh, PickObject, PickScene};
