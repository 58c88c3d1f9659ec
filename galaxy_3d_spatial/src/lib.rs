/*!
# Galaxy 3D Spatial

Spatial index over axis-aligned bounding boxes for large BIM/CAD scenes.

A binary tree partitions items by their AABBs; queries walk it top-down,
pruning subtrees that cannot meet the query shape. The same tree indexes
whole objects and the raw primitives of their geometry, which is what the
two-level picker is built on.

## Architecture

- **math**: `AABB`, `Frustum`, `Ray`, `Classification`
- **tree**: `Tree<T>` with lazy longest-axis midpoint splits
- **query**: stateless `AabbQuery`, `FrustumQuery`, `RayQuery` and their
  delta variants that only report classification changes
- **primitive**: `PrimitiveIndex` over points, lines and triangles
- **picker**: `Picker` for ray and marquee selection over a `PickScene`

Everything is re-exported under the `galaxy3d` namespace.
*/

// Internal modules
mod error;
pub mod log;
pub mod math;
pub mod tree;
pub mod query;
pub mod primitive;
pub mod picker;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Core types
    pub use crate::math::{AABB, Classification, Frustum, Ray};
    pub use crate::tree::{Tree, TreeConfig, TreeSource};
    pub use crate::picker::{Picker, PickerConfig, PickScene};

    // Logging sub-module (types and global configuration, NOT macros)
    pub mod log {
        pub use crate::log::{
            Logger, LogEntry, LogSeverity, DefaultLogger,
            set_logger, reset_logger, set_max_severity, max_severity,
        };
    }

    // Math sub-module
    pub mod math {
        pub use crate::math::*;
    }

    // Tree sub-module
    pub mod tree {
        pub use crate::tree::*;
    }

    // Query sub-module
    pub mod query {
        pub use crate::query::*;
    }

    // Primitive sub-module
    pub mod primitive {
        pub use crate::primitive::*;
    }

    // Picker sub-module
    pub mod picker {
        pub use crate::picker::*;
    }
}

// Re-export math library at crate root
pub use glam;
