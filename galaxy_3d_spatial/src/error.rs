//! Error types for the Galaxy3D spatial index
//!
//! Indexing and querying are infallible on well-formed input. The only
//! errors are calls on a destroyed tree, query or picker, and primitive
//! buffers that cannot be indexed safely.

use std::fmt;

/// Result type for spatial index operations
pub type Result<T> = std::result::Result<T, Error>;

/// Spatial index errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Operation invoked on a tree, query or picker after `destroy()`
    UseAfterDestroy(String),

    /// Position/index buffer that cannot be turned into primitives
    InvalidGeometry(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UseAfterDestroy(what) => write!(f, "Use after destroy: {}", what),
            Error::InvalidGeometry(msg) => write!(f, "Invalid geometry: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an error at ERROR severity and build the matching `Error` value.
///
/// The first token selects the variant (`destroyed` or `geometry`).
///
/// # Example
///
/// ```ignore
/// return Err(spatial_err!(destroyed, "galaxy3d::Tree", "tree"));
/// ```
#[macro_export]
macro_rules! spatial_err {
    (destroyed, $source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::spatial_error!($source, "Use after destroy: {}", message);
        $crate::galaxy3d::Error::UseAfterDestroy(message)
    }};
    (geometry, $source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::spatial_error!($source, "Invalid geometry: {}", message);
        $crate::galaxy3d::Error::InvalidGeometry(message)
    }};
}

/// Log an error and return it from the current function.
#[macro_export]
macro_rules! spatial_bail {
    ($kind:ident, $source:expr, $($arg:tt)*) => {
        return Err($crate::spatial_err!($kind, $source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
