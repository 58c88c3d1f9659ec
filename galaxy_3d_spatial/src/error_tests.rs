//! Unit tests for error.rs
//!
//! Tests Error variants, Display output and the logging error macros.

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_use_after_destroy_display() {
    let err = Error::UseAfterDestroy("tree".to_string());
    assert_eq!(format!("{}", err), "Use after destroy: tree");
}

#[test]
fn test_invalid_geometry_display() {
    let err = Error::InvalidGeometry("index 7 out of range".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid geometry"));
    assert!(display.contains("index 7 out of range"));
}

#[test]
fn test_error_is_std_error() {
    let err = Error::UseAfterDestroy("query".to_string());
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_clone_and_eq() {
    let err1 = Error::InvalidGeometry("bad".to_string());
    let err2 = err1.clone();
    assert_eq!(err1, err2);
    assert_ne!(err1, Error::UseAfterDestroy("bad".to_string()));
}

// ============================================================================
// MACROS
// ============================================================================

fn bail_on_odd(n: u32) -> Result<u32> {
    if n % 2 == 1 {
        crate::spatial_bail!(geometry, "galaxy3d::test", "odd value {}", n);
    }
    Ok(n)
}

#[test]
fn test_spatial_err_builds_variant() {
    let err = crate::spatial_err!(destroyed, "galaxy3d::test", "picker");
    assert_eq!(err, Error::UseAfterDestroy("picker".to_string()));
}

#[test]
fn test_spatial_bail_returns_early() {
    assert_eq!(bail_on_odd(4), Ok(4));
    assert_eq!(
        bail_on_odd(3),
        Err(Error::InvalidGeometry("odd value 3".to_string()))
    );
}
