#![allow(dead_code)]
//! Shared helpers for integration tests
//!
//! Deterministic random boxes and a logger that captures entries, so that
//! tests can compare tree queries against brute force and inspect
//! diagnostics without printing to the console.

use galaxy_3d_spatial::galaxy3d::log::{LogEntry, Logger};
use galaxy_3d_spatial::galaxy3d::AABB;
use galaxy_3d_spatial::glam::Vec3;
use std::sync::{Arc, Mutex};

/// xorshift64 generator
#[derive(Clone)]
pub struct Rng(u64);

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Uniform in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        let v = self.next_u64() >> 40;
        (v as f32) / ((1u64 << 24) as f32)
    }

    /// Uniform in [lo, hi)
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.next_f32() * (hi - lo)
    }

    pub fn vec3(&mut self, lo: f32, hi: f32) -> Vec3 {
        Vec3::new(self.range(lo, hi), self.range(lo, hi), self.range(lo, hi))
    }
}

/// `count` boxes with corners in `[0, extent)` and edges up to `max_size`
pub fn random_boxes(seed: u64, count: usize, extent: f32, max_size: f32) -> Vec<(u32, AABB)> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|i| {
            let min = rng.vec3(0.0, extent);
            let size = rng.vec3(0.0, max_size);
            (i as u32, AABB::new(min, min + size))
        })
        .collect()
}

/// Sorted copy, for order-insensitive comparisons
pub fn sorted(values: &[u32]) -> Vec<u32> {
    let mut out = values.to_vec();
    out.sort_unstable();
    out
}

/// Logger that stores every entry it receives
pub struct CaptureLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl CaptureLogger {
    pub fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}
