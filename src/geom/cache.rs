//! Base tessellation cache.
//!
//! The unit-sphere tessellation only depends on the resolution, while the
//! boundary surface is re-deformed on every `k` change. Keeping the sphere in
//! a cache lets a UI drag the `k` slider, or flip between a few resolutions,
//! without rebuilding the lattice each time.
//!
//! ```
//! use lknorm_engine::geom::GeomCache;
//!
//! let mut cache = GeomCache::default();
//! let a = cache.get_or_insert_sphere(8);
//! let b = cache.get_or_insert_sphere(8);
//! assert!(std::sync::Arc::ptr_eq(&a, &b));
//! assert_eq!(cache.stats().sphere_hits, 1);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use super::tessellation::{SphereTessellation, tessellate_unit_sphere};

/// Cache of unit-sphere tessellations keyed by resolution.
#[derive(Debug, Default)]
pub struct GeomCache {
    spheres: HashMap<usize, Arc<SphereTessellation>>,
    sphere_hits: usize,
    sphere_misses: usize,
}

/// Cache statistics for diagnostics and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeomCacheStats {
    /// Number of cached sphere tessellations.
    pub sphere_entries: usize,
    pub sphere_hits: usize,
    pub sphere_misses: usize,
    /// Estimated memory usage in bytes.
    pub estimated_memory_bytes: usize,
}

impl GeomCacheStats {
    /// Returns the cache hit rate as a value between 0.0 and 1.0.
    /// Returns 0.0 if no cache accesses have been made.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.sphere_hits + self.sphere_misses;
        if total == 0 {
            0.0
        } else {
            self.sphere_hits as f64 / total as f64
        }
    }
}

impl GeomCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn stats(&self) -> GeomCacheStats {
        GeomCacheStats {
            sphere_entries: self.spheres.len(),
            sphere_hits: self.sphere_hits,
            sphere_misses: self.sphere_misses,
            estimated_memory_bytes: self.estimate_memory_usage(),
        }
    }

    /// Clears all cached data and resets hit/miss counters.
    pub fn clear(&mut self) {
        self.spheres.clear();
        self.sphere_hits = 0;
        self.sphere_misses = 0;
    }

    /// Estimates the memory usage of all cached data in bytes.
    #[must_use]
    pub fn estimate_memory_usage(&self) -> usize {
        // Point3 is 3 × f64 = 24 bytes, each index is 4 bytes.
        self.spheres
            .values()
            .map(|s| s.vertex_count() * 24 + s.indices().len() * 4)
            .sum()
    }

    /// Returns the tessellation for `resolution`, building it on a miss.
    ///
    /// Resolutions below 1 are clamped to 1, matching [`tessellate_unit_sphere`].
    #[must_use]
    pub fn get_or_insert_sphere(&mut self, resolution: usize) -> Arc<SphereTessellation> {
        self.get_or_insert_sphere_with(resolution, tessellate_unit_sphere)
    }

    /// Like [`get_or_insert_sphere`](Self::get_or_insert_sphere), but builds a
    /// missing entry with `build`, called with the clamped resolution.
    #[must_use]
    pub fn get_or_insert_sphere_with(
        &mut self,
        resolution: usize,
        build: impl FnOnce(usize) -> SphereTessellation,
    ) -> Arc<SphereTessellation> {
        let resolution = resolution.max(1);
        if let Some(sphere) = self.spheres.get(&resolution) {
            self.sphere_hits += 1;
            return Arc::clone(sphere);
        }

        self.sphere_misses += 1;
        let sphere = Arc::new(build(resolution));
        self.spheres.insert(resolution, Arc::clone(&sphere));
        sphere
    }
}
