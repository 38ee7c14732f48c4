//! Opt-in timing hooks for boundary generation.
//!
//! Timing is only collected when the `mesh_engine_metrics` feature is enabled
//! and the target is not WASM (`std::time::Instant` is unavailable there).
//! Otherwise every call compiles down to running the closure.
//!
//! A [`GeomMetrics`] accumulates for the lifetime of its context. Spans are
//! measured with [`begin`](GeomMetrics::begin) / [`end`](GeomMetrics::end),
//! which never reset the running totals, so nested or consecutive operations
//! sharing one context each get their own report.
//!
//! ```ignore
//! let mut metrics = GeomMetrics::default();
//! let mark = metrics.begin();
//! let sphere = metrics.time(TimingBucket::Tessellation, || tessellate_unit_sphere(40));
//! if let Some(report) = metrics.end(&mark) {
//!     println!("tessellation: {} ns", report.tessellation_ns);
//! }
//! ```

use serde::Serialize;

/// Phases of boundary generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingBucket {
    /// Sampling directions of the 2D curve.
    CurveSampling,
    /// Building a base unit-sphere tessellation on a cache miss.
    Tessellation,
    /// Scaling base vertices onto the Lk boundary.
    Deformation,
    /// Recomputing vertex normals.
    Normals,
    /// Edge topology and orientation checks.
    Diagnostics,
}

/// Cumulative nanoseconds per bucket.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct GeomTimingReport {
    pub curve_sampling_ns: u64,
    pub tessellation_ns: u64,
    pub deformation_ns: u64,
    pub normals_ns: u64,
    pub diagnostics_ns: u64,
}

impl GeomTimingReport {
    /// Returns the total time across all buckets in nanoseconds.
    #[must_use]
    pub fn total_ns(&self) -> u64 {
        self.curve_sampling_ns
            .saturating_add(self.tessellation_ns)
            .saturating_add(self.deformation_ns)
            .saturating_add(self.normals_ns)
            .saturating_add(self.diagnostics_ns)
    }

    /// Returns the total time in milliseconds (for display purposes).
    #[must_use]
    pub fn total_ms(&self) -> f64 {
        self.total_ns() as f64 / 1_000_000.0
    }

    /// Time accumulated after `earlier` was taken.
    #[must_use]
    pub fn since(&self, earlier: &Self) -> Self {
        Self {
            curve_sampling_ns: self.curve_sampling_ns.saturating_sub(earlier.curve_sampling_ns),
            tessellation_ns: self.tessellation_ns.saturating_sub(earlier.tessellation_ns),
            deformation_ns: self.deformation_ns.saturating_sub(earlier.deformation_ns),
            normals_ns: self.normals_ns.saturating_sub(earlier.normals_ns),
            diagnostics_ns: self.diagnostics_ns.saturating_sub(earlier.diagnostics_ns),
        }
    }
}

/// Start of a measured span, returned by [`GeomMetrics::begin`].
#[derive(Debug, Clone, Default)]
pub struct TimingMark {
    #[cfg(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32")))]
    start: GeomTimingReport,
}

/// Accumulator for timing geometry operations.
#[derive(Debug, Default)]
pub struct GeomMetrics {
    #[cfg(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32")))]
    report: GeomTimingReport,
}

impl GeomMetrics {
    /// Marks the start of a span without touching the running totals.
    #[must_use]
    pub fn begin(&self) -> TimingMark {
        #[cfg(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32")))]
        {
            TimingMark {
                start: self.report.clone(),
            }
        }
        #[cfg(not(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32"))))]
        {
            TimingMark::default()
        }
    }

    /// Time spent in each bucket since `mark`, or `None` if metrics are disabled.
    #[must_use]
    pub fn end(&self, mark: &TimingMark) -> Option<GeomTimingReport> {
        #[cfg(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32")))]
        {
            Some(self.report.since(&mark.start))
        }
        #[cfg(not(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32"))))]
        {
            let _ = mark;
            None
        }
    }

    /// Everything recorded since the context was created or last reset.
    #[must_use]
    pub fn report(&self) -> Option<GeomTimingReport> {
        self.end(&TimingMark::default())
    }

    /// Resets all timing counters to zero.
    pub fn reset(&mut self) {
        #[cfg(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32")))]
        {
            self.report = GeomTimingReport::default();
        }
    }

    /// Times the execution of `f` and accumulates the elapsed time in `bucket`.
    pub fn time<R>(&mut self, bucket: TimingBucket, f: impl FnOnce() -> R) -> R {
        #[cfg(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32")))]
        {
            let start = std::time::Instant::now();
            let result = f();
            let nanos = start.elapsed().as_nanos().min(u128::from(u64::MAX)) as u64;
            self.add_to_bucket(bucket, nanos);
            result
        }

        #[cfg(not(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32"))))]
        {
            let _ = bucket;
            f()
        }
    }

    #[cfg(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32")))]
    fn add_to_bucket(&mut self, bucket: TimingBucket, nanos: u64) {
        let slot = match bucket {
            TimingBucket::CurveSampling => &mut self.report.curve_sampling_ns,
            TimingBucket::Tessellation => &mut self.report.tessellation_ns,
            TimingBucket::Deformation => &mut self.report.deformation_ns,
            TimingBucket::Normals => &mut self.report.normals_ns,
            TimingBucket::Diagnostics => &mut self.report.diagnostics_ns,
        };
        *slot = slot.saturating_add(nanos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENABLED: bool = cfg!(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32")));

    #[test]
    fn test_timing_report_total() {
        let report = GeomTimingReport {
            tessellation_ns: 1000,
            deformation_ns: 2000,
            normals_ns: 3000,
            ..Default::default()
        };
        assert_eq!(report.total_ns(), 6000);
        assert!((report.total_ms() - 0.006).abs() < 1e-9);
    }

    #[test]
    fn test_since_subtracts_per_bucket() {
        let earlier = GeomTimingReport {
            curve_sampling_ns: 10,
            normals_ns: 5,
            ..Default::default()
        };
        let later = GeomTimingReport {
            curve_sampling_ns: 25,
            normals_ns: 5,
            diagnostics_ns: 7,
            ..Default::default()
        };
        let delta = later.since(&earlier);
        assert_eq!(delta.curve_sampling_ns, 15);
        assert_eq!(delta.normals_ns, 0);
        assert_eq!(delta.diagnostics_ns, 7);
    }

    #[test]
    fn test_time_returns_closure_result() {
        let mut metrics = GeomMetrics::default();
        let mark = metrics.begin();
        let result = metrics.time(TimingBucket::Deformation, || 42);
        assert_eq!(result, 42);
        assert_eq!(metrics.end(&mark).is_some(), ENABLED);
    }

    #[test]
    fn test_begin_keeps_running_totals() {
        let mut metrics = GeomMetrics::default();
        metrics.time(TimingBucket::CurveSampling, || std::thread::sleep(std::time::Duration::from_millis(2)));
        let mark = metrics.begin();
        metrics.time(TimingBucket::Normals, || std::thread::sleep(std::time::Duration::from_millis(2)));

        if ENABLED {
            let span = metrics.end(&mark).unwrap();
            assert_eq!(span.curve_sampling_ns, 0);
            assert!(span.normals_ns > 0);

            let total = metrics.report().unwrap();
            assert!(total.curve_sampling_ns > 0);
            assert!(total.normals_ns > 0);

            metrics.reset();
            assert_eq!(metrics.report().unwrap().total_ns(), 0);
        } else {
            assert!(metrics.end(&mark).is_none());
            assert!(metrics.report().is_none());
        }
    }
}
