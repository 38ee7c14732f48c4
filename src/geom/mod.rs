mod boundary2d;
mod boundary3d;
mod cache;
mod core;
mod diagnostics;
mod mesh;
mod metrics;
mod tessellation;

pub use boundary2d::{
    BoundaryCurve2D, DEFAULT_CURVE_POINTS, MIN_CURVE_POINTS, sample_boundary_2d,
    sample_boundary_2d_with_context,
};
pub use boundary3d::{
    BoundarySurface, DEFAULT_SPHERE_RESOLUTION, MIN_SPHERE_RESOLUTION, sample_boundary_3d,
    sample_boundary_3d_with_context,
};
pub use cache::{GeomCache, GeomCacheStats};
pub use core::{Point2, Point3, Vec3};
pub use diagnostics::GeomMeshDiagnostics;
pub use mesh::{GeomContext, GeomMesh};
pub use metrics::{GeomMetrics, GeomTimingReport, TimingBucket};
pub use tessellation::{SphereTessellation, tessellate_unit_sphere};

#[cfg(test)]
mod tests;
