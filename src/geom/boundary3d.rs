//! 3D Lk unit-ball boundary surfaces.
//!
//! The surface is a deformed unit sphere: every vertex `v` of a geodesic
//! sphere tessellation is replaced by `v / ‖v‖_k`, which lies on the
//! boundary by homogeneity of the norm. The index buffer is never touched, so
//! the mesh stays closed for every `k`.
//!
//! Generation is split in two phases:
//!
//! 1. the base tessellation, built once per resolution and shared through
//!    the [`GeomCache`](super::GeomCache);
//! 2. the deformation pass, which rewrites only the position and normal
//!    buffers of a [`BoundarySurface`] when `k` changes.
//!
//! ```
//! use lknorm_engine::geom::BoundarySurface;
//!
//! let mut surface = BoundarySurface::new(2.0, 8).unwrap();
//! let triangles = surface.mesh().indices.clone();
//! surface.set_k(4.0).unwrap();
//! assert_eq!(surface.mesh().indices, triangles);
//! ```

use std::sync::Arc;

use super::diagnostics::GeomMeshDiagnostics;
use super::mesh::{GeomContext, GeomMesh};
use super::metrics::{GeomTimingReport, TimingBucket};
use super::tessellation::{SphereTessellation, tessellate_unit_sphere};
use super::Point3;
use crate::norm::{BoundaryError, NormParameter, scale_to_boundary};

/// Resolution used by the interactive 3D view.
pub const DEFAULT_SPHERE_RESOLUTION: usize = 40;

/// Smallest resolution (the plain icosahedron).
pub const MIN_SPHERE_RESOLUTION: usize = 1;

/// A boundary mesh that can be re-deformed in place for a new `k`.
#[derive(Debug, Clone)]
pub struct BoundarySurface {
    k: NormParameter,
    base: Arc<SphereTessellation>,
    mesh: GeomMesh,
    // Reused between deformations so a failed update leaves `mesh` intact.
    scratch: Vec<[f64; 3]>,
    timing: Option<GeomTimingReport>,
}

impl BoundarySurface {
    /// Builds a surface for `k` at `resolution` with a throwaway context.
    pub fn new(k: f64, resolution: usize) -> Result<Self, BoundaryError> {
        let mut ctx = GeomContext::new();
        Self::with_context(k, resolution, &mut ctx)
    }

    /// Builds a surface, taking the base tessellation from `ctx.cache`.
    ///
    /// # Errors
    ///
    /// [`BoundaryError::InvalidParameter`] for `resolution < 1` or an invalid
    /// `k`; [`BoundaryError::NumericDegeneracy`] if a vertex norm is zero or
    /// not finite.
    pub fn with_context(
        k: f64,
        resolution: usize,
        ctx: &mut GeomContext,
    ) -> Result<Self, BoundaryError> {
        validate_resolution(resolution)?;
        let k = NormParameter::new(k)?;

        let mark = ctx.metrics.begin();
        let GeomContext { cache, metrics } = &mut *ctx;
        let base = cache.get_or_insert_sphere_with(resolution, |r| {
            metrics.time(TimingBucket::Tessellation, || tessellate_unit_sphere(r))
        });

        let mut surface = Self {
            k,
            mesh: GeomMesh {
                positions: Vec::with_capacity(base.vertex_count()),
                indices: base.indices().to_vec(),
                normals: Vec::with_capacity(base.vertex_count()),
            },
            scratch: Vec::with_capacity(base.vertex_count()),
            base,
            timing: None,
        };
        surface.deform(k, ctx)?;

        let diagnostics = ctx
            .metrics
            .time(TimingBucket::Diagnostics, || surface.mesh.diagnostics());
        if diagnostics.has_warnings() {
            for warning in &diagnostics.warnings {
                log::warn!("boundary surface k={k} r={resolution}: {warning}");
            }
        }
        surface.timing = ctx.metrics.end(&mark);

        log::debug!(
            "built 3D boundary k={k} r={resolution}: {}",
            diagnostics.summary()
        );
        Ok(surface)
    }

    /// Re-deforms the existing base tessellation for a new `k`.
    ///
    /// On error the previous geometry is kept.
    pub fn set_k(&mut self, k: f64) -> Result<(), BoundaryError> {
        let mut ctx = GeomContext::new();
        self.set_k_with_context(k, &mut ctx)
    }

    pub fn set_k_with_context(&mut self, k: f64, ctx: &mut GeomContext) -> Result<(), BoundaryError> {
        let k = NormParameter::new(k)?;
        let mark = ctx.metrics.begin();
        self.deform(k, ctx)?;
        self.timing = ctx.metrics.end(&mark);
        log::debug!("re-deformed 3D boundary to k={k} ({} vertices)", self.mesh.vertex_count());
        Ok(())
    }

    /// Swaps in the base tessellation for `resolution` and re-deforms with
    /// the current `k`. A no-op when the resolution is unchanged.
    pub fn set_resolution(
        &mut self,
        resolution: usize,
        ctx: &mut GeomContext,
    ) -> Result<(), BoundaryError> {
        validate_resolution(resolution)?;
        if resolution == self.resolution() {
            return Ok(());
        }
        *self = Self::with_context(self.k.value(), resolution, ctx)?;
        Ok(())
    }

    #[must_use]
    pub const fn k(&self) -> NormParameter {
        self.k
    }

    #[must_use]
    pub fn resolution(&self) -> usize {
        self.base.resolution()
    }

    #[must_use]
    pub fn mesh(&self) -> &GeomMesh {
        &self.mesh
    }

    #[must_use]
    pub fn into_mesh(self) -> GeomMesh {
        self.mesh
    }

    /// Unit-sphere positions the surface is deformed from.
    #[must_use]
    pub fn base_positions(&self) -> &[Point3] {
        self.base.positions()
    }

    /// Full diagnostics for the current geometry, with the timing of the
    /// last build or update when metrics are enabled.
    #[must_use]
    pub fn diagnostics(&self) -> GeomMeshDiagnostics {
        let mut diagnostics = self.mesh.diagnostics();
        diagnostics.timing = self.timing.clone();
        diagnostics
    }

    fn deform(&mut self, k: NormParameter, ctx: &mut GeomContext) -> Result<(), BoundaryError> {
        let base = self.base.positions();
        let scratch = &mut self.scratch;
        ctx.metrics
            .time(TimingBucket::Deformation, || deform_vertices(base, k, scratch))?;

        std::mem::swap(&mut self.mesh.positions, &mut self.scratch);
        self.k = k;
        ctx.metrics
            .time(TimingBucket::Normals, || self.mesh.recompute_normals());
        Ok(())
    }
}

/// Samples the closed boundary mesh for `k` at `resolution`.
///
/// The mesh has `10·r² + 2` vertices and `20·r²` triangles; every vertex
/// satisfies `‖v‖_k = 1` and normals point outward.
///
/// # Errors
///
/// See [`BoundarySurface::with_context`].
pub fn sample_boundary_3d(k: f64, resolution: usize) -> Result<GeomMesh, BoundaryError> {
    BoundarySurface::new(k, resolution).map(BoundarySurface::into_mesh)
}

pub fn sample_boundary_3d_with_context(
    k: f64,
    resolution: usize,
    ctx: &mut GeomContext,
) -> Result<GeomMesh, BoundaryError> {
    BoundarySurface::with_context(k, resolution, ctx).map(BoundarySurface::into_mesh)
}

fn validate_resolution(resolution: usize) -> Result<(), BoundaryError> {
    if resolution < MIN_SPHERE_RESOLUTION {
        return Err(BoundaryError::invalid(
            "resolution",
            format!("must be at least {MIN_SPHERE_RESOLUTION}, got {resolution}"),
        ));
    }
    Ok(())
}

cfg_if::cfg_if! {
    if #[cfg(feature = "parallel")] {
        fn deform_vertices(
            base: &[Point3],
            k: NormParameter,
            out: &mut Vec<[f64; 3]>,
        ) -> Result<(), BoundaryError> {
            use rayon::prelude::*;

            out.clear();
            out.resize(base.len(), [0.0; 3]);
            out.par_iter_mut()
                .zip(base.par_iter())
                .enumerate()
                .try_for_each(|(i, (slot, p))| {
                    *slot = scale_to_boundary(p.to_array(), k, i)?;
                    Ok(())
                })
        }
    } else {
        fn deform_vertices(
            base: &[Point3],
            k: NormParameter,
            out: &mut Vec<[f64; 3]>,
        ) -> Result<(), BoundaryError> {
            out.clear();
            out.resize(base.len(), [0.0; 3]);
            out.iter_mut()
                .zip(base)
                .enumerate()
                .try_for_each(|(i, (slot, p))| {
                    *slot = scale_to_boundary(p.to_array(), k, i)?;
                    Ok(())
                })
        }
    }
}
