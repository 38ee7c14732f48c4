#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Geometry engine for unit-ball boundaries of Lk-norms.
//!
//! The core lives in [`norm`] (evaluation) and [`geom`] (2D curves and 3D
//! surfaces); [`export`] turns them into SVG and OBJ files. [`NormEngine`] is
//! the stateful facade used by the browser front end through `wasm-bindgen`.

pub mod export;
pub mod geom;
pub mod norm;

use std::fmt;

use export::{ExportError, SvgOptions, curve_to_svg, file_stem, write_obj};
use geom::{
    BoundaryCurve2D, BoundarySurface, DEFAULT_CURVE_POINTS, DEFAULT_SPHERE_RESOLUTION, GeomCacheStats,
    GeomContext, GeomMeshDiagnostics, GeomTimingReport, Point2, sample_boundary_2d_with_context,
};
use norm::{BoundaryError, NormParameter};
use serde::Serialize;
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

/// `k` the views start with.
pub const DEFAULT_K: f64 = 2.0;
/// Lower end of the UI slider. The core accepts any `k > 0`.
pub const K_MIN: f64 = 0.1;
/// Upper end of the UI slider.
pub const K_MAX: f64 = 10.0;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    // A second call (e.g. a re-initialized module) keeps the first logger.
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {}

/// Starts the rayon worker pool backing the `parallel` deformation path.
#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
#[wasm_bindgen]
pub async fn initialize_parallel(worker_count: Option<u32>) -> Result<(), JsError> {
    let threads = worker_count
        .map(|count| count.max(1) as usize)
        .or_else(|| {
            std::thread::available_parallelism()
                .map(|value| value.get())
                .ok()
        })
        .unwrap_or(1);

    wasm_bindgen_rayon::init_thread_pool(threads)
        .await
        .map_err(|err| JsError::new(&format!("could not start rayon thread pool: {err}")))
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

#[derive(Debug, Serialize)]
struct SurfaceExport<'a> {
    vertices: &'a [[f64; 3]],
    triangles: Vec<[u32; 3]>,
    normals: &'a [[f64; 3]],
}

#[derive(Debug, Serialize)]
struct EngineDiagnostics {
    k: f64,
    curve_points: usize,
    resolution: usize,
    surface: GeomMeshDiagnostics,
    cache: CacheExport,
    last_update: Option<GeomTimingReport>,
}

#[derive(Debug, Serialize)]
struct CacheExport {
    entries: usize,
    hits: usize,
    misses: usize,
    estimated_memory_bytes: usize,
}

impl From<GeomCacheStats> for CacheExport {
    fn from(stats: GeomCacheStats) -> Self {
        Self {
            entries: stats.sphere_entries,
            hits: stats.sphere_hits,
            misses: stats.sphere_misses,
            estimated_memory_bytes: stats.estimated_memory_bytes,
        }
    }
}

/// Stateful view model for the 2D and 3D boundary views.
///
/// Holds the current `k`, the sampled curve and the deformable surface. Every
/// update either succeeds completely or leaves the previous geometry in place.
#[wasm_bindgen]
pub struct NormEngine {
    k: NormParameter,
    ctx: GeomContext,
    curve: BoundaryCurve2D,
    surface: BoundarySurface,
    last_update: Option<GeomTimingReport>,
}

#[wasm_bindgen]
impl NormEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<NormEngine, JsValue> {
        Self::with_defaults().map_err(to_js_error)
    }

    /// Current `k` (`Infinity` for the max norm).
    #[wasm_bindgen]
    pub fn k(&self) -> f64 {
        self.k.value()
    }

    /// Re-samples the curve and re-deforms the surface for `k`.
    #[wasm_bindgen]
    pub fn set_k(&mut self, k: f64) -> Result<(), JsValue> {
        self.update_k(k).map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn set_curve_points(&mut self, num_points: usize) -> Result<(), JsValue> {
        self.update_curve_points(num_points).map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn set_resolution(&mut self, resolution: usize) -> Result<(), JsValue> {
        self.update_resolution(resolution).map_err(to_js_error)
    }

    /// The 2D boundary as an array of `{ x, y }`.
    #[wasm_bindgen]
    pub fn curve(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.curve.points()).map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// The 3D boundary as `{ vertices, triangles, normals }`.
    #[wasm_bindgen]
    pub fn surface(&self) -> Result<JsValue, JsValue> {
        let mesh = self.surface.mesh();
        let export = SurfaceExport {
            vertices: &mesh.positions,
            triangles: mesh.triangles().collect(),
            normals: &mesh.normals,
        };
        serde_wasm_bindgen::to_value(&export).map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Captures the current 2D view as an SVG document.
    #[wasm_bindgen]
    pub fn export_svg(&self, width: f64, height: f64) -> Result<String, JsValue> {
        self.render_svg(&SvgOptions::with_size(width, height)).map_err(to_js_error)
    }

    /// Captures the current 3D view as an OBJ file.
    #[wasm_bindgen]
    pub fn export_obj(&self) -> Result<String, JsValue> {
        self.render_obj().map_err(to_js_error)
    }

    /// Suggested download name without extension, e.g. `lk_norm_2.0_visualization`.
    #[wasm_bindgen]
    pub fn export_file_stem(&self) -> String {
        file_stem(self.k)
    }

    /// Mesh diagnostics and cache statistics for the current state.
    #[wasm_bindgen]
    pub fn diagnostics(&self) -> Result<JsValue, JsValue> {
        let report = EngineDiagnostics {
            k: self.k.value(),
            curve_points: self.curve.len(),
            resolution: self.surface.resolution(),
            surface: self.surface.diagnostics(),
            cache: self.ctx.cache.stats().into(),
            last_update: self.last_update.clone(),
        };
        serde_wasm_bindgen::to_value(&report).map_err(|err| JsError::new(&err.to_string()).into())
    }
}

impl NormEngine {
    /// Engine at [`DEFAULT_K`] with the default sample counts.
    pub fn with_defaults() -> Result<Self, BoundaryError> {
        let mut ctx = GeomContext::new();
        let mark = ctx.metrics.begin();
        let curve = sample_boundary_2d_with_context(DEFAULT_K, DEFAULT_CURVE_POINTS, &mut ctx)?;
        let surface = BoundarySurface::with_context(DEFAULT_K, DEFAULT_SPHERE_RESOLUTION, &mut ctx)?;
        let last_update = ctx.metrics.end(&mark);
        Ok(Self {
            k: curve.k(),
            ctx,
            curve,
            surface,
            last_update,
        })
    }

    pub fn update_k(&mut self, k: f64) -> Result<(), BoundaryError> {
        let mark = self.ctx.metrics.begin();
        let curve = sample_boundary_2d_with_context(k, self.curve.len(), &mut self.ctx)?;
        self.surface.set_k_with_context(k, &mut self.ctx)?;
        self.k = curve.k();
        self.curve = curve;
        self.last_update = self.ctx.metrics.end(&mark);
        debug_log!("k -> {}", self.k);
        Ok(())
    }

    pub fn update_curve_points(&mut self, num_points: usize) -> Result<(), BoundaryError> {
        let mark = self.ctx.metrics.begin();
        self.curve = sample_boundary_2d_with_context(self.k.value(), num_points, &mut self.ctx)?;
        self.last_update = self.ctx.metrics.end(&mark);
        Ok(())
    }

    pub fn update_resolution(&mut self, resolution: usize) -> Result<(), BoundaryError> {
        let mark = self.ctx.metrics.begin();
        self.surface.set_resolution(resolution, &mut self.ctx)?;
        self.last_update = self.ctx.metrics.end(&mark);
        Ok(())
    }

    /// Per-phase timing of the last successful update (curve and surface
    /// together), when `mesh_engine_metrics` is enabled.
    #[must_use]
    pub fn last_update_timing(&self) -> Option<&GeomTimingReport> {
        self.last_update.as_ref()
    }

    #[must_use]
    pub fn parameter(&self) -> NormParameter {
        self.k
    }

    #[must_use]
    pub fn boundary_curve(&self) -> &BoundaryCurve2D {
        &self.curve
    }

    #[must_use]
    pub fn boundary_surface(&self) -> &BoundarySurface {
        &self.surface
    }

    #[must_use]
    pub fn cache_stats(&self) -> GeomCacheStats {
        self.ctx.cache.stats()
    }

    pub fn render_svg(&self, options: &SvgOptions) -> Result<String, ExportError> {
        curve_to_svg(&self.curve, options)
    }

    pub fn render_obj(&self) -> Result<String, ExportError> {
        let mut out = Vec::new();
        write_obj(self.surface.mesh(), &file_stem(self.k), &mut out)?;
        Ok(String::from_utf8(out)?)
    }
}

/// Lk-norm of `vector`; `k` may be `Infinity`.
#[wasm_bindgen(js_name = lk_norm)]
pub fn lk_norm_js(vector: &[f64], k: f64) -> f64 {
    norm::lk_norm(vector, k)
}

/// Samples the 2D boundary as an array of `{ x, y }`.
#[wasm_bindgen(js_name = sample_boundary_2d)]
pub fn sample_boundary_2d_js(k: f64, num_points: usize) -> Result<JsValue, JsValue> {
    let curve = geom::sample_boundary_2d(k, num_points).map_err(to_js_error)?;
    let points: &[Point2] = curve.points();
    serde_wasm_bindgen::to_value(&points).map_err(|err| JsError::new(&err.to_string()).into())
}

/// Samples the 3D boundary as `{ vertices, triangles, normals }`.
#[wasm_bindgen(js_name = sample_boundary_3d)]
pub fn sample_boundary_3d_js(k: f64, resolution: usize) -> Result<JsValue, JsValue> {
    let mesh = geom::sample_boundary_3d(k, resolution).map_err(to_js_error)?;
    let export = SurfaceExport {
        vertices: &mesh.positions,
        triangles: mesh.triangles().collect(),
        normals: &mesh.normals,
    };
    serde_wasm_bindgen::to_value(&export).map_err(|err| JsError::new(&err.to_string()).into())
}

/// Slider range and default as `[min, max, default]`.
#[wasm_bindgen]
pub fn k_range() -> Vec<f64> {
    vec![K_MIN, K_MAX, DEFAULT_K]
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    log::warn!("{error}");
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_views() {
        let engine = NormEngine::with_defaults().unwrap();
        assert_eq!(engine.k(), DEFAULT_K);
        assert_eq!(engine.boundary_curve().len(), DEFAULT_CURVE_POINTS);
        assert_eq!(engine.boundary_surface().resolution(), DEFAULT_SPHERE_RESOLUTION);
        assert_eq!(engine.export_file_stem(), "lk_norm_2.0_visualization");
    }

    #[test]
    fn update_k_moves_both_views() {
        let mut engine = NormEngine::with_defaults().unwrap();
        engine.update_curve_points(64).unwrap();
        engine.update_resolution(4).unwrap();

        engine.update_k(1.0).unwrap();
        assert_eq!(engine.parameter(), NormParameter::Finite(1.0));
        assert_eq!(engine.boundary_curve().k(), NormParameter::Finite(1.0));
        assert_eq!(engine.boundary_surface().k(), NormParameter::Finite(1.0));
        for p in engine.boundary_curve().points() {
            assert!((p.x.abs() + p.y.abs() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn failed_update_keeps_previous_state() {
        let mut engine = NormEngine::with_defaults().unwrap();
        engine.update_resolution(3).unwrap();
        engine.update_k(3.0).unwrap();
        let curve = engine.boundary_curve().clone();
        let mesh = engine.boundary_surface().mesh().clone();

        assert!(engine.update_k(0.0).is_err());
        assert!(engine.update_k(f64::NAN).is_err());
        assert!(engine.update_curve_points(2).is_err());
        assert!(engine.update_resolution(0).is_err());
        // The JS-facing wrappers report errors without touching the state.
        assert!(engine.set_k(-2.0).is_err());

        assert_eq!(engine.k(), 3.0);
        assert_eq!(engine.boundary_curve(), &curve);
        assert_eq!(engine.boundary_surface().mesh(), &mesh);
    }

    #[test]
    fn exports_capture_current_geometry() {
        let mut engine = NormEngine::with_defaults().unwrap();
        engine.update_resolution(2).unwrap();
        engine.update_k(f64::INFINITY).unwrap();

        let svg = engine.export_svg(300.0, 300.0).unwrap();
        assert!(svg.contains("L∞-norm boundary"));
        assert!(engine.export_svg(0.0, 300.0).is_err());

        let obj = engine.export_obj().unwrap();
        assert!(obj.contains("o lk_norm_inf_visualization\n"));
        assert_eq!(obj.lines().filter(|l| l.starts_with("f ")).count(), 80);
    }

    #[test]
    fn update_timing_includes_curve_and_surface() {
        let mut engine = NormEngine::with_defaults().unwrap();
        engine.update_curve_points(50_000).unwrap();
        engine.update_resolution(9).unwrap();
        engine.update_k(3.0).unwrap();

        match engine.last_update_timing() {
            Some(timing) => {
                assert!(timing.curve_sampling_ns > 0);
                assert!(timing.deformation_ns > 0);
                assert_eq!(timing.tessellation_ns, 0);
            }
            None => assert!(!cfg!(feature = "mesh_engine_metrics")),
        }
    }

    #[test]
    fn js_entry_points_delegate_to_the_core() {
        assert!((lk_norm_js(&[3.0, 4.0], 2.0) - 5.0).abs() < 1e-12);
        assert_eq!(lk_norm_js(&[1.0, -1.0], f64::INFINITY), 1.0);
    }

    #[test]
    fn k_range_brackets_the_default() {
        let range = k_range();
        assert_eq!(range.len(), 3);
        let (min, max, default) = (range[0], range[1], range[2]);
        assert!(min < default && default < max);
    }
}
