//! Mesh diagnostics for generated boundary surfaces.
//!
//! Diagnostics report the topology of a mesh (open and non-manifold edges),
//! degenerate faces and orientation. Every boundary surface is checked after
//! it is built; warnings are logged, never repaired.
//!
//! # Example
//!
//! ```
//! use lknorm_engine::geom::sample_boundary_3d;
//!
//! let mesh = sample_boundary_3d(2.0, 4).unwrap();
//! let diagnostics = mesh.diagnostics();
//! assert!(diagnostics.is_watertight());
//! assert!(diagnostics.is_manifold());
//! ```

use std::fmt;

use serde::Serialize;

/// Topology and quality report for a triangle mesh.
///
/// - `open_edge_count`: edges with only one adjacent triangle (holes)
/// - `non_manifold_edge_count`: edges with more than two adjacent triangles
/// - `degenerate_triangle_count`: zero-area or non-finite triangles
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct GeomMeshDiagnostics {
    /// Total number of vertices in the mesh.
    pub vertex_count: usize,

    /// Total number of triangles in the mesh.
    pub triangle_count: usize,

    /// Number of zero-area triangles. Counted, never removed.
    pub degenerate_triangle_count: usize,

    /// Number of open (boundary) edges. Zero for a watertight mesh.
    pub open_edge_count: usize,

    /// Number of edges shared by more than two triangles.
    pub non_manifold_edge_count: usize,

    /// Optional timing breakdown.
    ///
    /// Only populated when the `mesh_engine_metrics` feature is enabled
    /// and the target is not WASM.
    pub timing: Option<super::metrics::GeomTimingReport>,

    /// Human-readable warnings, e.g. "mesh has open edges".
    pub warnings: Vec<String>,
}

impl GeomMeshDiagnostics {
    /// Returns `true` if the mesh has no open edges.
    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.open_edge_count == 0
    }

    /// Returns `true` if no edge has more than two adjacent triangles.
    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.non_manifold_edge_count == 0
    }

    /// Returns `true` if the mesh is both watertight and manifold.
    #[must_use]
    pub fn is_valid_solid(&self) -> bool {
        self.is_watertight() && self.is_manifold()
    }

    /// Returns `true` if no issues of any kind were detected.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.is_valid_solid() && self.degenerate_triangle_count == 0 && self.warnings.is_empty()
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns the total number of topology issues (open + non-manifold edges).
    #[must_use]
    pub fn topology_issue_count(&self) -> usize {
        self.open_edge_count + self.non_manifold_edge_count
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Returns a short summary string suitable for logging.
    ///
    /// Format: `"V:{vertices} T:{triangles} [issues...]"`
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("V:{} T:{}", self.vertex_count, self.triangle_count)];

        if self.degenerate_triangle_count > 0 {
            parts.push(format!("degenerate:{}", self.degenerate_triangle_count));
        }
        if self.open_edge_count > 0 {
            parts.push(format!("open:{}", self.open_edge_count));
        }
        if self.non_manifold_edge_count > 0 {
            parts.push(format!("non-manifold:{}", self.non_manifold_edge_count));
        }

        parts.join(" ")
    }
}

impl fmt::Display for GeomMeshDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mesh Diagnostics:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Triangles: {}", self.triangle_count)?;

        if self.degenerate_triangle_count > 0 {
            writeln!(f, "  Degenerate triangles: {}", self.degenerate_triangle_count)?;
        }

        if self.topology_issue_count() > 0 {
            writeln!(f, "  Topology issues:")?;
            if self.open_edge_count > 0 {
                writeln!(f, "    - Open edges: {}", self.open_edge_count)?;
            }
            if self.non_manifold_edge_count > 0 {
                writeln!(f, "    - Non-manifold edges: {}", self.non_manifold_edge_count)?;
            }
        }

        if !self.warnings.is_empty() {
            writeln!(f, "  Warnings:")?;
            for warning in &self.warnings {
                writeln!(f, "    - {warning}")?;
            }
        }

        if let Some(ref timing) = self.timing {
            writeln!(f, "  Timing: {} ms total", timing.total_ms())?;
        }

        let status = if self.is_clean() {
            "CLEAN"
        } else if self.is_valid_solid() {
            "CLOSED (with warnings)"
        } else {
            "ISSUES DETECTED"
        };
        writeln!(f, "  Status: {status}")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_clean() {
        let diag = GeomMeshDiagnostics::default();
        assert!(diag.is_clean());
        assert!(diag.is_valid_solid());
        assert!(!diag.has_warnings());
    }

    #[test]
    fn test_open_edges_not_watertight() {
        let diag = GeomMeshDiagnostics {
            open_edge_count: 3,
            ..Default::default()
        };
        assert!(!diag.is_watertight());
        assert!(diag.is_manifold());
        assert!(!diag.is_valid_solid());
        assert!(!diag.is_clean());
    }

    #[test]
    fn test_summary_lists_issues() {
        let diag = GeomMeshDiagnostics {
            vertex_count: 42,
            triangle_count: 80,
            open_edge_count: 2,
            ..Default::default()
        };

        let summary = diag.summary();
        assert!(summary.contains("V:42"));
        assert!(summary.contains("T:80"));
        assert!(summary.contains("open:2"));
        assert!(!summary.contains("degenerate"));
    }

    #[test]
    fn test_display_status() {
        let mut diag = GeomMeshDiagnostics {
            vertex_count: 12,
            triangle_count: 20,
            ..Default::default()
        };
        assert!(format!("{diag}").contains("CLEAN"));

        diag.add_warning("mesh is not outward oriented (volume -1)");
        let output = format!("{diag}");
        assert!(output.contains("CLOSED (with warnings)"));
        assert!(output.contains("outward"));
    }
}
