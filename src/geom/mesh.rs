use std::collections::HashMap;

use super::Vec3;
use super::cache::GeomCache;
use super::diagnostics::GeomMeshDiagnostics;
use super::metrics::GeomMetrics;

/// Reusable state for `*_with_context` generators: the base tessellation
/// cache and the timing accumulator.
#[derive(Debug, Default)]
pub struct GeomContext {
    pub cache: GeomCache,
    pub metrics: GeomMetrics,
}

impl GeomContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Indexed triangle mesh with per-vertex normals.
///
/// `indices` is a triangle list, counter-clockwise when seen from outside.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeomMesh {
    pub positions: Vec<[f64; 3]>,
    pub indices: Vec<u32>,
    pub normals: Vec<[f64; 3]>,
}

impl GeomMesh {
    /// Create a mesh and derive smooth normals from its faces.
    #[must_use]
    pub fn new(positions: Vec<[f64; 3]>, indices: Vec<u32>) -> Self {
        let mut mesh = Self {
            positions,
            indices,
            normals: Vec::new(),
        };
        mesh.recompute_normals();
        mesh
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Iterates triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Recomputes `normals` from the current positions, reusing the buffer.
    pub fn recompute_normals(&mut self) {
        compute_smooth_normals_into(&self.positions, &self.indices, &mut self.normals);
    }

    /// Returns true if any vertex position contains NaN or Inf values.
    #[must_use]
    pub fn has_invalid_vertices(&self) -> bool {
        self.positions
            .iter()
            .any(|p| !p[0].is_finite() || !p[1].is_finite() || !p[2].is_finite())
    }

    /// Returns true if all vertex indices are within bounds.
    #[must_use]
    pub fn has_valid_indices(&self) -> bool {
        let n = self.positions.len() as u32;
        self.indices.iter().all(|&i| i < n)
    }

    /// Returns true if indices represent a triangle list.
    #[must_use]
    pub fn has_triangle_indices(&self) -> bool {
        self.indices.len() % 3 == 0
    }

    #[must_use]
    pub fn has_valid_attribute_lengths(&self) -> bool {
        self.normals.len() == self.positions.len()
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.has_triangle_indices() {
            return Err("mesh indices are not a triangle list (len % 3 != 0)".to_string());
        }
        if self.has_invalid_vertices() {
            return Err("mesh has invalid vertex coordinates (NaN/Inf)".to_string());
        }
        if !self.has_valid_indices() {
            return Err("mesh has out-of-bounds vertex indices".to_string());
        }
        if !self.has_valid_attribute_lengths() {
            return Err("mesh normal buffer does not match vertex count".to_string());
        }
        Ok(())
    }

    /// Returns the position buffer as a flat slice: `[x0, y0, z0, x1, y1, z1, ...]`.
    ///
    /// Zero-copy, for adapters that upload packed buffers to the GPU.
    #[must_use]
    pub fn positions_flat(&self) -> &[f64] {
        flatten_f64_array_slice::<3>(&self.positions)
    }

    /// Returns the normal buffer as a flat slice: `[nx0, ny0, nz0, ...]`.
    #[must_use]
    pub fn normals_flat(&self) -> &[f64] {
        flatten_f64_array_slice::<3>(&self.normals)
    }

    /// Topology and orientation report for this mesh.
    #[must_use]
    pub fn diagnostics(&self) -> GeomMeshDiagnostics {
        let (open_edge_count, non_manifold_edge_count) = count_edge_topology(&self.indices);
        let degenerate_triangle_count = count_degenerate_triangles(&self.positions, &self.indices);

        let mut diagnostics = GeomMeshDiagnostics {
            vertex_count: self.vertex_count(),
            triangle_count: self.triangle_count(),
            open_edge_count,
            non_manifold_edge_count,
            degenerate_triangle_count,
            ..GeomMeshDiagnostics::default()
        };

        if open_edge_count > 0 {
            diagnostics.add_warning("mesh has open edges");
        }
        if non_manifold_edge_count > 0 {
            diagnostics.add_warning("mesh has non-manifold edges");
        }
        if open_edge_count == 0 && non_manifold_edge_count == 0 {
            let volume = signed_volume(&self.positions, &self.indices);
            if !(volume.is_finite() && volume > 0.0) {
                diagnostics.add_warning(format!("mesh is not outward oriented (volume {volume})"));
            }
        }
        diagnostics
    }
}

fn flatten_f64_array_slice<const N: usize>(data: &[[f64; N]]) -> &[f64] {
    let count = data.len().checked_mul(N).unwrap_or(0);
    let ptr = data.as_ptr().cast::<f64>();
    // SAFETY: `[[f64; N]]` is stored contiguously, and we compute the element count as `len * N`.
    unsafe { std::slice::from_raw_parts(ptr, count) }
}

/// Returns `(open_edge_count, non_manifold_edge_count)`.
pub(crate) fn count_edge_topology(indices: &[u32]) -> (usize, usize) {
    let mut edge_counts: HashMap<(u32, u32), u32> = HashMap::new();

    for tri in indices.chunks_exact(3) {
        let i0 = tri[0];
        let i1 = tri[1];
        let i2 = tri[2];

        if i0 == i1 || i1 == i2 || i0 == i2 {
            continue;
        }

        let edges = [(i0, i1), (i1, i2), (i2, i0)];
        for (ea, eb) in edges {
            let (lo, hi) = if ea <= eb { (ea, eb) } else { (eb, ea) };
            *edge_counts.entry((lo, hi)).or_insert(0) += 1;
        }
    }

    let mut open_edge_count = 0usize;
    let mut non_manifold_edge_count = 0usize;
    for (_edge, count) in edge_counts {
        if count == 1 {
            open_edge_count += 1;
        } else if count > 2 {
            non_manifold_edge_count += 1;
        }
    }

    (open_edge_count, non_manifold_edge_count)
}

fn count_degenerate_triangles(points: &[[f64; 3]], indices: &[u32]) -> usize {
    indices
        .chunks_exact(3)
        .filter(|tri| {
            let (Some(a), Some(b), Some(c)) = (
                points.get(tri[0] as usize),
                points.get(tri[1] as usize),
                points.get(tri[2] as usize),
            ) else {
                return true;
            };
            let (a, b, c) = (Vec3::from(*a), Vec3::from(*b), Vec3::from(*c));
            let area2 = (b - a).cross(c - a).length();
            !(area2.is_finite() && area2 > 0.0)
        })
        .count()
}

pub(crate) fn signed_volume(points: &[[f64; 3]], indices: &[u32]) -> f64 {
    let mut volume = 0.0;
    for tri in indices.chunks_exact(3) {
        let (Some(a), Some(b), Some(c)) = (
            points.get(tri[0] as usize),
            points.get(tri[1] as usize),
            points.get(tri[2] as usize),
        ) else {
            continue;
        };

        let av = Vec3::from(*a);
        let bv = Vec3::from(*b);
        let cv = Vec3::from(*c);
        volume += av.dot(bv.cross(cv));
    }

    volume / 6.0
}

/// Area-weighted vertex normals written into `normals` (resized to match).
fn compute_smooth_normals_into(points: &[[f64; 3]], indices: &[u32], normals: &mut Vec<[f64; 3]>) {
    normals.clear();
    normals.resize(points.len(), [0.0, 0.0, 0.0]);

    for tri in indices.chunks_exact(3) {
        let i0 = tri[0] as usize;
        let i1 = tri[1] as usize;
        let i2 = tri[2] as usize;

        let (Some(a), Some(b), Some(c)) = (points.get(i0), points.get(i1), points.get(i2)) else {
            continue;
        };

        let abx = b[0] - a[0];
        let aby = b[1] - a[1];
        let abz = b[2] - a[2];

        let acx = c[0] - a[0];
        let acy = c[1] - a[1];
        let acz = c[2] - a[2];

        let nx = aby * acz - abz * acy;
        let ny = abz * acx - abx * acz;
        let nz = abx * acy - aby * acx;

        for i in [i0, i1, i2] {
            normals[i][0] += nx;
            normals[i][1] += ny;
            normals[i][2] += nz;
        }
    }

    for (n, p) in normals.iter_mut().zip(points) {
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        if len.is_finite() && len > 0.0 {
            let inv = 1.0 / len;
            n[0] *= inv;
            n[1] *= inv;
            n[2] *= inv;
        } else {
            // Isolated or fully degenerate vertex: fall back to the radial direction.
            *n = Vec3::from(*p).normalized().map_or([0.0, 0.0, 1.0], Vec3::to_array);
        }
    }
}
