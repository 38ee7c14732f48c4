//! Unit-sphere tessellation used as the base mesh for 3D boundaries.
//!
//! The sphere is a geodesic icosphere: every face of a regular icosahedron is
//! split into `resolution²` triangles by a triangular lattice, and every
//! lattice vertex is projected onto the unit sphere.
//!
//! Lattice vertices on shared icosahedron edges and corners are welded by
//! their exact barycentric weights rather than by position, so the result is
//! closed for every resolution without any tolerance.
//!
//! # Sizes
//!
//! - vertices: `10 · r² + 2`
//! - triangles: `20 · r²`
//!
//! # Example
//!
//! ```
//! use lknorm_engine::geom::tessellate_unit_sphere;
//!
//! let sphere = tessellate_unit_sphere(2);
//! assert_eq!(sphere.vertex_count(), 42);
//! assert_eq!(sphere.triangle_count(), 80);
//! ```

use std::collections::HashMap;

use super::core::Point3;

/// Golden ratio, the icosahedron's coordinate constant.
const PHI: f64 = 1.618_033_988_749_895;

#[rustfmt::skip]
const ICOSAHEDRON_VERTICES: [[f64; 3]; 12] = [
    [-1.0,  PHI,  0.0], [ 1.0,  PHI,  0.0], [-1.0, -PHI,  0.0], [ 1.0, -PHI,  0.0],
    [ 0.0, -1.0,  PHI], [ 0.0,  1.0,  PHI], [ 0.0, -1.0, -PHI], [ 0.0,  1.0, -PHI],
    [ PHI,  0.0, -1.0], [ PHI,  0.0,  1.0], [-PHI,  0.0, -1.0], [-PHI,  0.0,  1.0],
];

/// Counter-clockwise when seen from outside.
#[rustfmt::skip]
const ICOSAHEDRON_FACES: [[u32; 3]; 20] = [
    [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
    [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
    [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
    [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
];

/// Lattice vertex identity: `(corner, weight)` pairs with non-zero weight,
/// sorted by corner and padded with `(u32::MAX, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct LatticeKey([(u32, u32); 3]);

impl LatticeKey {
    fn new(corners: [u32; 3], weights: [u32; 3]) -> Self {
        let mut entries = [(u32::MAX, 0); 3];
        let mut len = 0;
        for (corner, weight) in corners.into_iter().zip(weights) {
            if weight > 0 {
                entries[len] = (corner, weight);
                len += 1;
            }
        }
        entries[..len].sort_unstable();
        Self(entries)
    }
}

/// A closed triangulation of the unit sphere.
///
/// Immutable once built; shared between boundary surfaces through the
/// [`GeomCache`](super::GeomCache).
#[derive(Debug, Clone, PartialEq)]
pub struct SphereTessellation {
    resolution: usize,
    positions: Vec<Point3>,
    indices: Vec<u32>,
}

impl SphereTessellation {
    #[must_use]
    pub const fn resolution(&self) -> usize {
        self.resolution
    }

    /// Unit-length vertex positions.
    #[must_use]
    pub fn positions(&self) -> &[Point3] {
        &self.positions
    }

    /// Triangle list, three indices per triangle.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex count for a given resolution (`10 · r² + 2`).
    #[must_use]
    pub const fn expected_vertex_count(resolution: usize) -> usize {
        10 * resolution * resolution + 2
    }

    /// Triangle count for a given resolution (`20 · r²`).
    #[must_use]
    pub const fn expected_triangle_count(resolution: usize) -> usize {
        20 * resolution * resolution
    }
}

/// Builds the geodesic unit sphere for `resolution` (clamped to at least 1).
#[must_use]
pub fn tessellate_unit_sphere(resolution: usize) -> SphereTessellation {
    let n = resolution.max(1);
    let corners: Vec<Point3> = ICOSAHEDRON_VERTICES
        .iter()
        .map(|&c| project_to_unit_sphere(Point3::from_array(c)))
        .collect();

    let mut positions: Vec<Point3> =
        Vec::with_capacity(SphereTessellation::expected_vertex_count(n));
    let mut indices: Vec<u32> = Vec::with_capacity(SphereTessellation::expected_triangle_count(n) * 3);
    let mut lookup: HashMap<LatticeKey, u32> = HashMap::with_capacity(positions.capacity());

    let n_u32 = n as u32;
    let n_f64 = n as f64;

    for face in ICOSAHEDRON_FACES {
        let [a, b, c] = face.map(|i| corners[i as usize]);

        // grid[i][j] is the lattice vertex a + (b - a)·i/n + (c - a)·j/n.
        let mut grid: Vec<Vec<u32>> = Vec::with_capacity(n + 1);
        for i in 0..=n {
            let mut row = Vec::with_capacity(n + 1 - i);
            for j in 0..=(n - i) {
                let (iu, ju) = (i as u32, j as u32);
                let key = LatticeKey::new(face, [n_u32 - iu - ju, iu, ju]);
                let id = *lookup.entry(key).or_insert_with(|| {
                    let along_b = a.lerp(b, i as f64 / n_f64);
                    let p = Point3::new(
                        along_b.x + (c.x - a.x) * (j as f64 / n_f64),
                        along_b.y + (c.y - a.y) * (j as f64 / n_f64),
                        along_b.z + (c.z - a.z) * (j as f64 / n_f64),
                    );
                    positions.push(project_to_unit_sphere(p));
                    (positions.len() - 1) as u32
                });
                row.push(id);
            }
            grid.push(row);
        }

        for i in 0..n {
            for j in 0..(n - i) {
                let p00 = grid[i][j];
                let p10 = grid[i + 1][j];
                let p01 = grid[i][j + 1];
                indices.extend_from_slice(&[p00, p10, p01]);
                if i + j + 1 < n {
                    let p11 = grid[i + 1][j + 1];
                    indices.extend_from_slice(&[p10, p11, p01]);
                }
            }
        }
    }

    log::debug!(
        "tessellated unit sphere r={n}: {} vertices, {} triangles",
        positions.len(),
        indices.len() / 3
    );

    SphereTessellation {
        resolution: n,
        positions,
        indices,
    }
}

fn project_to_unit_sphere(p: Point3) -> Point3 {
    // Lattice points lie on the icosahedron surface, never at the origin.
    let len = p.to_vec3().length();
    Point3::new(p.x / len, p.y / len, p.z / len)
}
