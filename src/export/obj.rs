//! Wavefront OBJ output for boundary meshes.

use std::io::Write;

use super::ExportError;
use crate::geom::GeomMesh;

/// Writes `mesh` as a single OBJ object with positions, normals and
/// 1-based `f a//a b//b c//c` faces.
///
/// The mesh is validated first; nothing is written for an invalid mesh.
pub fn write_obj<W: Write>(mesh: &GeomMesh, name: &str, mut w: W) -> Result<(), ExportError> {
    mesh.validate().map_err(ExportError::Mesh)?;

    writeln!(w, "# lknorm-engine")?;
    writeln!(w, "o {name}")?;

    for p in &mesh.positions {
        writeln!(w, "v {} {} {}", p[0], p[1], p[2])?;
    }
    for n in &mesh.normals {
        writeln!(w, "vn {} {} {}", n[0], n[1], n[2])?;
    }
    for [a, b, c] in mesh.triangles() {
        let (a, b, c) = (a + 1, b + 1, c + 1);
        writeln!(w, "f {a}//{a} {b}//{b} {c}//{c}")?;
    }

    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::sample_boundary_3d;

    #[test]
    fn line_counts_match_mesh() {
        let mesh = sample_boundary_3d(1.0, 2).unwrap();
        let mut out = Vec::new();
        write_obj(&mesh, "octahedron", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let count = |prefix: &str| text.lines().filter(|l| l.starts_with(prefix)).count();
        assert_eq!(count("v "), 42);
        assert_eq!(count("vn "), 42);
        assert_eq!(count("f "), 80);
        assert!(text.contains("\no octahedron\n"));
    }

    #[test]
    fn faces_are_one_based() {
        let mesh = GeomMesh::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![0, 1, 2],
        );
        let mut out = Vec::new();
        write_obj(&mesh, "tri", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("f 1//1 2//2 3//3\n"));
        assert!(text.contains("vn 0 0 1\n"));
    }

    #[test]
    fn invalid_mesh_writes_nothing() {
        let mesh = GeomMesh::new(vec![[0.0, 0.0, 0.0]], vec![0, 1, 2]);
        let mut out = Vec::new();
        let err = write_obj(&mesh, "bad", &mut out).unwrap_err();
        assert!(matches!(err, ExportError::Mesh(_)));
        assert!(out.is_empty());
    }
}
