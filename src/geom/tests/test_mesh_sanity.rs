use crate::geom::{GeomContext, GeomMesh, sample_boundary_3d_with_context};

#[test]
fn boundary_mesh_has_finite_vertices_and_valid_indices() {
    let mut ctx = GeomContext::new();
    let mesh = sample_boundary_3d_with_context(0.7, 4, &mut ctx).unwrap();

    mesh.validate().expect("mesh validate");
    assert_eq!(mesh.positions_flat().len(), mesh.positions.len() * 3);
    assert_eq!(mesh.normals_flat().len(), mesh.positions.len() * 3);
    assert_eq!(mesh.positions_flat()[3..6], mesh.positions[1]);

    let diag = mesh.diagnostics();
    assert_eq!(diag.vertex_count, mesh.positions.len());
    assert_eq!(diag.triangle_count, mesh.indices.len() / 3);
    assert_eq!(diag.open_edge_count, 0);
    assert_eq!(diag.non_manifold_edge_count, 0);
    assert_eq!(diag.degenerate_triangle_count, 0);

    for n in &mesh.normals {
        assert!(n.iter().all(|c| c.is_finite()));
    }
    assert!(mesh
        .indices
        .iter()
        .all(|i| (*i as usize) < mesh.positions.len()));
}

#[test]
fn geom_mesh_validate_rejects_bad_buffers() {
    let mesh = GeomMesh::new(vec![[0.0, 0.0, 0.0]], vec![0]);
    assert!(mesh.validate().is_err());

    let mesh = GeomMesh::new(vec![[0.0, 0.0, 0.0]], vec![0, 1, 0]);
    assert!(mesh.validate().is_err());

    let mesh = GeomMesh::new(vec![[f64::NAN, 0.0, 0.0]], vec![0, 0, 0]);
    assert!(mesh.validate().is_err());

    let mut mesh = GeomMesh::new(
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        vec![0, 1, 2],
    );
    assert!(mesh.validate().is_ok());
    mesh.normals.pop();
    assert!(mesh.validate().is_err());
}

#[test]
fn single_triangle_reports_open_edges() {
    let mesh = GeomMesh::new(
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        vec![0, 1, 2],
    );
    assert_eq!(mesh.triangles().collect::<Vec<_>>(), vec![[0, 1, 2]]);
    for n in &mesh.normals {
        assert_eq!(*n, [0.0, 0.0, 1.0]);
    }

    let diag = mesh.diagnostics();
    assert_eq!(diag.open_edge_count, 3);
    assert!(!diag.is_watertight());
    assert!(diag.has_warnings());
}

#[test]
fn inverted_mesh_is_flagged() {
    let mut mesh = sample_boundary_3d_with_context(2.0, 2, &mut GeomContext::new()).unwrap();
    for tri in mesh.indices.chunks_exact_mut(3) {
        tri.swap(1, 2);
    }
    mesh.recompute_normals();

    let diag = mesh.diagnostics();
    assert!(diag.is_watertight());
    assert!(
        diag.warnings.iter().any(|w| w.contains("outward")),
        "{:?}",
        diag.warnings
    );
}
