use std::sync::Arc;

use crate::geom::{GeomCache, GeomContext, SphereTessellation, sample_boundary_2d_with_context, sample_boundary_3d_with_context};

#[test]
fn cache_counts_hits_and_misses() {
    let mut cache = GeomCache::new();
    assert_eq!(cache.stats().hit_rate(), 0.0);

    let a = cache.get_or_insert_sphere(3);
    let b = cache.get_or_insert_sphere(3);
    let c = cache.get_or_insert_sphere(5);
    assert!(Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&a, &c));

    let stats = cache.stats();
    assert_eq!(stats.sphere_entries, 2);
    assert_eq!(stats.sphere_hits, 1);
    assert_eq!(stats.sphere_misses, 2);
    assert!((stats.hit_rate() - 1.0 / 3.0).abs() < 1e-12);
    assert_eq!(
        stats.estimated_memory_bytes,
        (SphereTessellation::expected_vertex_count(3) + SphereTessellation::expected_vertex_count(5)) * 24
            + (SphereTessellation::expected_triangle_count(3) + SphereTessellation::expected_triangle_count(5)) * 12
    );
}

#[test]
fn cache_clamps_zero_resolution() {
    let mut cache = GeomCache::new();
    let a = cache.get_or_insert_sphere(0);
    let b = cache.get_or_insert_sphere(1);
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.resolution(), 1);
    assert_eq!(a.vertex_count(), 12);
}

#[test]
fn clear_resets_entries_and_counters() {
    let mut cache = GeomCache::new();
    let _ = cache.get_or_insert_sphere(2);
    let _ = cache.get_or_insert_sphere(2);
    cache.clear();

    let stats = cache.stats();
    assert_eq!(stats.sphere_entries, 0);
    assert_eq!(stats.sphere_hits, 0);
    assert_eq!(stats.sphere_misses, 0);
    assert_eq!(stats.estimated_memory_bytes, 0);
}

#[test]
fn context_shares_base_tessellation_across_k() {
    let mut ctx = GeomContext::new();
    for k in [0.5, 1.0, 2.0, f64::INFINITY] {
        let mesh = sample_boundary_3d_with_context(k, 3, &mut ctx).unwrap();
        assert_eq!(mesh.vertex_count(), 92);
    }
    let stats = ctx.cache.stats();
    assert_eq!(stats.sphere_entries, 1);
    assert_eq!(stats.sphere_misses, 1);
    assert_eq!(stats.sphere_hits, 3);

    // Curves never touch the sphere cache.
    let _ = sample_boundary_2d_with_context(2.0, 64, &mut ctx).unwrap();
    assert_eq!(ctx.cache.stats(), stats);
}
