use std::f64::consts::TAU;

use crate::geom::{BoundaryCurve2D, GeomContext, Point2, sample_boundary_2d, sample_boundary_2d_with_context};
use crate::norm::{BoundaryError, NormParameter, lk_norm};

const KS: [f64; 9] = [0.1, 0.5, 0.9, 1.0, 1.5, 2.0, 3.0, 10.0, f64::INFINITY];

fn assert_invalid(result: Result<BoundaryCurve2D, BoundaryError>, name: &str) {
    match result {
        Err(BoundaryError::InvalidParameter { name: got, .. }) => assert_eq!(got, name),
        other => panic!("expected InvalidParameter({name}), got {other:?}"),
    }
}

#[test]
fn every_sample_lies_on_the_unit_boundary() {
    for k in KS {
        let curve = sample_boundary_2d(k, 360).expect("valid k");
        for p in curve.points() {
            let norm = lk_norm(&p.to_array(), k);
            assert!((norm - 1.0).abs() < 1e-9, "k={k} p={p:?} norm={norm}");
        }
    }
}

#[test]
fn l2_boundary_is_the_unit_circle() {
    let curve = sample_boundary_2d(2.0, 360).unwrap();
    for p in curve.points() {
        assert!((p.x.hypot(p.y) - 1.0).abs() < 1e-12);
    }
}

#[test]
fn l1_boundary_is_a_diamond_and_linf_a_square() {
    let diamond = sample_boundary_2d(1.0, 100).unwrap();
    for p in diamond.points() {
        assert!((p.x.abs() + p.y.abs() - 1.0).abs() < 1e-12);
    }

    let square = sample_boundary_2d(f64::INFINITY, 100).unwrap();
    assert_eq!(square.k(), NormParameter::Infinity);
    for p in square.points() {
        assert!((p.x.abs().max(p.y.abs()) - 1.0).abs() < 1e-12);
    }
}

#[test]
fn returns_exact_count_in_increasing_angle_order() {
    for n in [3, 4, 7, 360, 1001] {
        let curve = sample_boundary_2d(1.7, n).unwrap();
        assert_eq!(curve.len(), n);
        assert_eq!(curve.points()[0].angle(), 0.0);

        let step = TAU / n as f64;
        for (i, p) in curve.points().iter().enumerate() {
            assert!((p.angle() - step * i as f64).abs() < 1e-9);
        }
        for pair in curve.points().windows(2) {
            assert!(pair[0].angle() < pair[1].angle());
        }
    }
}

#[test]
fn convex_for_k_at_least_one() {
    for k in [1.0, 1.2, 2.0, 6.0, f64::INFINITY] {
        let curve = sample_boundary_2d(k, 360).unwrap();
        assert!(curve.is_convex(1e-12), "k={k} should be convex");
        assert!(curve.k().is_convex());
    }
}

#[test]
fn star_shaped_for_fractional_k() {
    for k in [0.3, 0.5, 0.8] {
        let curve = sample_boundary_2d(k, 360).unwrap();
        assert!(!curve.is_convex(1e-12), "k={k} should be non-convex");
        assert!(!curve.k().is_convex());
    }
}

#[test]
fn curve_is_closed_only_at_draw_time() {
    let curve = sample_boundary_2d(2.0, 12).unwrap();
    let first = curve.points()[0];
    assert_ne!(*curve.points().last().unwrap(), first);

    let closed: Vec<Point2> = curve.closed_points().collect();
    assert_eq!(closed.len(), 13);
    assert_eq!(closed[12], first);

    let segments: Vec<_> = curve.segments().collect();
    assert_eq!(segments.len(), 12);
    assert_eq!(segments[11].1, first);
    assert_eq!(segments[0].0, first);
}

#[test]
fn rejects_too_few_points() {
    for n in [0, 1, 2] {
        assert_invalid(sample_boundary_2d(2.0, n), "num_points");
    }
}

#[test]
fn rejects_non_positive_or_nan_k() {
    for k in [0.0, -1.0, -0.5, f64::NAN, f64::NEG_INFINITY] {
        assert_invalid(sample_boundary_2d(k, 36), "k");
    }
}

#[test]
fn overflowing_norm_is_reported_as_degeneracy() {
    // 2^(1/k) overflows at 45° for such a tiny exponent.
    let err = sample_boundary_2d(1e-4, 8).unwrap_err();
    assert!(matches!(err, BoundaryError::NumericDegeneracy { index: 1, .. }));
}

#[test]
fn context_variant_matches_plain_call() {
    let mut ctx = GeomContext::new();
    let a = sample_boundary_2d_with_context(3.0, 90, &mut ctx).unwrap();
    let b = sample_boundary_2d(3.0, 90).unwrap();
    assert_eq!(a, b);
}
