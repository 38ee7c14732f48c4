//! 2D Lk unit-ball boundary sampling.
//!
//! Each sample starts from a unit-circle direction `d = (cos θ, sin θ)` and is
//! scaled by `1 / ‖d‖_k`. Homogeneity of the norm puts the result exactly on
//! the boundary, so no root finding is needed.
//!
//! The curve is closed *at draw/export time*: the first point is not repeated
//! at the end of [`BoundaryCurve2D::points`]. Use
//! [`BoundaryCurve2D::closed_points`] or [`BoundaryCurve2D::segments`] when a
//! consumer needs the closing edge.

use std::f64::consts::TAU;

use super::core::Point2;
use super::mesh::GeomContext;
use super::metrics::TimingBucket;
use crate::norm::{BoundaryError, NormParameter, scale_to_boundary};

/// Sample count used by the interactive 2D view.
pub const DEFAULT_CURVE_POINTS: usize = 360;

/// Fewest samples that still form a polygon.
pub const MIN_CURVE_POINTS: usize = 3;

/// Closed polyline on the boundary `{p : ‖p‖_k = 1}`.
///
/// Points are ordered by increasing polar angle starting at `θ = 0`, spaced
/// uniformly by `2π / len`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryCurve2D {
    k: NormParameter,
    points: Vec<Point2>,
}

impl BoundaryCurve2D {
    #[must_use]
    pub const fn k(&self) -> NormParameter {
        self.k
    }

    /// The samples, without a repeated closing point.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    #[must_use]
    pub fn into_points(self) -> Vec<Point2> {
        self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All samples followed by the first one again.
    pub fn closed_points(&self) -> impl Iterator<Item = Point2> + '_ {
        self.points.iter().chain(self.points.first()).copied()
    }

    /// The `len()` edges of the loop, including the closing edge.
    pub fn segments(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Returns `true` if the loop never turns clockwise by more than `tolerance`.
    ///
    /// Holds for `k >= 1`; for `0 < k < 1` the boundary is star-shaped with
    /// concave sides and this returns `false`.
    #[must_use]
    pub fn is_convex(&self, tolerance: f64) -> bool {
        let n = self.points.len();
        (0..n).all(|i| {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            let c = self.points[(i + 2) % n];
            a.turn(b, c) >= -tolerance
        })
    }
}

/// Samples `num_points` boundary points for `k`.
///
/// `k` may be `f64::INFINITY` for the max norm.
///
/// # Errors
///
/// [`BoundaryError::InvalidParameter`] if `num_points < 3` or `k` is not a
/// positive number; [`BoundaryError::NumericDegeneracy`] if a direction's norm
/// is zero or overflows (only reachable for extremely small `k`).
pub fn sample_boundary_2d(k: f64, num_points: usize) -> Result<BoundaryCurve2D, BoundaryError> {
    let mut ctx = GeomContext::new();
    sample_boundary_2d_with_context(k, num_points, &mut ctx)
}

pub fn sample_boundary_2d_with_context(
    k: f64,
    num_points: usize,
    ctx: &mut GeomContext,
) -> Result<BoundaryCurve2D, BoundaryError> {
    if num_points < MIN_CURVE_POINTS {
        return Err(BoundaryError::invalid(
            "num_points",
            format!("need at least {MIN_CURVE_POINTS} points, got {num_points}"),
        ));
    }
    let k = NormParameter::new(k)?;

    let points = ctx.metrics.time(TimingBucket::CurveSampling, || {
        let step = TAU / num_points as f64;
        (0..num_points)
            .map(|i| {
                let theta = step * i as f64;
                let [x, y] = scale_to_boundary([theta.cos(), theta.sin()], k, i)?;
                Ok(Point2::new(x, y))
            })
            .collect::<Result<Vec<_>, BoundaryError>>()
    })?;

    log::debug!("sampled 2D boundary k={k}: {} points", points.len());
    Ok(BoundaryCurve2D { k, points })
}
