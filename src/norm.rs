//! Lk-norm evaluation.
//!
//! The norm is `(Σ |v_i|^k)^(1/k)` for finite `k` and `max |v_i|` for
//! `k = ∞`. The evaluator accepts any `k > 0`, including the quasi-norm range
//! `0 < k < 1` where the unit ball stops being convex. Validation of `k`
//! happens in the samplers, not here.
//!
//! # Example
//!
//! ```
//! use lknorm_engine::norm::{lk_norm, NormParameter};
//!
//! assert!((lk_norm(&[3.0, 4.0], 2.0) - 5.0).abs() < 1e-12);
//! assert_eq!(lk_norm(&[1.0, 1.0], NormParameter::Infinity), 1.0);
//! ```

use std::fmt;

/// The norm exponent `k`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NormParameter {
    Finite(f64),
    Infinity,
}

impl NormParameter {
    /// Validates `k` for boundary sampling.
    ///
    /// `f64::INFINITY` maps to [`NormParameter::Infinity`]. NaN, negative
    /// infinity and `k <= 0` are rejected.
    pub fn new(k: f64) -> Result<Self, BoundaryError> {
        if k.is_nan() {
            return Err(BoundaryError::invalid("k", "must be a number, got NaN"));
        }
        if k == f64::INFINITY {
            return Ok(Self::Infinity);
        }
        if !k.is_finite() || k <= 0.0 {
            return Err(BoundaryError::invalid("k", format!("must be > 0, got {k}")));
        }
        Ok(Self::Finite(k))
    }

    /// The exponent as a plain number (`f64::INFINITY` for the max norm).
    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Self::Finite(k) => k,
            Self::Infinity => f64::INFINITY,
        }
    }

    #[must_use]
    pub const fn is_infinite(self) -> bool {
        matches!(self, Self::Infinity)
    }

    /// Returns `true` when the unit ball for this `k` is convex (`k >= 1`).
    #[must_use]
    pub fn is_convex(self) -> bool {
        match self {
            Self::Finite(k) => k >= 1.0,
            Self::Infinity => true,
        }
    }

    /// Short label used in titles and file names, e.g. `2.0` or `∞`.
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::Finite(k) => format!("{k:.1}"),
            Self::Infinity => "∞".to_string(),
        }
    }
}

impl From<f64> for NormParameter {
    /// Unchecked conversion; `f64::INFINITY` becomes [`NormParameter::Infinity`].
    fn from(k: f64) -> Self {
        if k == f64::INFINITY {
            Self::Infinity
        } else {
            Self::Finite(k)
        }
    }
}

impl fmt::Display for NormParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(k) => write!(f, "{k}"),
            Self::Infinity => f.write_str("inf"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoundaryError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("direction {index} has degenerate norm {norm}")]
    NumericDegeneracy { index: usize, norm: f64 },
}

impl BoundaryError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Computes the Lk-norm of `vector`.
///
/// The finite case is evaluated as `m · (Σ (|v_i|/m)^k)^(1/k)` with
/// `m = max |v_i|`, so large exponents do not underflow to zero. An empty or
/// all-zero vector has norm 0.
#[must_use]
pub fn lk_norm(vector: &[f64], k: impl Into<NormParameter>) -> f64 {
    let max_abs = vector.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));

    match k.into() {
        NormParameter::Infinity => max_abs,
        NormParameter::Finite(k) => {
            if max_abs == 0.0 || !max_abs.is_finite() {
                return max_abs;
            }
            let sum: f64 = vector.iter().map(|v| (v.abs() / max_abs).powf(k)).sum();
            max_abs * sum.powf(1.0 / k)
        }
    }
}

/// Scales `direction` onto the unit sphere of the Lk-norm.
///
/// Relies on homogeneity: `‖d / ‖d‖_k‖_k = 1`. `index` only labels the error.
pub(crate) fn scale_to_boundary<const N: usize>(
    direction: [f64; N],
    k: NormParameter,
    index: usize,
) -> Result<[f64; N], BoundaryError> {
    let norm = lk_norm(&direction, k);
    if !norm.is_finite() || norm <= 0.0 {
        log::error!("norm of direction {index} is degenerate ({norm}) for k = {k}");
        return Err(BoundaryError::NumericDegeneracy { index, norm });
    }
    Ok(direction.map(|c| c / norm))
}
