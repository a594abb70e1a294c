//! domain::bounds — the box-constrained search domain.
//!
//! Purpose
//! -------
//! Describe the hyper-rectangle candidates must live in and provide the
//! projection helpers the bounded local solver needs.
//!
//! Key behaviors
//! -------------
//! - [`Bounds::new`] validates one finite `(low, high)` pair per input
//!   dimension with `low ≤ high`.
//! - [`Bounds::clamp_flat`] projects a flat vector of `k` stacked points
//!   onto the box, dimension `i % dim` for entry `i`.
//! - [`Bounds::project_gradient_flat`] zeroes gradient components that
//!   would push an active coordinate further outside the box.
//!
//! Invariants & assumptions
//! ------------------------
//! - Immutable after construction; `dim() ≥ 1`.
//! - Flat vectors handed to the projection helpers have a length that is
//!   a multiple of `dim()`; callers check this before projecting.
use crate::optimization::errors::{OptError, OptResult};
use ndarray::{Array1, ArrayView1, ArrayView2};

/// Tolerance used to decide that a coordinate sits on a bound.
pub const ACTIVE_BOUND_EPS: f64 = 1e-12;

/// Per-dimension `(low, high)` limits of the search domain.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    pairs: Vec<(f64, f64)>,
}

impl Bounds {
    /// Construct validated bounds.
    ///
    /// # Errors
    /// - [`OptError::EmptyBounds`] if `pairs` is empty.
    /// - [`OptError::InvalidBounds`] for the first pair that is non-finite or
    ///   has `low > high`.
    pub fn new(pairs: Vec<(f64, f64)>) -> OptResult<Self> {
        if pairs.is_empty() {
            return Err(OptError::EmptyBounds);
        }
        for (index, &(low, high)) in pairs.iter().enumerate() {
            if !low.is_finite() || !high.is_finite() {
                return Err(OptError::InvalidBounds {
                    index,
                    low,
                    high,
                    reason: "Bounds must be finite.",
                });
            }
            if low > high {
                return Err(OptError::InvalidBounds {
                    index,
                    low,
                    high,
                    reason: "Lower bound must not exceed upper bound.",
                });
            }
        }
        Ok(Self { pairs })
    }

    pub fn dim(&self) -> usize {
        self.pairs.len()
    }

    pub fn pairs(&self) -> &[(f64, f64)] {
        &self.pairs
    }

    pub fn lows(&self) -> Array1<f64> {
        self.pairs.iter().map(|&(low, _)| low).collect()
    }

    pub fn highs(&self) -> Array1<f64> {
        self.pairs.iter().map(|&(_, high)| high).collect()
    }

    /// `true` if `point` has `dim()` entries, each inside its interval.
    pub fn contains(&self, point: ArrayView1<'_, f64>) -> bool {
        point.len() == self.dim()
            && point.iter().zip(&self.pairs).all(|(&x, &(low, high))| low <= x && x <= high)
    }

    /// `true` if every row of `points` lies inside the box.
    pub fn contains_all(&self, points: ArrayView2<'_, f64>) -> bool {
        points.rows().into_iter().all(|row| self.contains(row))
    }

    /// Clamp every entry of a flat, row-major stack of points into the box.
    pub fn clamp_flat(&self, theta: &Array1<f64>) -> Array1<f64> {
        let dim = self.dim();
        Array1::from_iter(theta.iter().enumerate().map(|(i, &x)| {
            let (low, high) = self.pairs[i % dim];
            x.clamp(low, high)
        }))
    }

    /// Zero gradient components that point out of the box at active bounds.
    ///
    /// `theta` must already be clamped. A component is dropped when the
    /// coordinate sits on its lower bound with a positive gradient (descent
    /// would decrease it) or on its upper bound with a negative gradient.
    pub fn project_gradient_flat(&self, theta: &Array1<f64>, grad: &mut Array1<f64>) {
        let dim = self.dim();
        for (i, (&x, g)) in theta.iter().zip(grad.iter_mut()).enumerate() {
            let (low, high) = self.pairs[i % dim];
            if (x <= low + ACTIVE_BOUND_EPS && *g > 0.0) || (x >= high - ACTIVE_BOUND_EPS && *g < 0.0)
            {
                *g = 0.0;
            }
        }
    }
}
