//! surrogate — the probabilistic model interface consumed by the acquisition.
//!
//! Purpose
//! -------
//! Define the narrow capability the batch selector needs from a fitted
//! surrogate model: noiseless predictive moments, their gradients with
//! respect to the input, and read access to the observations. Model
//! fitting is somebody else's job; this crate only *reads* a model.
//!
//! Key behaviors
//! -------------
//! - [`SurrogateModel`] is the trait seam; any regression model exposing
//!   the four required methods can drive Expected Improvement.
//! - Provided methods derive the input dimension (from the observed
//!   inputs) and `fmin` (the best observed output).
//! - [`gp::GaussianProcess`] is a small, fixed-hyperparameter Gaussian
//!   process implementing the trait; it backs the tests and the Python
//!   bridge.
//!
//! Invariants & assumptions
//! ------------------------
//! - Predictions for a `k × dim` input return a mean and a variance of
//!   length `k`; gradients return two `k × dim` matrices.
//! - Variances may come back slightly negative from round-off; callers
//!   are expected to clip them (the acquisition layer does).
//!
//! Conventions
//! -----------
//! - Inputs are row-major `ndarray` matrices, one candidate per row.
//! - Implementations report failures as [`OptError`] values, never panics.

pub mod gp;

use crate::optimization::errors::{OptError, OptResult};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Read-only view of a fitted probabilistic surrogate.
///
/// Required:
/// - `observed_inputs()`: `n × dim` matrix of inputs the model was fitted on.
/// - `observed_outputs()`: length-`n` vector of observed objective values.
/// - `predict_noiseless(X)`: predictive mean and variance of the latent
///   function (observation noise excluded) at each row of `X`.
/// - `predictive_gradients(X)`: `(∂μ/∂X, ∂v/∂X)`, each `k × dim`.
///
/// Provided:
/// - `input_dim()`: number of columns of the observed inputs.
/// - `fmin()`: smallest observed output, or [`OptError::NoObservations`].
pub trait SurrogateModel {
    fn observed_inputs(&self) -> ArrayView2<'_, f64>;
    fn observed_outputs(&self) -> ArrayView1<'_, f64>;
    fn predict_noiseless(&self, x: ArrayView2<'_, f64>) -> OptResult<(Array1<f64>, Array1<f64>)>;
    fn predictive_gradients(
        &self, x: ArrayView2<'_, f64>,
    ) -> OptResult<(Array2<f64>, Array2<f64>)>;

    fn input_dim(&self) -> usize {
        self.observed_inputs().ncols()
    }

    fn fmin(&self) -> OptResult<f64> {
        let y = self.observed_outputs();
        if y.is_empty() {
            return Err(OptError::NoObservations);
        }
        Ok(y.iter().copied().fold(f64::INFINITY, f64::min))
    }
}

pub mod prelude {
    pub use super::SurrogateModel;
    pub use super::gp::{GaussianProcess, GpParams};
}
