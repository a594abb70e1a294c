//! acquisition::ei — negated Expected Improvement with analytic gradient.
//!
//! Purpose
//! -------
//! Score a matrix of candidate points by Expected Improvement (minimization
//! form) under a fitted [`SurrogateModel`], returned with a minus sign so the
//! result can be handed straight to a minimizer.
//!
//! Key behaviors
//! -------------
//! - Queries noiseless predictive moments `μ, v` and their input gradients.
//! - Clips `v` to `[VARIANCE_FLOOR, ∞)` before taking `s = √v`, so zero or
//!   negative variances never produce `NaN`/`∞`.
//! - With `u = (fmin − μ)/s`:
//!   `objective = −[(fmin − μ)·Φ(u) + s·φ(u)]`,
//!   `gradient  = −(∂s/∂X)·φ(u) + Φ(u)·∂μ/∂X`, where `∂s/∂X = (∂v/∂X)/(2s)`.
//!   The `∂u/∂X` terms cancel because `φ'(u) = −u·φ(u)`; the closed form is
//!   used as-is.
//!
//! Invariants & assumptions
//! ------------------------
//! - The model holds at least one observation (`fmin` defined).
//! - Candidate width equals the model input dimension.
//! - Pure: no state is kept between calls.
use crate::{
    optimization::{
        errors::{OptError, OptResult},
        numerical_stability::{clip_variance, std_normal_cdf, std_normal_pdf},
    },
    surrogate::SurrogateModel,
};
use ndarray::{Array1, Array2, ArrayView2, Zip};

/// expected_improvement — negated EI values and gradients at `x`.
///
/// Parameters
/// ----------
/// - `x`: `ArrayView2<f64>`
///   `k × dim` candidate matrix, one point per row.
/// - `model`: `&M`
///   Fitted surrogate with at least one observation.
///
/// Returns
/// -------
/// `OptResult<(Array1<f64>, Array2<f64>)>`
///   The length-`k` objective (negated EI) and the `k × dim` gradient.
///
/// Errors
/// ------
/// - `OptError::NoObservations` if the model has no outputs.
/// - `OptError::CandidateDimMismatch` if `x.ncols()` differs from the model
///   input dimension.
/// - `OptError::ModelShapeMismatch` if the model returns arrays of the
///   wrong shape.
/// - `OptError::NumericalInstability` if a non-finite mean or gradient from
///   the model leaks into the result (variance problems are clipped away).
/// - Any error the model reports from its prediction methods.
///
/// Notes
/// -----
/// - `Φ(u)` is computed as `0.5·erfc(−u/√2)`.
pub fn expected_improvement<M: SurrogateModel + ?Sized>(
    x: ArrayView2<'_, f64>, model: &M,
) -> OptResult<(Array1<f64>, Array2<f64>)> {
    let (k, dim) = x.dim();
    let model_dim = model.input_dim();
    if dim != model_dim {
        return Err(OptError::CandidateDimMismatch { expected: model_dim, found: dim });
    }
    let fmin = model.fmin()?;

    let (mu, v) = model.predict_noiseless(x)?;
    check_len("predictive mean", &mu, k)?;
    check_len("predictive variance", &v, k)?;
    let (dmu_dx, dv_dx) = model.predictive_gradients(x)?;
    check_dim("mean gradient", &dmu_dx, (k, dim))?;
    check_dim("variance gradient", &dv_dx, (k, dim))?;

    let s = v.mapv(|vi| clip_variance(vi).sqrt());
    let mut objective = Array1::<f64>::zeros(k);
    let mut phi = Array1::<f64>::zeros(k);
    let mut cdf = Array1::<f64>::zeros(k);
    Zip::from(&mut objective).and(&mut phi).and(&mut cdf).and(&mu).and(&s).for_each(
        |obj, pdf_u, cdf_u, &mean, &sd| {
            let improvement = fmin - mean;
            let u = improvement / sd;
            *pdf_u = std_normal_pdf(u);
            *cdf_u = std_normal_cdf(u);
            *obj = -(improvement * *cdf_u + sd * *pdf_u);
        },
    );

    let mut gradient = Array2::zeros((k, dim));
    for r in 0..k {
        let two_s = 2.0 * s[r];
        for d in 0..dim {
            let ds_dx = dv_dx[[r, d]] / two_s;
            gradient[[r, d]] = -ds_dx * phi[r] + cdf[r] * dmu_dx[[r, d]];
        }
    }
    check_finite("objective", objective.iter())?;
    check_finite("gradient", gradient.iter())?;
    Ok((objective, gradient))
}

fn check_finite<'a>(what: &'static str, values: impl Iterator<Item = &'a f64>) -> OptResult<()> {
    for (index, &value) in values.enumerate() {
        if !value.is_finite() {
            return Err(OptError::NumericalInstability { what, index, value });
        }
    }
    Ok(())
}

fn check_len(what: &'static str, arr: &Array1<f64>, k: usize) -> OptResult<()> {
    if arr.len() != k {
        return Err(OptError::ModelShapeMismatch { what, expected: (k, 1), found: (arr.len(), 1) });
    }
    Ok(())
}

fn check_dim(what: &'static str, arr: &Array2<f64>, expected: (usize, usize)) -> OptResult<()> {
    if arr.dim() != expected {
        return Err(OptError::ModelShapeMismatch { what, expected, found: arr.dim() });
    }
    Ok(())
}
