//! acquisition::flat — flat-vector view of the acquisition for local solvers.
//!
//! Local solvers work on a single parameter vector; the acquisition works
//! on a `k × dim` candidate matrix. This module converts between the two:
//! a flat vector of length `L = k · dim` is read row-major as `k` stacked
//! points, the acquisition is evaluated, and the `k × dim` gradient is
//! flattened back to length `L`.
//!
//! [`AcquisitionObjective`] packages the flat evaluation as a scalar
//! [`Objective`] for the local solver: the cost is the sum of the `k`
//! per-point values, whose gradient is exactly the flattened per-point
//! gradient.
use crate::{
    acquisition::ei::expected_improvement,
    optimization::{
        errors::{OptError, OptResult},
        local_solver::{Cost, Grad, Objective, Theta},
    },
    surrogate::SurrogateModel,
};
use ndarray::{Array1, ArrayView1};

/// expected_improvement_flat — evaluate the acquisition on a flat vector.
///
/// Parameters
/// ----------
/// - `x`: `ArrayView1<f64>`
///   Flat candidate vector; its length must be a positive multiple of the
///   model input dimension `dim`.
/// - `model`: `&M`
///   Fitted surrogate with at least one observation.
///
/// Strided views are accepted; they are copied into row-major order first.
///
/// Returns
/// -------
/// `OptResult<(Array1<f64>, Array1<f64>)>`
///   The length-`k` objective and the length-`L` flattened gradient.
///
/// Errors
/// ------
/// - `OptError::InvalidShape` if `L` is zero or not a multiple of `dim`.
/// - Anything [`expected_improvement`] reports.
pub fn expected_improvement_flat<M: SurrogateModel + ?Sized>(
    x: ArrayView1<'_, f64>, model: &M,
) -> OptResult<(Array1<f64>, Array1<f64>)> {
    let dim = model.input_dim();
    let len = x.len();
    if dim == 0 || len == 0 || len % dim != 0 {
        return Err(OptError::InvalidShape { len, dim });
    }
    let k = len / dim;
    let contiguous = x.as_standard_layout();
    let points =
        contiguous.view().into_shape((k, dim)).map_err(|_| OptError::InvalidShape { len, dim })?;
    let (value, gradient) = expected_improvement(points, model)?;
    Ok((value, Array1::from_iter(gradient.iter().copied())))
}

/// Scalar acquisition objective over a flat vector of stacked points.
#[derive(Debug)]
pub struct AcquisitionObjective<'a, M: SurrogateModel + ?Sized> {
    pub model: &'a M,
}

impl<'a, M: SurrogateModel + ?Sized> AcquisitionObjective<'a, M> {
    pub fn new(model: &'a M) -> Self {
        Self { model }
    }
}

impl<M: SurrogateModel + ?Sized> Objective for AcquisitionObjective<'_, M> {
    fn value_and_grad(&self, theta: &Theta) -> OptResult<(Cost, Grad)> {
        let (value, grad) = expected_improvement_flat(theta.view(), self.model)?;
        Ok((value.sum(), grad))
    }

    fn check(&self, theta: &Theta) -> OptResult<()> {
        let dim = self.model.input_dim();
        if dim == 0 || theta.is_empty() || theta.len() % dim != 0 {
            return Err(OptError::InvalidShape { len: theta.len(), dim });
        }
        self.model.fmin().map(|_| ())
    }
}
