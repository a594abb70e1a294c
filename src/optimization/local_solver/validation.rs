//! Validation helpers for the bounded local solver.
//!
//! - **Tolerance checks**: [`verify_tol_grad`], [`verify_tol_cost`] ensure
//!   numeric tolerances are finite and strictly positive when provided.
//! - **Count checks**: [`verify_max_iter`], [`verify_max_fun_evals`] reject
//!   zero limits.
//! - **Gradient validation**: [`validate_grad`] enforces correct dimension
//!   and finite entries.
//! - **Solver output**: [`validate_theta_hat`] and [`validate_value`] make
//!   sure a finished solve produced a usable point and objective value.
use crate::optimization::{
    errors::{OptError, OptResult},
    local_solver::types::{Grad, Theta},
};

/// Validate the optional gradient‐norm tolerance.
///
/// - Accepts `None` (no stopping rule on gradient).
/// - If `Some`, the value must be **finite** and **strictly positive**.
///
/// # Errors
/// Returns [`OptError::InvalidTolGrad`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the optional cost‐change tolerance (for convergence).
///
/// - Accepts `None` (no stopping rule on cost change).
/// - If `Some`, the value must be **finite** and **strictly positive**.
///
/// # Errors
/// Returns [`OptError::InvalidTolCost`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Reject an explicit iteration cap of zero.
pub fn verify_max_iter(max_iter: Option<usize>) -> OptResult<()> {
    if let Some(0) = max_iter {
        return Err(OptError::InvalidMaxIter {
            max_iter: 0,
            reason: "Maximum iterations must be greater than zero.",
        });
    }
    Ok(())
}

/// Reject an explicit function-evaluation budget of zero.
pub fn verify_max_fun_evals(max_fun_evals: Option<usize>) -> OptResult<()> {
    if let Some(0) = max_fun_evals {
        return Err(OptError::InvalidMaxFunEvals {
            max_fun_evals: 0,
            reason: "Maximum function evaluations must be greater than zero.",
        });
    }
    Ok(())
}

/// Validate a gradient vector against dimension and finiteness.
///
/// Checks:
/// - `grad.len() == dim`
/// - every element is finite (`NaN` or `±∞` are rejected)
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if length does not match `dim`.
/// - [`OptError::InvalidGradient`] with the index/value/reason of the first
///   offending element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate and unwrap the solver's final point (`theta_hat`).
///
/// Accepts only a present vector with all **finite** entries.
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if no vector was provided.
/// - [`OptError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    match theta_hat {
        Some(t) => {
            for (index, &value) in t.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidThetaHat {
                        index,
                        value,
                        reason: "Solver output must be finite.",
                    });
                }
            }
            Ok(t)
        }
        None => Err(OptError::MissingThetaHat),
    }
}

/// Validate that a scalar objective value is finite.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Tolerance / count validation and gradient / output checks.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Tolerances must be finite and strictly positive when present.
    //
    // Given
    // -----
    // - `None`, a positive value, zero, and `NaN`.
    //
    // Expect
    // ------
    // - The first two pass; zero and `NaN` are rejected with `InvalidTolGrad`.
    fn verify_tol_grad_accepts_none_and_positive_only() {
        assert!(verify_tol_grad(None).is_ok());
        assert!(verify_tol_grad(Some(1e-6)).is_ok());
        assert!(matches!(verify_tol_grad(Some(0.0)), Err(OptError::InvalidTolGrad { .. })));
        assert!(matches!(verify_tol_grad(Some(f64::NAN)), Err(OptError::InvalidTolGrad { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Zero is the only rejected count for both iteration and evaluation caps.
    //
    // Expect
    // ------
    // - `Some(0)` fails, `None` and positive values pass.
    fn verify_counts_reject_zero() {
        assert!(verify_max_iter(None).is_ok());
        assert!(verify_max_iter(Some(3)).is_ok());
        assert!(matches!(verify_max_iter(Some(0)), Err(OptError::InvalidMaxIter { .. })));
        assert!(verify_max_fun_evals(Some(1)).is_ok());
        assert!(matches!(
            verify_max_fun_evals(Some(0)),
            Err(OptError::InvalidMaxFunEvals { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // `validate_grad` reports the first non-finite entry.
    //
    // Given
    // -----
    // - A gradient `[0.5, NaN, inf]` of the expected length.
    //
    // Expect
    // ------
    // - `InvalidGradient` at index 1.
    fn validate_grad_reports_first_non_finite_entry() {
        // Arrange
        let grad = array![0.5, f64::NAN, f64::INFINITY];

        // Act
        let err = validate_grad(&grad, 3).unwrap_err();

        // Assert
        assert!(matches!(err, OptError::InvalidGradient { index: 1, .. }));
        assert_eq!(
            validate_grad(&grad, 2),
            Err(OptError::GradientDimMismatch { expected: 2, found: 3 })
        );
    }

    #[test]
    // Purpose
    // -------
    // A missing solver output is an explicit error, never a placeholder.
    fn validate_theta_hat_rejects_missing_and_non_finite() {
        assert_eq!(validate_theta_hat(None), Err(OptError::MissingThetaHat));
        assert!(matches!(
            validate_theta_hat(Some(array![0.1, f64::NEG_INFINITY])),
            Err(OptError::InvalidThetaHat { index: 1, .. })
        ));
        assert_eq!(validate_theta_hat(Some(array![0.25])), Ok(array![0.25]));
    }
}
