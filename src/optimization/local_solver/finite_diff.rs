//! local_solver::finite_diff — finite-difference check of analytic gradients.
//!
//! Purpose
//! -------
//! Compare the gradient an [`Objective`] reports with a central
//! finite-difference estimate of its cost, so that hand-derived gradients
//! (the Expected Improvement one in particular) can be verified at
//! arbitrary points.
//!
//! Key behaviors
//! -------------
//! - [`derivative_check`] evaluates the analytic gradient, differentiates
//!   the cost with `finitediff`'s central scheme, and reports the largest
//!   absolute and relative discrepancy.
//! - [`run_fd_diff`] is the error-capturing wrapper around `finitediff`:
//!   the difference closure must return a bare `f64`, so the first oracle
//!   error is parked in a `RefCell` and re-raised after differencing.
//!
//! Invariants & assumptions
//! ------------------------
//! - The check evaluates the raw oracle, without clamping or projection;
//!   callers pick points where the cost is smooth.
//! - The relative error of component `i` is
//!   `|gᵢ − fdᵢ| / max(|gᵢ|, |fdᵢ|, REL_ERR_SCALE_FLOOR)`; the floor only
//!   matters for slopes that are zero to working precision.
//! - [`DerivativeCheck::passes`] takes an explicit absolute tolerance for
//!   components whose slope is too small for a relative test.
//!
//! Testing notes
//! -------------
//! - Unit tests cover an exact gradient, a deliberately wrong gradient,
//!   and oracle errors raised mid-differencing.
use crate::optimization::{
    errors::{OptError, OptResult},
    local_solver::{
        Grad, Theta,
        traits::Objective,
        validation::{validate_grad, validate_value},
    },
};
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Smallest gradient magnitude used as the denominator of a relative error.
pub const REL_ERR_SCALE_FLOOR: f64 = 1e-8;

/// Result of comparing an analytic gradient with finite differences.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivativeCheck {
    pub analytic: Grad,
    pub numeric: Grad,
    pub max_abs_err: f64,
    pub max_rel_err: f64,
}

impl DerivativeCheck {
    /// `true` when every component satisfies
    /// `|gᵢ − fdᵢ| ≤ rel_tol · max(|gᵢ|, |fdᵢ|) + abs_tol`.
    pub fn passes(&self, rel_tol: f64, abs_tol: f64) -> bool {
        self.analytic
            .iter()
            .zip(self.numeric.iter())
            .all(|(&g, &fd)| (g - fd).abs() <= rel_tol * g.abs().max(fd.abs()) + abs_tol)
    }
}

/// derivative_check — compare analytic and central finite-difference gradients.
///
/// Parameters
/// ----------
/// - `objective`: `&O`
///   Oracle whose `value_and_grad` is checked.
/// - `theta`: `&Theta`
///   Point at which both gradients are evaluated.
///
/// Returns
/// -------
/// `OptResult<DerivativeCheck>`
///   Both gradients and the largest absolute / relative discrepancy.
///
/// Errors
/// ------
/// - Any error the oracle raises at `theta` or at a differencing point.
/// - `OptError::NonFiniteCost` / `OptError::InvalidGradient` for
///   non-finite values.
pub fn derivative_check<O: Objective + ?Sized>(
    objective: &O, theta: &Theta,
) -> OptResult<DerivativeCheck> {
    let (value, analytic) = objective.value_and_grad(theta)?;
    validate_value(value)?;
    validate_grad(&analytic, theta.len())?;

    let closure_err: RefCell<Option<OptError>> = RefCell::new(None);
    let cost = |t: &Theta| -> f64 {
        match objective.value_and_grad(t) {
            Ok((c, _)) => c,
            Err(e) => {
                let mut slot = closure_err.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e);
                }
                f64::NAN
            }
        }
    };
    let numeric = run_fd_diff(theta, &cost, &closure_err)?;

    let mut max_abs_err = 0.0_f64;
    let mut max_rel_err = 0.0_f64;
    for (&g, &fd) in analytic.iter().zip(numeric.iter()) {
        let abs_err = (g - fd).abs();
        let scale = g.abs().max(fd.abs()).max(REL_ERR_SCALE_FLOOR);
        max_abs_err = max_abs_err.max(abs_err);
        max_rel_err = max_rel_err.max(abs_err / scale);
    }
    Ok(DerivativeCheck { analytic, numeric, max_abs_err, max_rel_err })
}

/// run_fd_diff — central-difference gradient with error capture and validation.
///
/// Clears `closure_err`, differentiates `func` at `theta`, then returns the
/// first error `func` parked in `closure_err`, if any, before validating
/// the gradient.
///
/// # Errors
/// - The captured oracle error.
/// - [`OptError::GradientDimMismatch`] / [`OptError::InvalidGradient`] from
///   [`validate_grad`].
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<OptError>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.central_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::local_solver::Cost;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Agreement for an exact analytic gradient.
    // - Detection of a wrong gradient, including a small relative error on
    //   a shallow function.
    // - Propagation of oracle errors raised while differencing.
    // -------------------------------------------------------------------------

    /// `c(θ) = Σ sin(θᵢ)` with a switchable gradient bug.
    struct SineSum {
        wrong: bool,
    }

    impl Objective for SineSum {
        fn value_and_grad(&self, theta: &Theta) -> OptResult<(Cost, Grad)> {
            let grad = if self.wrong { theta.mapv(f64::sin) } else { theta.mapv(f64::cos) };
            Ok((theta.mapv(f64::sin).sum(), grad))
        }
        fn check(&self, _theta: &Theta) -> OptResult<()> {
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // An exact gradient passes with a tight tolerance.
    //
    // Given
    // -----
    // - c(θ) = Σ sin θᵢ at θ = (0.3, 1.2, −0.7).
    //
    // Expect
    // ------
    // - Agreement within 1e-6 relative (1e-10 absolute).
    fn derivative_check_accepts_exact_gradient() {
        // Act
        let check = derivative_check(&SineSum { wrong: false }, &array![0.3, 1.2, -0.7]).unwrap();

        // Assert
        assert!(check.passes(1e-6, 1e-10), "max_rel_err = {}", check.max_rel_err);
        assert_eq!(check.numeric.len(), 3);
    }

    #[test]
    // Purpose
    // -------
    // A wrong gradient is flagged.
    fn derivative_check_flags_wrong_gradient() {
        let check = derivative_check(&SineSum { wrong: true }, &array![0.3, 1.2]).unwrap();
        assert!(!check.passes(1e-4, 1e-8));
        assert!(check.max_abs_err > 0.1);
    }

    #[test]
    // Purpose
    // -------
    // Small slopes are judged relatively: a half-percent gradient error on a
    // shallow function is reported as such, not diluted by a unit scale.
    //
    // Given
    // -----
    // - c(θ) = Σ θᵢ² at θ = (0.01, 0.05, 0.2), gradient reported as
    //   1.005 · 2θ.
    //
    // Expect
    // ------
    // - `max_rel_err ≈ 0.005 / 1.005` and the check fails at 1e-3.
    fn derivative_check_reports_relative_error_for_small_slopes() {
        struct ScaledBowl;
        impl Objective for ScaledBowl {
            fn value_and_grad(&self, theta: &Theta) -> OptResult<(Cost, Grad)> {
                Ok((theta.dot(theta), theta.mapv(|t| 1.005 * 2.0 * t)))
            }
            fn check(&self, _theta: &Theta) -> OptResult<()> {
                Ok(())
            }
        }

        let check = derivative_check(&ScaledBowl, &array![0.01, 0.05, 0.2]).unwrap();

        assert_relative_eq!(check.max_rel_err, 0.005 / 1.005, max_relative = 1e-3);
        assert!(!check.passes(1e-3, 1e-8));
        assert!(check.passes(1e-2, 1e-8));
    }

    #[test]
    // Purpose
    // -------
    // An oracle failure at a differencing point surfaces as that error.
    //
    // Given
    // -----
    // - An oracle that fails for any θ₀ > 1, checked at θ₀ = 1.
    //
    // Expect
    // ------
    // - The oracle's `NoObservations` error, not a NaN gradient.
    fn derivative_check_propagates_oracle_errors() {
        struct Edge;
        impl Objective for Edge {
            fn value_and_grad(&self, theta: &Theta) -> OptResult<(Cost, Grad)> {
                if theta[0] > 1.0 {
                    return Err(OptError::NoObservations);
                }
                Ok((theta[0], array![1.0]))
            }
            fn check(&self, _theta: &Theta) -> OptResult<()> {
                Ok(())
            }
        }

        let err = derivative_check(&Edge, &array![1.0]).unwrap_err();

        assert_eq!(err, OptError::NoObservations);
    }
}
