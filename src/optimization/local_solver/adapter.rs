//! Adapter that exposes an [`Objective`] as a box-constrained `argmin` problem.
//!
//! argmin's L-BFGS is unconstrained, so the box is enforced here by
//! minimizing a continuous extension of the oracle instead:
//!
//! `c̃(θ) = c(P(θ)) + ρ·‖θ − P(θ)‖²`, where `P` clamps into [`Bounds`].
//!
//! - The oracle is only ever evaluated at feasible points `P(θ)`.
//! - For coordinates strictly outside the box the oracle term does not
//!   depend on `θᵢ`, so its gradient there is just the penalty
//!   `2ρ(θᵢ − P(θ)ᵢ)`, pulling the iterate back.
//! - On the box, gradient components that would push an active coordinate
//!   out are zeroed, so a point on a face has a zero projected gradient.
//! - Every minimizer of the constrained problem minimizes `c̃` as well, and
//!   reported results always refer to feasible points and raw oracle costs.
//!
//! argmin asks for the cost and the gradient through separate calls, while
//! the oracle produces both at once. The last oracle evaluation is cached
//! in an [`EvalTracker`], which also counts oracle calls against the
//! optional evaluation budget and remembers the best feasible point seen.
use std::cell::{Cell, RefCell};

use crate::{
    domain::Bounds,
    optimization::{
        errors::{OptError, OptResult},
        local_solver::{
            traits::Objective,
            types::{Cost, Grad, Theta},
            validation::{validate_grad, validate_value},
        },
    },
};
use argmin::core::{CostFunction, Error, Gradient};

/// Weight `ρ` of the quadratic pull-back outside the box.
pub const BOUND_PENALTY: f64 = 1.0;

/// A feasible point together with its cost and projected gradient.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluated {
    pub theta: Theta,
    pub cost: Cost,
    pub grad: Grad,
}

/// Book-keeping shared between a run and its adapter.
///
/// The executor takes ownership of the problem, so the tracker lives
/// outside it and is borrowed; after the run (successful or not) the
/// caller can still read the evaluation count and the best point.
#[derive(Debug, Default)]
pub struct EvalTracker {
    evals: Cell<usize>,
    last: RefCell<Option<Evaluated>>,
    best: RefCell<Option<Evaluated>>,
}

impl EvalTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of oracle evaluations performed so far (cache hits excluded).
    pub fn evals(&self) -> usize {
        self.evals.get()
    }

    /// Lowest-cost feasible point evaluated so far; earlier points win ties.
    pub fn best(&self) -> Option<Evaluated> {
        self.best.borrow().clone()
    }

    fn cached(&self, x: &Theta) -> Option<(Cost, Grad)> {
        self.last
            .borrow()
            .as_ref()
            .filter(|hit| hit.theta == *x)
            .map(|hit| (hit.cost, hit.grad.clone()))
    }

    fn record(&self, point: Evaluated) {
        self.evals.set(self.evals.get() + 1);
        {
            let mut best = self.best.borrow_mut();
            let improves = best.as_ref().is_none_or(|b| point.cost < b.cost);
            if improves {
                *best = Some(point.clone());
            }
        }
        *self.last.borrow_mut() = Some(point);
    }
}

/// Bridges an [`Objective`] to `argmin`'s `CostFunction` and `Gradient`
/// under box constraints.
#[derive(Debug)]
pub struct BoundedAdapter<'a, O: Objective + ?Sized> {
    pub objective: &'a O,
    pub bounds: &'a Bounds,
    pub max_fun_evals: Option<usize>,
    pub tracker: &'a EvalTracker,
}

impl<'a, O: Objective + ?Sized> BoundedAdapter<'a, O> {
    /// Construct a new adapter over an oracle, its box and a tracker.
    pub fn new(
        objective: &'a O, bounds: &'a Bounds, max_fun_evals: Option<usize>,
        tracker: &'a EvalTracker,
    ) -> Self {
        Self { objective, bounds, max_fun_evals, tracker }
    }

    /// Feasible point, oracle cost and projected oracle gradient for `theta`.
    ///
    /// # Errors
    /// - [`OptError::EvaluationBudgetExhausted`] once `max_fun_evals`
    ///   oracle calls have been made.
    /// - [`OptError::NonFiniteCost`], [`OptError::GradientDimMismatch`],
    ///   [`OptError::InvalidGradient`] for unusable oracle output.
    /// - Any error the oracle reports.
    pub fn evaluate_feasible(&self, theta: &Theta) -> OptResult<(Theta, Cost, Grad)> {
        let x = self.bounds.clamp_flat(theta);
        if let Some((cost, grad)) = self.tracker.cached(&x) {
            return Ok((x, cost, grad));
        }
        if let Some(max_fun_evals) = self.max_fun_evals {
            if self.tracker.evals() >= max_fun_evals {
                return Err(OptError::EvaluationBudgetExhausted { max_fun_evals });
            }
        }
        let (cost, mut grad) = self.objective.value_and_grad(&x)?;
        validate_value(cost)?;
        validate_grad(&grad, x.len())?;
        self.bounds.project_gradient_flat(&x, &mut grad);
        self.tracker.record(Evaluated { theta: x.clone(), cost, grad: grad.clone() });
        Ok((x, cost, grad))
    }

    /// Extended cost `c̃(θ)` and its gradient, as seen by argmin.
    ///
    /// # Errors
    /// Same as [`evaluate_feasible`](Self::evaluate_feasible).
    pub fn evaluate(&self, theta: &Theta) -> OptResult<(Cost, Grad)> {
        let (x, mut cost, mut grad) = self.evaluate_feasible(theta)?;
        for ((&t, &xi), g) in theta.iter().zip(x.iter()).zip(grad.iter_mut()) {
            if t != xi {
                let excess = t - xi;
                cost += BOUND_PENALTY * excess * excess;
                *g = 2.0 * BOUND_PENALTY * excess;
            }
        }
        Ok((cost, grad))
    }
}

impl<O: Objective + ?Sized> CostFunction for BoundedAdapter<'_, O> {
    type Param = Theta;
    type Output = Cost;

    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let (cost, _) = self.evaluate(theta)?;
        Ok(cost)
    }
}

impl<O: Objective + ?Sized> Gradient for BoundedAdapter<'_, O> {
    type Param = Theta;
    type Gradient = Grad;

    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let (_, grad) = self.evaluate(theta)?;
        Ok(grad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Clamping, gradient projection, caching, budget enforcement and best
    // tracking of the bounded adapter, using a quadratic oracle.
    // -------------------------------------------------------------------------

    /// `c(θ) = Σ (θᵢ − 2)²`, minimized outside the unit box.
    struct ShiftedQuadratic;

    impl Objective for ShiftedQuadratic {
        fn value_and_grad(&self, theta: &Theta) -> OptResult<(Cost, Grad)> {
            let diff = theta.mapv(|t| t - 2.0);
            Ok((diff.dot(&diff), diff.mapv(|d| 2.0 * d)))
        }
        fn check(&self, _theta: &Theta) -> OptResult<()> {
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // Out-of-box parameters are evaluated at their clamped image plus the
    // pull-back penalty.
    //
    // Given
    // -----
    // - Bounds [0, 1]², θ = [3, 0.5].
    //
    // Expect
    // ------
    // - Oracle at [1, 0.5]: 1 + 2.25 = 3.25; penalty ρ·2² = 4.
    // - Gradient [2ρ·2, −3] = [4, −3].
    // - Best feasible point [1, 0.5] with the raw cost 3.25.
    fn evaluate_extends_cost_outside_the_box() {
        // Arrange
        let bounds = Bounds::new(vec![(0.0, 1.0); 2]).unwrap();
        let tracker = EvalTracker::new();
        let adapter = BoundedAdapter::new(&ShiftedQuadratic, &bounds, None, &tracker);

        // Act
        let (cost, grad) = adapter.evaluate(&array![3.0, 0.5]).unwrap();

        // Assert
        assert_eq!(cost, 3.25 + 4.0 * BOUND_PENALTY);
        assert_eq!(grad, array![4.0 * BOUND_PENALTY, -3.0]);
        let best = tracker.best().unwrap();
        assert_eq!(best.theta, array![1.0, 0.5]);
        assert_eq!(best.cost, 3.25);
    }

    #[test]
    // Purpose
    // -------
    // On a face, the outward component of the gradient is removed and the
    // inward one is kept.
    //
    // Given
    // -----
    // - θ = [1, 0.5] exactly on the upper face of the first coordinate.
    //
    // Expect
    // ------
    // - Raw gradient [−2, −3] becomes [0, −3]; no penalty.
    fn evaluate_projects_gradient_on_active_face() {
        let bounds = Bounds::new(vec![(0.0, 1.0); 2]).unwrap();
        let tracker = EvalTracker::new();
        let adapter = BoundedAdapter::new(&ShiftedQuadratic, &bounds, None, &tracker);

        let (cost, grad) = adapter.evaluate(&array![1.0, 0.5]).unwrap();

        assert_eq!(cost, 3.25);
        assert_eq!(grad, array![0.0, -3.0]);
    }

    #[test]
    // Purpose
    // -------
    // Cost followed by gradient at the same point costs one oracle call, and
    // so do two out-of-box points with the same clamped image.
    fn cost_and_gradient_share_one_evaluation() {
        let bounds = Bounds::new(vec![(0.0, 1.0)]).unwrap();
        let tracker = EvalTracker::new();
        let adapter = BoundedAdapter::new(&ShiftedQuadratic, &bounds, None, &tracker);
        let theta = array![0.25];

        let _ = adapter.cost(&theta).unwrap();
        let _ = adapter.gradient(&theta).unwrap();
        let _ = adapter.cost(&array![1.5]).unwrap();
        let _ = adapter.gradient(&array![2.5]).unwrap();

        assert_eq!(tracker.evals(), 2);
    }

    #[test]
    // Purpose
    // -------
    // The evaluation budget is enforced on fresh points only, and the best
    // point stays available after the budget runs out.
    //
    // Given
    // -----
    // - `max_fun_evals = 2`, evaluations at 0.1, 0.6, then 0.9.
    //
    // Expect
    // ------
    // - Third fresh point fails with `EvaluationBudgetExhausted`.
    // - Re-reading 0.6 still hits the cache; best is 0.6.
    fn budget_stops_fresh_evaluations_and_keeps_best() {
        // Arrange
        let bounds = Bounds::new(vec![(0.0, 1.0)]).unwrap();
        let tracker = EvalTracker::new();
        let adapter = BoundedAdapter::new(&ShiftedQuadratic, &bounds, Some(2), &tracker);

        // Act
        adapter.evaluate(&array![0.1]).unwrap();
        adapter.evaluate(&array![0.6]).unwrap();
        let err = adapter.evaluate(&array![0.9]).unwrap_err();

        // Assert
        assert_eq!(err, OptError::EvaluationBudgetExhausted { max_fun_evals: 2 });
        assert!(adapter.evaluate(&array![0.6]).is_ok());
        assert_eq!(tracker.best().unwrap().theta, array![0.6]);
        assert_eq!(tracker.evals(), 2);
    }

    #[test]
    // Purpose
    // -------
    // Oracle errors travel through argmin's error type and come back as the
    // original crate error.
    fn oracle_errors_round_trip_through_argmin() {
        struct Failing;
        impl Objective for Failing {
            fn value_and_grad(&self, _theta: &Theta) -> OptResult<(Cost, Grad)> {
                Err(OptError::NoObservations)
            }
            fn check(&self, _theta: &Theta) -> OptResult<()> {
                Ok(())
            }
        }
        let bounds = Bounds::new(vec![(0.0, 1.0)]).unwrap();
        let tracker = EvalTracker::new();
        let adapter = BoundedAdapter::new(&Failing, &bounds, None, &tracker);

        let err: OptError = adapter.cost(&array![0.5]).unwrap_err().into();

        assert_eq!(err, OptError::NoObservations);
        assert!(tracker.best().is_none());
    }
}
