//! batch::multistart — multi-restart search for the acquisition optimum.
//!
//! Purpose
//! -------
//! Find one point in the box minimizing the negated Expected Improvement,
//! robust to local optima and to individual solver failures.
//!
//! Key behaviors
//! -------------
//! - For each restart, draw one start point uniformly in the box and run a
//!   bounded local solve on the flat acquisition objective.
//! - A failed solve is recorded as [`TrialOutcome::Failed`] and logged at
//!   `warn`; it never aborts the search.
//! - The reduction keeps the strictly lowest objective value; on ties the
//!   earlier restart wins. It is a fold over the trials in restart order, so
//!   the answer does not depend on the order solves finish in.
//! - If every restart fails, [`OptError::NoFeasibleCandidate`] is returned.
//!
//! Invariants & assumptions
//! ------------------------
//! - The surrogate has at least one observation and its input dimension
//!   equals `bounds.dim()`; both are checked before any restart runs.
//! - Start points are drawn from the caller's generator, one restart at a
//!   time, so a fixed seed reproduces the whole search.
use crate::{
    acquisition::AcquisitionObjective,
    batch::options::OptimizerConfig,
    domain::{Bounds, RandomSampler},
    optimization::{
        errors::{OptError, OptResult},
        local_solver::{LocalOutcome, LocalSolver},
    },
    surrogate::SurrogateModel,
};
use log::{debug, warn};
use ndarray::Array1;
use ndarray_rand::rand::Rng;

/// Result of one restart.
#[derive(Debug, Clone, PartialEq)]
pub enum TrialOutcome {
    /// The local solve returned a point; `outcome.converged` says whether it
    /// met the tolerances or stopped early on a budget or stalled line search.
    Solved { restart: usize, start: Array1<f64>, outcome: LocalOutcome },
    /// The local solve failed; `error` is an [`OptError::SolverFailure`].
    Failed { restart: usize, start: Array1<f64>, error: OptError },
}

impl TrialOutcome {
    pub fn restart(&self) -> usize {
        match self {
            TrialOutcome::Solved { restart, .. } | TrialOutcome::Failed { restart, .. } => *restart,
        }
    }
}

/// Best acquisition point over all restarts.
#[derive(Debug, Clone, PartialEq)]
pub struct AcquisitionOptimum {
    /// Minimizer of the negated EI, inside the bounds.
    pub point: Array1<f64>,
    /// Negated EI at `point`.
    pub value: f64,
    /// Restart that produced `point`.
    pub best_restart: usize,
    /// Every restart, in order.
    pub trials: Vec<TrialOutcome>,
}

/// optimize_acquisition — multi-restart minimization of the negated EI.
///
/// Parameters
/// ----------
/// - `model`: `&M`
///   Fitted surrogate with at least one observation.
/// - `bounds`: `&Bounds`
///   Search box; `bounds.dim()` must equal the model input dimension.
/// - `config`: `&OptimizerConfig`
///   Restart count and local solver options.
/// - `solver`: `&S`
///   Local solver run once per restart.
/// - `sampler`: `&Smp`
///   Source of start points.
/// - `rng`: `&mut R`
///   Random generator for the start points.
///
/// Returns
/// -------
/// `OptResult<AcquisitionOptimum>`
///   The best point, its value, the winning restart and every trial.
///
/// Errors
/// ------
/// - `OptError::BoundsDimMismatch` if the box and the model disagree.
/// - `OptError::NoObservations` if the model has no data.
/// - `OptError::NoFeasibleCandidate` if every restart failed.
pub fn optimize_acquisition<M, S, Smp, R>(
    model: &M, bounds: &Bounds, config: &OptimizerConfig, solver: &S, sampler: &Smp, rng: &mut R,
) -> OptResult<AcquisitionOptimum>
where
    M: SurrogateModel + ?Sized,
    S: LocalSolver + ?Sized,
    Smp: RandomSampler + ?Sized,
    R: Rng + ?Sized,
{
    let dim = model.input_dim();
    if bounds.dim() != dim {
        return Err(OptError::BoundsDimMismatch { expected: dim, found: bounds.dim() });
    }
    model.fmin()?;
    let objective = AcquisitionObjective::new(model);

    let mut trials = Vec::with_capacity(config.restarts);
    for restart in 0..config.restarts {
        let start = sampler.sample(bounds, 1, rng).row(0).to_owned();
        match solver.minimize(&objective, start.clone(), bounds, &config.solver) {
            Ok(outcome) => {
                debug!(
                    "restart {restart}: value {:.6e} at {:?} ({})",
                    outcome.value, outcome.theta_hat, outcome.status
                );
                trials.push(TrialOutcome::Solved { restart, start, outcome });
            }
            Err(err) => {
                let error = OptError::SolverFailure { restart, reason: err.to_string() };
                warn!("{error}");
                trials.push(TrialOutcome::Failed { restart, start, error });
            }
        }
    }

    match best_trial(&trials) {
        Some((best_restart, outcome)) => Ok(AcquisitionOptimum {
            point: outcome.theta_hat.clone(),
            value: outcome.value,
            best_restart,
            trials,
        }),
        None => Err(OptError::NoFeasibleCandidate {
            restarts: config.restarts,
            last_reason: last_failure(&trials),
        }),
    }
}

/// Fold the trials in restart order: strictly lower value wins.
fn best_trial(trials: &[TrialOutcome]) -> Option<(usize, &LocalOutcome)> {
    trials.iter().fold(None, |best, trial| match trial {
        TrialOutcome::Solved { restart, outcome, .. } => match best {
            Some((_, incumbent)) if outcome.value >= incumbent.value => best,
            _ => {
                debug!("restart {restart} takes the lead with {:.6e}", outcome.value);
                Some((*restart, outcome))
            }
        },
        TrialOutcome::Failed { .. } => best,
    })
}

fn last_failure(trials: &[TrialOutcome]) -> String {
    trials
        .iter()
        .rev()
        .find_map(|trial| match trial {
            TrialOutcome::Failed { error: OptError::SolverFailure { reason, .. }, .. } => {
                Some(reason.clone())
            }
            TrialOutcome::Failed { error, .. } => Some(error.to_string()),
            TrialOutcome::Solved { .. } => None,
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{UniformSampler, make_rng},
        optimization::local_solver::{
            BoundedLbfgs, FnEvalMap, LineSearcher, Objective, SolverOptions, StopReason, Theta,
            Tolerances,
        },
        surrogate::gp::{GaussianProcess, GpParams},
    };
    use ndarray::array;
    use std::cell::Cell;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The reduction rule (strictly lower wins, ties keep the earlier trial)
    //   with a scripted solver.
    // - Containment of individual failures and the all-fail error.
    // - Up-front checks on dimension and observations.
    // - A real solve on a 1-D GP.
    // -------------------------------------------------------------------------

    /// Solver that returns scripted values (or failures) in call order.
    struct Scripted {
        values: Vec<Option<f64>>,
        calls: Cell<usize>,
    }

    impl Scripted {
        fn new(values: Vec<Option<f64>>) -> Self {
            Self { values, calls: Cell::new(0) }
        }
    }

    impl LocalSolver for Scripted {
        fn minimize<O: Objective + ?Sized>(
            &self, _objective: &O, theta0: Theta, _bounds: &Bounds, _opts: &SolverOptions,
        ) -> OptResult<LocalOutcome> {
            let call = self.calls.get();
            self.calls.set(call + 1);
            match self.values[call] {
                Some(value) => LocalOutcome::new(
                    Some(theta0),
                    value,
                    StopReason::Stationary,
                    Some(0),
                    FnEvalMap::new(),
                    1,
                    None,
                ),
                None => Err(OptError::ConditionViolated { text: format!("call {call}") }),
            }
        }
    }

    fn gp_1d() -> GaussianProcess {
        let params = GpParams::new(0.3, 1.0, 1e-8).unwrap();
        GaussianProcess::fit(array![[0.2], [0.8]], array![1.0, -1.0], params).unwrap()
    }

    fn config(restarts: usize) -> OptimizerConfig {
        OptimizerConfig::new(restarts, SolverOptions::default()).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Strictly lower values win, equal values keep the earlier restart, and
    // failures in between are skipped.
    //
    // Given
    // -----
    // - Scripted values [−0.5, −0.7, fail, −0.7, −0.6].
    //
    // Expect
    // ------
    // - Best restart 1 with value −0.7; five trials recorded, one failed.
    fn optimize_acquisition_keeps_first_strict_minimum() {
        // Arrange
        let gp = gp_1d();
        let bounds = Bounds::new(vec![(0.0, 1.0)]).unwrap();
        let solver = Scripted::new(vec![Some(-0.5), Some(-0.7), None, Some(-0.7), Some(-0.6)]);
        let mut rng = make_rng(Some(3));

        // Act
        let optimum =
            optimize_acquisition(&gp, &bounds, &config(5), &solver, &UniformSampler, &mut rng)
                .unwrap();

        // Assert
        assert_eq!(optimum.best_restart, 1);
        assert_eq!(optimum.value, -0.7);
        assert_eq!(optimum.trials.len(), 5);
        assert!(matches!(
            &optimum.trials[2],
            TrialOutcome::Failed { restart: 2, error: OptError::SolverFailure { .. }, .. }
        ));
        assert_eq!(optimum.trials[1].restart(), 1);
    }

    #[test]
    // Purpose
    // -------
    // When every restart fails, the search reports it instead of inventing
    // a point.
    //
    // Given
    // -----
    // - A solver failing on all three restarts.
    //
    // Expect
    // ------
    // - `NoFeasibleCandidate { restarts: 3, .. }` naming the last failure.
    fn optimize_acquisition_reports_total_failure() {
        // Arrange
        let gp = gp_1d();
        let bounds = Bounds::new(vec![(0.0, 1.0)]).unwrap();
        let solver = Scripted::new(vec![None, None, None]);
        let mut rng = make_rng(Some(3));

        // Act
        let err =
            optimize_acquisition(&gp, &bounds, &config(3), &solver, &UniformSampler, &mut rng)
                .unwrap_err();

        // Assert
        match err {
            OptError::NoFeasibleCandidate { restarts, last_reason } => {
                assert_eq!(restarts, 3);
                assert!(last_reason.contains("call 2"), "{last_reason}");
            }
            other => panic!("expected NoFeasibleCandidate, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Configuration mismatches fail before any restart runs.
    fn optimize_acquisition_checks_dimension_first() {
        let gp = gp_1d();
        let bounds = Bounds::new(vec![(0.0, 1.0); 2]).unwrap();
        let solver = Scripted::new(vec![]);
        let mut rng = make_rng(Some(3));

        let err =
            optimize_acquisition(&gp, &bounds, &config(2), &solver, &UniformSampler, &mut rng)
                .unwrap_err();

        assert_eq!(err, OptError::BoundsDimMismatch { expected: 1, found: 2 });
        assert_eq!(solver.calls.get(), 0);
    }

    #[test]
    // Purpose
    // -------
    // A real bounded L-BFGS search returns a feasible point at least as good
    // as every successful restart.
    //
    // Given
    // -----
    // - GP on {(0.2, 1), (0.8, −1)}, bounds [0, 1], three restarts.
    //
    // Expect
    // ------
    // - `point` in [0, 1], `value < 0`, and no successful trial beats it.
    fn optimize_acquisition_with_bounded_lbfgs() {
        // Arrange
        let gp = gp_1d();
        let bounds = Bounds::new(vec![(0.0, 1.0)]).unwrap();
        let mut rng = make_rng(Some(42));

        // Act
        let optimum =
            optimize_acquisition(&gp, &bounds, &config(3), &BoundedLbfgs, &UniformSampler, &mut rng)
                .unwrap();

        // Assert
        assert!(bounds.contains(optimum.point.view()));
        assert!(optimum.value < 0.0);
        for trial in &optimum.trials {
            if let TrialOutcome::Solved { outcome, .. } = trial {
                assert!(optimum.value <= outcome.value);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // A restart that stops early on its evaluation budget still yields a
    // usable point; it is recorded as solved while its outcome reports that
    // it did not converge.
    //
    // Given
    // -----
    // - Bounded L-BFGS limited to two oracle evaluations, with an
    //   unreachable gradient tolerance, two restarts.
    //
    // Expect
    // ------
    // - Both trials are `Solved` with `outcome.converged == false`, and the
    //   search returns a point inside the bounds.
    fn optimize_acquisition_keeps_soft_stopped_restarts() {
        // Arrange
        let gp = gp_1d();
        let bounds = Bounds::new(vec![(0.0, 1.0)]).unwrap();
        let tols = Tolerances::new(Some(1e-300), None, Some(100), Some(2)).unwrap();
        let solver = SolverOptions::new(tols, LineSearcher::MoreThuente, false, None).unwrap();
        let config = OptimizerConfig::new(2, solver).unwrap();
        let mut rng = make_rng(Some(8));

        // Act
        let optimum =
            optimize_acquisition(&gp, &bounds, &config, &BoundedLbfgs, &UniformSampler, &mut rng)
                .unwrap();

        // Assert
        assert!(bounds.contains(optimum.point.view()));
        for trial in &optimum.trials {
            match trial {
                TrialOutcome::Solved { outcome, .. } => assert!(!outcome.converged, "{outcome:?}"),
                TrialOutcome::Failed { error, .. } => panic!("unexpected failure: {error}"),
            }
        }
    }
}
