//! Execution helper that runs an `argmin` solver on a bounded problem and
//! returns a crate-friendly [`LocalOutcome`].
use crate::optimization::{
    errors::{OptError, OptResult},
    local_solver::{
        FnEvalMap, Grad, LocalOutcome, Objective, SolverOptions, Theta,
        adapter::{BoundedAdapter, EvalTracker},
        traits::StopReason,
    },
};
use argmin::core::{Executor, State};
use argmin_math::ArgminL2Norm;
use log::debug;

/// Run an `argmin` optimization for a box-constrained problem.
///
/// This is the shared runner used by both line-search variants. It wires up:
/// - the oracle via [`BoundedAdapter`],
/// - the chosen `Solver` (L-BFGS with Hager–Zhang/More–Thuente),
/// - initial parameter `theta0`,
/// - optional observers (behind the `obs_slog` feature),
/// - optional `max_iters`,
///   then executes the solver and converts the result into [`LocalOutcome`].
///
/// # Arguments
/// - `theta0`: Initial parameter vector, already inside the bounds.
/// - `opts`: Solver options (tolerances, verbosity, limits).
/// - `problem`: A [`BoundedAdapter`] wrapping the oracle and the box.
/// - `solver`: A fully constructed solver from the builders module.
///
/// # Behavior
/// - The start point is evaluated first; if its projected gradient already
///   satisfies `tol_grad`, the solve ends there without starting argmin.
/// - The reported point is always the lowest-cost feasible point the
///   oracle evaluated, which is never worse than argmin's best iterate.
/// - Running out of `max_fun_evals`, or a line search that can no longer
///   find an acceptable step, ends the solve early with that best point
///   (`converged == false`).
///
/// # Feature flags
/// If the `obs_slog` feature is enabled and `opts.verbose == true`, a terminal
/// slog observer is attached with `ObserverMode::Always`.
///
/// # Errors
/// - Any oracle error (model failures, non-finite values, shape errors).
/// - Any other `argmin` runtime error, via `From<argmin::core::Error>`.
/// - Validation errors encountered when constructing [`LocalOutcome`].
pub fn run_lbfgs<'a, O, S>(
    theta0: Theta, opts: &SolverOptions, problem: BoundedAdapter<'a, O>, solver: S,
) -> OptResult<LocalOutcome>
where
    O: Objective + ?Sized,
    S: argmin::core::Solver<
            BoundedAdapter<'a, O>,
            argmin::core::IterState<Theta, Grad, (), (), (), f64>,
        > + Send
        + 'static,
{
    let tracker = problem.tracker;
    let (cost0, grad0) = problem.evaluate(&theta0)?;
    let grad0_norm = grad0.l2_norm();
    if opts.verbose {
        debug!("init: cost(theta0) = {cost0:.6}, ||grad|| = {grad0_norm:.6}");
    }
    if opts.tols.tol_grad.is_some_and(|tol| grad0_norm < tol) {
        return finish(tracker, StopReason::Stationary, Some(0), FnEvalMap::new());
    }

    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    match optimizer.run() {
        Ok(result) => {
            let state = result.state();
            let iterations = state.get_iter();
            let function_counts = state.get_func_counts().clone();
            let termination = state.get_termination_status().clone();
            finish(tracker, StopReason::Solver(termination), Some(iterations), function_counts)
        }
        Err(err) => {
            let err = OptError::from(err);
            match soft_stop(&err) {
                Some(stop) if tracker.best().is_some() => {
                    debug!("local solve stopped early: {err}");
                    finish(tracker, stop, None, FnEvalMap::new())
                }
                _ => Err(err),
            }
        }
    }
}

// ---- Helper Methods ----

fn finish(
    tracker: &EvalTracker, stop: StopReason, iterations: Option<u64>, fn_evals: FnEvalMap,
) -> OptResult<LocalOutcome> {
    let (theta_hat, value, grad) = match tracker.best() {
        Some(best) => (Some(best.theta), best.cost, Some(best.grad)),
        None => (None, f64::NAN, None),
    };
    LocalOutcome::new(theta_hat, value, stop, iterations, fn_evals, tracker.evals(), grad)
}

/// Errors that end a solve early without invalidating its best point.
fn soft_stop(err: &OptError) -> Option<StopReason> {
    match err {
        OptError::EvaluationBudgetExhausted { .. } => Some(StopReason::BudgetExhausted),
        OptError::ConditionViolated { text } => Some(StopReason::Stalled(text.clone())),
        _ => None,
    }
}
