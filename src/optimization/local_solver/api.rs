//! High-level entry point for minimizing an [`Objective`] inside a box.
//!
//! This selects an L-BFGS solver with either Hager–Zhang or More–Thuente line
//! search, wraps the oracle in a [`BoundedAdapter`] (which clamps into the
//! box and projects gradients), and delegates the run to `run_lbfgs`.
use crate::{
    domain::Bounds,
    optimization::{
        errors::{OptError, OptResult},
        local_solver::{
            LocalOutcome, Theta,
            adapter::{BoundedAdapter, EvalTracker},
            builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
            run::run_lbfgs,
            traits::{LineSearcher, LocalSolver, Objective, SolverOptions},
        },
    },
};

/// Minimize `objective` over `bounds` using L-BFGS with the chosen line search.
///
/// # Behavior
/// - Checks that `theta0` is a non-empty stack of `bounds.dim()`-wide points.
/// - Validates the initial guess via `objective.check(theta0)`.
/// - Clamps `theta0` into the box.
/// - Builds an L-BFGS solver with either **Hager–Zhang** or **More–Thuente**
///   line search based on `opts.line_searcher`.
/// - Calls `run_lbfgs`, which configures the executor (initial params,
///   max iters, optional observers) and returns a [`LocalOutcome`].
///
/// # Errors
/// - [`OptError::InvalidShape`] if `theta0.len()` is zero or not a multiple
///   of `bounds.dim()`.
/// - Propagates any error from `objective.check`.
/// - Propagates builder errors from `build_optimizer_*`.
/// - Propagates runtime errors from `run_lbfgs`.
///
/// # Example
/// ```no_run
/// use ndarray::array;
/// use random_ei::domain::Bounds;
/// use random_ei::optimization::errors::OptResult;
/// use random_ei::optimization::local_solver::{
///     Cost, Grad, Objective, SolverOptions, Theta, minimize_bounded,
/// };
///
/// struct Bowl;
/// impl Objective for Bowl {
///     fn value_and_grad(&self, theta: &Theta) -> OptResult<(Cost, Grad)> {
///         Ok((theta.dot(theta), theta.mapv(|t| 2.0 * t)))
///     }
///     fn check(&self, _: &Theta) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let bounds = Bounds::new(vec![(0.5, 1.0), (-1.0, 1.0)])?;
/// let out = minimize_bounded(&Bowl, array![0.9, 0.7], &bounds, &SolverOptions::default())?;
/// println!("θ̂ = {:?}", out.theta_hat);
/// # Ok::<(), random_ei::optimization::errors::OptError>(())
/// ```
pub fn minimize_bounded<O: Objective + ?Sized>(
    objective: &O, theta0: Theta, bounds: &Bounds, opts: &SolverOptions,
) -> OptResult<LocalOutcome> {
    let dim = bounds.dim();
    if theta0.is_empty() || theta0.len() % dim != 0 {
        return Err(OptError::InvalidShape { len: theta0.len(), dim });
    }
    objective.check(&theta0)?;
    let theta0 = bounds.clamp_flat(&theta0);
    let tracker = EvalTracker::new();
    let problem = BoundedAdapter::new(objective, bounds, opts.tols.max_fun_evals, &tracker);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}

/// Default [`LocalSolver`]: L-BFGS under box constraints via [`minimize_bounded`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundedLbfgs;

impl LocalSolver for BoundedLbfgs {
    fn minimize<O: Objective + ?Sized>(
        &self, objective: &O, theta0: Theta, bounds: &Bounds, opts: &SolverOptions,
    ) -> OptResult<LocalOutcome> {
        minimize_bounded(objective, theta0, bounds, opts)
    }
}
