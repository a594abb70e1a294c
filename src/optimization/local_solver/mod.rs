//! local_solver — argmin-powered, box-constrained local minimization.
//!
//! Purpose
//! -------
//! Provide the bounded quasi-Newton solve that each acquisition restart
//! runs: callers implement [`Objective`] (joint cost and gradient), pick
//! [`SolverOptions`], and call [`minimize_bounded`] (or go through the
//! [`LocalSolver`] seam with [`BoundedLbfgs`]).
//!
//! Key behaviors
//! -------------
//! - Enforce box constraints around argmin's unconstrained L-BFGS via
//!   [`adapter::BoundedAdapter`]: oracle calls happen only at clamped
//!   points, outward gradient components are projected away, and a
//!   quadratic pull-back keeps the extended cost continuous outside the box.
//! - Build solvers with Hager–Zhang or More–Thuente line search
//!   ([`builders`]) and execute them ([`run::run_lbfgs`]).
//! - Enforce an optional oracle-evaluation budget; hitting it ends the solve
//!   with the best feasible point seen.
//! - Offer a finite-difference gradient check ([`finite_diff`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Parameters are flat stacks of `bounds.dim()`-wide points ([`Theta`]).
//! - Every reported point lies inside the bounds and carries the raw oracle
//!   cost, never the penalized one.
//! - Configuration types ([`Tolerances`], [`SolverOptions`]) are validated on
//!   construction.
//!
//! Conventions
//! -----------
//! - The cost is minimized as given; no sign flips.
//! - Errors bubble up as [`OptResult<T>`](crate::optimization::errors::OptResult);
//!   argmin's error type never crosses the module boundary.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover projection, caching and budgets in
//!   [`adapter`], solver construction in [`builders`], interior, boundary and
//!   early-exit solves in [`run`], and configuration rules in [`traits`].

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::{BoundedLbfgs, minimize_bounded};
pub use self::finite_diff::{DerivativeCheck, derivative_check};
pub use self::traits::{
    LineSearcher, LocalOutcome, LocalSolver, Objective, SolverOptions, StopReason, Tolerances,
};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

pub mod prelude {
    pub use super::api::{BoundedLbfgs, minimize_bounded};
    pub use super::traits::{LocalOutcome, LocalSolver, Objective, SolverOptions, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
