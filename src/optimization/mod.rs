//! optimization — bounded local solver, numerical helpers, and unified error surface.
//!
//! Purpose
//! -------
//! Provide the optimization layer the acquisition search runs on: an
//! Argmin-backed, box-constrained L-BFGS solver, the guarded numerical
//! primitives Expected Improvement depends on, and a single error/result
//! surface shared by every module of the crate.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **minimizing** a joint value/gradient
//!   oracle inside a box (`local_solver`), including solver, tolerance and
//!   evaluation-budget configuration.
//! - Supply the standard-normal density/CDF and the variance floor
//!   (`numerical_stability`).
//! - Normalize configuration issues, model failures, numerical failures and
//!   backend solver errors into a single enum (`errors::OptError`) with a
//!   common result alias (`OptResult<T>`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Solvers operate on flat `ndarray` vectors and assume finite inputs once
//!   validation has passed; invalid states are reported as `OptError`, not
//!   panics.
//! - Oracle errors raised inside argmin round-trip back to their original
//!   `OptError` variant.
//!
//! Conventions
//! -----------
//! - Public entrypoints that can fail return `OptResult<T>`; callers never
//!   see raw Argmin errors.
//! - This module logs only at `debug` level and never performs I/O.
//!
//! Downstream usage
//! ----------------
//! - The acquisition layer implements `local_solver::Objective` for the
//!   Expected Improvement objective; the batch layer drives restarts through
//!   `local_solver::LocalSolver`.
//! - Front-ends typically import the curated surface via
//!   `optimization::prelude::*`.
//!
//! Testing notes
//! -------------
//! - Unit tests in the submodules focus on local concerns: projection and
//!   budgets, solver wiring, normal-distribution helpers, and error
//!   conversions.

pub mod errors;
pub mod local_solver;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use random_ei::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::local_solver::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
