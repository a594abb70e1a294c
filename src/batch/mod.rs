//! batch — multi-start acquisition search and batch assembly.
//!
//! Purpose
//! -------
//! Turn a fitted surrogate into the next batch of points to evaluate: one
//! point maximizing Expected Improvement, found by repeated bounded local
//! solves from random starts, followed by uniformly random points.
//!
//! Key behaviors
//! -------------
//! - [`options`]: validated [`OptimizerConfig`] and [`BatchOptions`].
//! - [`multistart`]: [`optimize_acquisition`] runs the restarts, records a
//!   [`TrialOutcome`] for each, and keeps the strictly best result.
//! - [`selector`]: [`BatchSelector`] stacks the optimum over random fill;
//!   [`select_batch`] is the seeded one-call entry point.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every returned row lies inside the configured bounds.
//! - The random generator is always passed in explicitly; with a fixed seed
//!   the whole selection is reproducible.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the reduction rule with a scripted solver, total
//!   failure, and batch shape; the full pipeline is exercised in
//!   `tests/integration_random_ei_pipeline.rs`.

pub mod multistart;
pub mod options;
pub mod selector;

pub use self::multistart::{AcquisitionOptimum, TrialOutcome, optimize_acquisition};
pub use self::options::{BatchOptions, DEFAULT_RESTARTS, OptimizerConfig};
pub use self::selector::{Batch, BatchSelector, select_batch};
