//! batch::selector — one EI-optimal point followed by random fill.
//!
//! [`BatchSelector`] runs the multi-start acquisition search and stacks its
//! optimum on top of `batch_size − 1` points drawn from the sampler. Row 0
//! of the returned matrix is always the optimized point.
use crate::{
    batch::{
        multistart::{AcquisitionOptimum, optimize_acquisition},
        options::BatchOptions,
    },
    domain::{RandomSampler, UniformSampler, make_rng},
    optimization::{errors::OptResult, local_solver::{BoundedLbfgs, LocalSolver}},
    surrogate::SurrogateModel,
};
use log::info;
use ndarray::{Array2, s};
use ndarray_rand::rand::Rng;

/// A selected batch.
///
/// - `points`: `batch_size × dim`; row 0 is `optimum.point`, the remaining
///   rows are random draws.
/// - `optimum`: the acquisition search result behind row 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub points: Array2<f64>,
    pub optimum: AcquisitionOptimum,
}

/// Batch selector parameterized by its local solver and sampler.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchSelector<S = BoundedLbfgs, Smp = UniformSampler> {
    pub solver: S,
    pub sampler: Smp,
}

impl<S: LocalSolver, Smp: RandomSampler> BatchSelector<S, Smp> {
    pub fn new(solver: S, sampler: Smp) -> Self {
        Self { solver, sampler }
    }

    /// Select `options.batch_size` points for the next round of evaluations.
    ///
    /// Parameters
    /// ----------
    /// - `model`: `&M`
    ///   Fitted surrogate with at least one observation.
    /// - `options`: `&BatchOptions`
    ///   Bounds, batch size and optimizer configuration.
    /// - `rng`: `&mut R`
    ///   Generator for restart starts and filler points, consumed in that
    ///   order.
    ///
    /// Returns
    /// -------
    /// `OptResult<Batch>`
    ///   Exactly `batch_size` rows inside the bounds, optimized point first.
    ///
    /// Errors
    /// ------
    /// - Propagates every error of
    ///   [`optimize_acquisition`](crate::batch::multistart::optimize_acquisition),
    ///   including `NoFeasibleCandidate`.
    pub fn select<M, R>(&self, model: &M, options: &BatchOptions, rng: &mut R) -> OptResult<Batch>
    where
        M: SurrogateModel + ?Sized,
        R: Rng + ?Sized,
    {
        let optimum = optimize_acquisition(
            model,
            &options.bounds,
            &options.optimizer,
            &self.solver,
            &self.sampler,
            rng,
        )?;

        let dim = options.bounds.dim();
        let mut points = Array2::zeros((options.batch_size, dim));
        points.row_mut(0).assign(&optimum.point);
        if options.batch_size > 1 {
            let fill = self.sampler.sample(&options.bounds, options.batch_size - 1, rng);
            points.slice_mut(s![1.., ..]).assign(&fill);
        }

        info!(
            "selected batch of {} (EI optimum {:.6e} from restart {} of {})",
            options.batch_size,
            -optimum.value,
            optimum.best_restart,
            options.optimizer.restarts
        );
        Ok(Batch { points, optimum })
    }
}

/// Select a batch with the default bounded L-BFGS solver and uniform
/// sampler, seeding the generator from `seed` (entropy when `None`).
pub fn select_batch<M: SurrogateModel + ?Sized>(
    model: &M, options: &BatchOptions, seed: Option<u64>,
) -> OptResult<Batch> {
    let mut rng = make_rng(seed);
    BatchSelector::<BoundedLbfgs, UniformSampler>::default().select(model, options, &mut rng)
}
