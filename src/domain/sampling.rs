//! domain::sampling — uniform draws inside [`Bounds`].
//!
//! Random sources are always passed in explicitly (`&mut R`), so a caller
//! holding a seeded generator gets reproducible starts and filler points.
use crate::domain::bounds::Bounds;
use ndarray::Array2;
use ndarray_rand::{
    RandomExt,
    rand::{Rng, SeedableRng},
    rand_distr::Uniform,
};
use rand_xoshiro::Xoshiro256Plus;

/// Default generator used by the batch selector.
pub type DefaultRng = Xoshiro256Plus;

/// Build the default generator, seeded when `seed` is given and from OS
/// entropy otherwise.
pub fn make_rng(seed: Option<u64>) -> DefaultRng {
    match seed {
        Some(seed) => Xoshiro256Plus::seed_from_u64(seed),
        None => Xoshiro256Plus::from_entropy(),
    }
}

/// Source of candidate points inside a box.
pub trait RandomSampler {
    /// Draw `n` points; returns an `n × bounds.dim()` matrix.
    fn sample<R: Rng + ?Sized>(&self, bounds: &Bounds, n: usize, rng: &mut R) -> Array2<f64>;
}

/// Independent uniform draws per coordinate.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformSampler;

impl RandomSampler for UniformSampler {
    fn sample<R: Rng + ?Sized>(&self, bounds: &Bounds, n: usize, rng: &mut R) -> Array2<f64> {
        let mut points = Array2::random_using((n, bounds.dim()), Uniform::new(0.0, 1.0), rng);
        for (mut column, &(low, high)) in points.columns_mut().into_iter().zip(bounds.pairs()) {
            column.mapv_inplace(|u| (low + (high - low) * u).min(high));
        }
        points
    }
}
