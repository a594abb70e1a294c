//! domain — search-space description and random point generation.
//!
//! - [`bounds::Bounds`]: validated box constraints plus the flat
//!   clamp/projection helpers used by the bounded local solver.
//! - [`sampling::RandomSampler`] / [`sampling::UniformSampler`]: uniform
//!   draws inside a box from a caller-supplied generator.

pub mod bounds;
pub mod sampling;

pub use self::bounds::Bounds;
pub use self::sampling::{DefaultRng, RandomSampler, UniformSampler, make_rng};
