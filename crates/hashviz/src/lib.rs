//! Procedural point sampling driven by a small xxHash-style integer hash.
//!
//! A [generator::BatchSampler] evaluates a [shape::Shape] over a square grid of
//! samples, places the result with a [math::transform::DomainTransform] and
//! hashes the quantized positions, four lanes at a time and in parallel.
//! [field::SampleField] keeps the resulting [generator::Snapshot] alive between
//! regenerations.
//!
//! The [gravity] module holds the multi-source gravity accumulator and
//! [fractal] animates a tree of self-similar parts.

pub mod batch;
pub mod error;
pub mod field;
pub mod fractal;
pub mod function;
pub mod generator;
pub mod gravity;
pub mod hash;
pub mod math;
pub mod sampler;
pub mod shape;
pub mod utils;

pub use error::{Error, Result};

pub use rand_xoshiro::Xoshiro256StarStar as Rng;
