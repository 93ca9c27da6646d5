//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use case: price prediction with ownership-cost deltas.

mod predictor;

pub use predictor::PredictorService;
