//! Fitness evaluation of signal plans.

mod evaluator;

pub use evaluator::{is_coordinated, FitnessParams, SignalEvaluator};
