//! Differential evolution over variable-length signal plans.
//!
//! - [`SignalPlan`] — Chromosome: ordered, duplicate-free local indices
//! - [`operators`] — Population creation, recombination, repair, grow/shrink mutation
//! - [`Population`] — Fixed-size population with steady-state or generational selection
//! - [`SignalProblem`] — One zone's search space and fitness
//! - [`DeRunner`] — Init → evolve → extract loop for one zone

mod chromosome;
mod config;
pub mod operators;
mod population;
mod problem;
mod runner;

pub use chromosome::SignalPlan;
pub use config::{DeConfig, Objective, Replacement};
pub use operators::{create_population, mutate_length, recombine, LengthMutation};
pub use population::Population;
pub use problem::SignalProblem;
pub use runner::{DeResult, DeRunner};
