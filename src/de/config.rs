//! Differential evolution configuration.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::evaluation::FitnessParams;

/// Direction of optimization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Lower fitness is better.
    #[default]
    Minimize,
    /// Higher fitness is better.
    Maximize,
}

impl Objective {
    /// Returns `true` if `candidate` is strictly better than `incumbent`.
    pub fn improves(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Objective::Minimize => candidate < incumbent,
            Objective::Maximize => candidate > incumbent,
        }
    }
}

/// How trial winners enter the population.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Replacement {
    /// A winning trial overwrites its slot at once; later slots in the same
    /// generation draw parents from the updated population.
    #[default]
    SteadyState,
    /// Parents are drawn from a snapshot taken when the generation starts.
    Generational,
}

/// Configuration for per-zone signal placement.
///
/// # Examples
///
/// ```
/// use u_signals::de::DeConfig;
///
/// let config = DeConfig::default()
///     .with_population_size(20)
///     .with_generations(100)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.min_signals, 5);
/// assert_eq!(config.max_signals, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeConfig {
    /// Plans per zone.
    pub population_size: usize,
    /// Selection passes per zone.
    pub generations: usize,
    /// Fewest signals in a plan.
    pub min_signals: usize,
    /// Most signals in a plan.
    pub max_signals: usize,
    /// Scale of the difference vector `b - c`.
    pub differential_weight: f64,
    /// Probability of each of the shrink and grow draws.
    pub mutation_rate: f64,
    /// Weight of the per-signal cost.
    pub signal_penalty_weight: f64,
    /// Apply the coordinated-arterial discount.
    pub synchronization: bool,
    /// Number of zones the network is split into.
    pub zone_count: usize,
    /// Population update policy.
    pub replacement: Replacement,
    /// Optimization direction.
    pub objective: Objective,
    /// Base RNG seed; a random one is drawn (and logged) when absent.
    pub seed: Option<u64>,
    /// Fitness constants.
    pub fitness: FitnessParams,
}

impl Default for DeConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 500,
            min_signals: 5,
            max_signals: 10,
            differential_weight: 0.5,
            mutation_rate: 0.5,
            signal_penalty_weight: 1.0,
            synchronization: true,
            zone_count: 3,
            replacement: Replacement::SteadyState,
            objective: Objective::Minimize,
            seed: None,
            fitness: FitnessParams::default(),
        }
    }
}

impl DeConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the generation budget.
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Sets the signal count bounds.
    pub fn with_signal_bounds(mut self, min: usize, max: usize) -> Self {
        self.min_signals = min;
        self.max_signals = max;
        self
    }

    /// Sets the differential weight.
    pub fn with_differential_weight(mut self, weight: f64) -> Self {
        self.differential_weight = weight;
        self
    }

    /// Sets the grow/shrink draw probability.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the per-signal cost weight.
    pub fn with_signal_penalty_weight(mut self, weight: f64) -> Self {
        self.signal_penalty_weight = weight;
        self
    }

    /// Enables or disables the synchronization discount.
    pub fn with_synchronization(mut self, enabled: bool) -> Self {
        self.synchronization = enabled;
        self
    }

    /// Sets the number of zones.
    pub fn with_zone_count(mut self, zones: usize) -> Self {
        self.zone_count = zones;
        self
    }

    /// Sets the replacement policy.
    pub fn with_replacement(mut self, replacement: Replacement) -> Self {
        self.replacement = replacement;
        self
    }

    /// Sets the optimization direction.
    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }

    /// Fixes the base RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replaces the fitness constants.
    pub fn with_fitness(mut self, fitness: FitnessParams) -> Self {
        self.fitness = fitness;
        self
    }

    /// Checks that the configuration can drive a run.
    ///
    /// Each trial needs three parents other than the slot it competes for,
    /// so the population must hold at least four plans.
    pub fn validate(&self) -> Result<(), Error> {
        let invalid = |msg: String| Err(Error::InvalidConfig(msg));
        if self.population_size < 4 {
            return invalid(format!(
                "population_size must be at least 4, got {}",
                self.population_size
            ));
        }
        if self.zone_count == 0 {
            return invalid("zone_count must be positive".into());
        }
        if self.min_signals == 0 {
            return invalid("min_signals must be positive".into());
        }
        if self.min_signals > self.max_signals {
            return invalid(format!(
                "min_signals ({}) exceeds max_signals ({})",
                self.min_signals, self.max_signals
            ));
        }
        if !self.differential_weight.is_finite() || !self.signal_penalty_weight.is_finite() {
            return invalid("weights must be finite".into());
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return invalid(format!(
                "mutation_rate must lie in [0, 1], got {}",
                self.mutation_rate
            ));
        }
        Ok(())
    }
}
