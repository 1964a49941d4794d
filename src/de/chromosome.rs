//! Variable-length signal plan chromosome.

use std::collections::HashSet;

use u_metaheur::ga::Individual;

/// An ordered set of signal locations, as local zone indices.
///
/// The order is the traversal order the fitness function walks. The
/// fitness value is cached: a plan is built from its final genes and never
/// edited afterwards, so a cached value cannot go stale.
///
/// # Examples
///
/// ```
/// use u_signals::de::SignalPlan;
/// use u_metaheur::ga::Individual;
///
/// let plan = SignalPlan::new(vec![4, 0, 7]);
/// assert_eq!(plan.signals(), &[4, 0, 7]);
/// assert!(!plan.is_evaluated());
/// assert_eq!(plan.fitness(), f64::INFINITY);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SignalPlan {
    signals: Vec<usize>,
    fitness: Option<f64>,
}

impl SignalPlan {
    /// Creates an unevaluated plan.
    pub fn new(signals: Vec<usize>) -> Self {
        Self {
            signals,
            fitness: None,
        }
    }

    /// Creates a plan whose fitness is already known.
    pub fn with_fitness(signals: Vec<usize>, fitness: f64) -> Self {
        Self {
            signals,
            fitness: Some(fitness),
        }
    }

    /// Signal locations in traversal order.
    pub fn signals(&self) -> &[usize] {
        &self.signals
    }

    /// Consumes the plan, returning its signal locations.
    pub fn into_signals(self) -> Vec<usize> {
        self.signals
    }

    /// Number of signals.
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    /// Returns `true` if the plan places no signal.
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Returns `true` once a fitness value has been recorded.
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Returns `true` if no location repeats.
    pub fn has_unique_signals(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.signals.len());
        self.signals.iter().all(|s| seen.insert(*s))
    }
}

impl Individual for SignalPlan {
    type Fitness = f64;

    fn fitness(&self) -> f64 {
        self.fitness.unwrap_or(f64::INFINITY)
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }
}
