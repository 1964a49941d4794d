//! Per-zone evolution loop: initialize, evolve, extract.

use rand::Rng;
use tracing::{debug, instrument};

use super::chromosome::SignalPlan;
use crate::error::Error;
use super::config::DeConfig;
use super::population::Population;
use super::problem::SignalProblem;

/// Best fitness is logged every this many generations.
const LOG_EVERY: usize = 50;

/// Outcome of one zone's run.
#[derive(Debug, Clone)]
pub struct DeResult {
    /// Best plan of the final population (local indices).
    pub best: SignalPlan,
    /// Its fitness.
    pub best_fitness: f64,
    /// Generations executed.
    pub generations: usize,
    /// Slots replaced over the whole run.
    pub replacements: usize,
    /// Best fitness after each generation.
    pub history: Vec<f64>,
}

/// Runs differential evolution on a [`SignalProblem`].
///
/// # Examples
///
/// ```
/// use u_signals::network::RoadNetwork;
/// use u_signals::zone::ZoneData;
/// use u_signals::de::{DeConfig, DeRunner, SignalProblem};
///
/// let network = RoadNetwork::grid(4, 5, 120.0);
/// let nodes: Vec<u64> = network.nodes().collect();
/// let zone = ZoneData::prepare(&network, &nodes);
/// let config = DeConfig::default().with_population_size(10).with_generations(20);
/// let problem = SignalProblem::new(&network, &zone, &config);
///
/// let mut rng = u_numflow::random::create_rng(42);
/// let result = DeRunner::run(&problem, &config, &mut rng).unwrap();
/// assert!((5..=10).contains(&result.best.len()));
/// assert_eq!(result.history.len(), 20);
/// ```
pub struct DeRunner;

impl DeRunner {
    /// Creates a population, evolves it for `config.generations` selection
    /// passes and returns its best plan.
    ///
    /// Ties between equally fit plans go to the lowest population slot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `config` fails
    /// [`DeConfig::validate`].
    #[instrument(skip_all, fields(pool = problem.pool_size(), generations = config.generations))]
    pub fn run<R: Rng>(
        problem: &SignalProblem<'_>,
        config: &DeConfig,
        rng: &mut R,
    ) -> Result<DeResult, Error> {
        config.validate()?;
        let pool_size = problem.pool_size();
        let score = |signals: &[usize]| problem.evaluate(signals);

        let mut population = Population::random(pool_size, config, rng);

        let mut history = Vec::with_capacity(config.generations);
        let mut replacements = 0;
        for generation in 0..config.generations {
            replacements += population.select_generation(pool_size, config, &score, rng);
            let best = population
                .best(config.objective, &score)
                .map_or(f64::INFINITY, |(_, fitness)| fitness);
            history.push(best);
            if generation % LOG_EVERY == 0 {
                debug!(generation, best_fitness = best, replacements, "generation complete");
            }
        }

        let (best, best_fitness) = match population.best(config.objective, &score) {
            Some((slot, fitness)) => (population.into_plan(slot), fitness),
            None => (SignalPlan::new(Vec::new()), f64::INFINITY),
        };

        Ok(DeResult {
            best,
            best_fitness,
            generations: config.generations,
            replacements,
            history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::de::Objective;
    use crate::network::{RoadNetwork, TrafficLabeler};
    use crate::zone::ZoneData;
    use u_numflow::random::create_rng;

    fn setup() -> (RoadNetwork, ZoneData) {
        let mut network = RoadNetwork::grid(5, 6, 90.0);
        TrafficLabeler::new(true).label(&mut network, &mut create_rng(1));
        let nodes: Vec<u64> = network.nodes().collect();
        let zone = ZoneData::prepare(&network, &nodes);
        (network, zone)
    }

    #[test]
    fn test_run_returns_valid_plan() {
        let (network, zone) = setup();
        let config = DeConfig::default().with_population_size(12).with_generations(30);
        let problem = SignalProblem::new(&network, &zone, &config);
        let result = DeRunner::run(&problem, &config, &mut create_rng(5)).expect("valid");

        assert!((5..=10).contains(&result.best.len()));
        assert!(result.best.has_unique_signals());
        assert!(result.best.signals().iter().all(|&s| s < zone.pool_size()));
        assert_eq!(result.best_fitness, problem.evaluate(result.best.signals()));
        assert_eq!(result.generations, 30);
    }

    #[test]
    fn test_history_is_monotone() {
        let (network, zone) = setup();
        let config = DeConfig::default().with_population_size(10).with_generations(40);
        let problem = SignalProblem::new(&network, &zone, &config);
        let result = DeRunner::run(&problem, &config, &mut create_rng(8)).expect("valid");
        for pair in result.history.windows(2) {
            assert!(pair[1] <= pair[0]);
        }
        assert_eq!(result.history.last().copied(), Some(result.best_fitness));
    }

    #[test]
    fn test_maximize_history_is_monotone() {
        let (network, zone) = setup();
        let config = DeConfig::default()
            .with_population_size(10)
            .with_generations(20)
            .with_objective(Objective::Maximize);
        let problem = SignalProblem::new(&network, &zone, &config);
        let result = DeRunner::run(&problem, &config, &mut create_rng(8)).expect("valid");
        for pair in result.history.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
    }

    #[test]
    fn test_same_seed_same_result() {
        let (network, zone) = setup();
        let config = DeConfig::default().with_population_size(10).with_generations(15);
        let problem = SignalProblem::new(&network, &zone, &config);
        let a = DeRunner::run(&problem, &config, &mut create_rng(99)).expect("valid");
        let b = DeRunner::run(&problem, &config, &mut create_rng(99)).expect("valid");
        assert_eq!(a.best, b.best);
        assert_eq!(a.history, b.history);
    }

    #[test]
    fn test_tiny_population_rejected() {
        let (network, zone) = setup();
        let config = DeConfig::default().with_population_size(3).with_generations(2);
        let problem = SignalProblem::new(&network, &zone, &config);
        let err = DeRunner::run(&problem, &config, &mut create_rng(1)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_zero_generations_extracts_initial_best() {
        let (network, zone) = setup();
        let config = DeConfig::default().with_population_size(6).with_generations(0);
        let problem = SignalProblem::new(&network, &zone, &config);
        let result = DeRunner::run(&problem, &config, &mut create_rng(2)).expect("valid");
        assert!(result.history.is_empty());
        assert_eq!(result.replacements, 0);
        assert!(result.best_fitness.is_finite());
    }
}
