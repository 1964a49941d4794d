//! Multi-zone driver: partition a network and optimize every zone.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::de::{DeConfig, DeRunner, SignalProblem};
use crate::error::Error;
use crate::network::{NetworkSource, NodeId, RoadNetwork, TrafficLabeler};
use crate::zone::{partition, ZoneData};

/// Best signal placement found for one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneResult {
    /// Zone index in partition order.
    pub zone: usize,
    /// Fitness of the placement.
    pub fitness: f64,
    /// Signal locations as node ids, in traversal order.
    pub signals: Vec<NodeId>,
    /// Number of signals placed.
    pub signal_count: usize,
}

/// RNG seed of zone `zone` for a run with base seed `base`.
///
/// Zone seeds depend only on the zone index, so sequential and parallel
/// runs draw identical streams. The offset starts at one because `base`
/// itself seeds the traffic labeler.
pub fn zone_seed(base: u64, zone: usize) -> u64 {
    base.wrapping_add(zone as u64 + 1)
}

/// Splits a road network into zones and places signals in each one.
///
/// # Examples
///
/// ```
/// use u_signals::network::RoadNetwork;
/// use u_signals::de::DeConfig;
/// use u_signals::ZoneOptimizer;
///
/// let network = RoadNetwork::grid(6, 6, 110.0);
/// let config = DeConfig::default()
///     .with_zone_count(2)
///     .with_population_size(8)
///     .with_generations(10)
///     .with_seed(42);
///
/// let results = ZoneOptimizer::new(config).run(&network).unwrap();
/// assert_eq!(results.len(), 2);
/// assert!(results.iter().all(|r| r.signal_count == r.signals.len()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ZoneOptimizer {
    config: DeConfig,
}

impl ZoneOptimizer {
    /// Creates an optimizer.
    pub fn new(config: DeConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &DeConfig {
        &self.config
    }

    /// Partitions `network` and optimizes each zone independently.
    ///
    /// Results come back in zone order. Every zone is checked for size
    /// before any evolution starts.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfig`] if the configuration fails validation
    /// - [`Error::ZoneTooSmall`] if a zone has fewer intersections than
    ///   `min_signals`
    pub fn run(&self, network: &RoadNetwork) -> Result<Vec<ZoneResult>, Error> {
        self.config.validate()?;
        let nodes: Vec<NodeId> = network.nodes().collect();
        let zones: Vec<ZoneData> = partition(&nodes, self.config.zone_count)?
            .iter()
            .map(|zone| ZoneData::prepare(network, zone))
            .collect();

        for (i, zone) in zones.iter().enumerate() {
            if zone.pool_size() < self.config.min_signals {
                return Err(Error::ZoneTooSmall {
                    zone: i,
                    pool_size: zone.pool_size(),
                    required: self.config.min_signals,
                });
            }
        }

        let seed = self.config.seed.unwrap_or_else(rand::random);
        info!(
            seed,
            zones = zones.len(),
            nodes = nodes.len(),
            "optimizing signal placement"
        );

        #[cfg(feature = "parallel")]
        let results = zones
            .par_iter()
            .enumerate()
            .map(|(i, zone)| self.optimize_zone(network, i, zone, zone_seed(seed, i)))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let results = zones
            .iter()
            .enumerate()
            .map(|(i, zone)| self.optimize_zone(network, i, zone, zone_seed(seed, i)))
            .collect();

        results
    }

    /// Optimizes one prepared zone with its own seeded RNG.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the configuration fails
    /// validation.
    pub fn optimize_zone(
        &self,
        network: &RoadNetwork,
        index: usize,
        zone: &ZoneData,
        seed: u64,
    ) -> Result<ZoneResult, Error> {
        info!(zone = index, intersections = zone.pool_size(), "optimizing zone");
        let problem = SignalProblem::new(network, zone, &self.config);
        let mut rng = u_numflow::random::create_rng(seed);
        let outcome = DeRunner::run(&problem, &self.config, &mut rng)?;

        let signals = problem.node_ids(outcome.best.signals());
        info!(
            zone = index,
            fitness = outcome.best_fitness,
            signal_count = signals.len(),
            ?signals,
            "zone optimized"
        );
        Ok(ZoneResult {
            zone: index,
            fitness: outcome.best_fitness,
            signal_count: signals.len(),
            signals,
        })
    }
}

/// Loads the network of `place`, assigns simulated traffic, and optimizes
/// every zone.
///
/// The labeler and every zone draw from RNGs derived from one base seed
/// (`config.seed`, or a random one), so a fixed seed reproduces the whole
/// run. Returns the labeled network alongside the results.
pub fn optimize_region<S: NetworkSource + ?Sized>(
    source: &S,
    place: &str,
    peak_hour: bool,
    config: DeConfig,
) -> Result<(RoadNetwork, Vec<ZoneResult>), Error> {
    config.validate()?;
    let mut network = source.load(place)?;
    let seed = config.seed.unwrap_or_else(rand::random);
    info!(place, peak_hour, seed, "loaded road network");

    TrafficLabeler::new(peak_hour).label(&mut network, &mut u_numflow::random::create_rng(seed));
    let results = ZoneOptimizer::new(config.with_seed(seed)).run(&network)?;
    Ok((network, results))
}
