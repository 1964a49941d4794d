//! Signal placement problem for one zone.

use crate::evaluation::SignalEvaluator;
use crate::network::{NodeId, RoadNetwork};
use crate::zone::ZoneData;

use super::config::DeConfig;

/// One zone's search problem: its local index space plus the evaluator
/// that scores plans against the full road network.
///
/// # Examples
///
/// ```
/// use u_signals::network::RoadNetwork;
/// use u_signals::zone::ZoneData;
/// use u_signals::de::{DeConfig, SignalProblem};
///
/// let network = RoadNetwork::grid(3, 3, 150.0);
/// let zone = ZoneData::prepare(&network, &[0, 1, 2, 3, 4, 5]);
/// let problem = SignalProblem::new(&network, &zone, &DeConfig::default());
/// assert_eq!(problem.pool_size(), 6);
/// assert_eq!(problem.node_ids(&[5, 0]), vec![5, 0]);
/// ```
#[derive(Debug)]
pub struct SignalProblem<'a> {
    zone: &'a ZoneData,
    evaluator: SignalEvaluator<'a>,
}

impl<'a> SignalProblem<'a> {
    /// Builds the problem for `zone`, with fitness settings from `config`.
    pub fn new(network: &'a RoadNetwork, zone: &'a ZoneData, config: &DeConfig) -> Self {
        let evaluator = SignalEvaluator::new(network, zone.traffic())
            .with_signal_penalty_weight(config.signal_penalty_weight)
            .with_synchronization(config.synchronization)
            .with_params(config.fitness);
        Self { zone, evaluator }
    }

    /// Number of candidate locations.
    pub fn pool_size(&self) -> usize {
        self.zone.pool_size()
    }

    /// The zone being optimized.
    pub fn zone(&self) -> &ZoneData {
        self.zone
    }

    /// Translates local indices to node ids.
    pub fn node_ids(&self, signals: &[usize]) -> Vec<NodeId> {
        self.zone.to_node_ids(signals)
    }

    /// Fitness of a plan given as local indices.
    pub fn evaluate(&self, signals: &[usize]) -> f64 {
        self.evaluator.evaluate(&self.node_ids(signals))
    }
}
