//! Signal plan fitness over a traffic table and road graph.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::network::{NodeId, RoadNetwork};
use crate::zone::TrafficTable;

/// Constants of the fitness function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessParams {
    /// Cost of a segment with no traffic data, and of an unreachable pair.
    pub penalty: f64,
    /// Signals closer than this (meters, along the road) cost `penalty / 2`.
    pub min_spacing: f64,
    /// Reward per distinct consecutive pair.
    pub coverage_bonus: f64,
    /// Segment cost multiplier at a coordinated arterial node.
    pub sync_discount: f64,
}

impl Default for FitnessParams {
    fn default() -> Self {
        Self {
            penalty: 100.0,
            min_spacing: 100.0,
            coverage_bonus: 20.0,
            sync_discount: 0.8,
        }
    }
}

/// Returns `true` for nodes on a coordinated arterial (even ids).
pub fn is_coordinated(node: NodeId) -> bool {
    node % 2 == 0
}

/// Scores an ordered sequence of signal locations. Lower is better.
///
/// For each consecutive pair `(a, b)` at position `i`:
///
/// 1. Base cost is the traffic of `a -> b`, else `b -> a`, else `penalty`.
/// 2. With synchronization on, `i > 0` and `a` coordinated, the base cost
///    is scaled by `sync_discount`.
/// 3. For `i > 0`, the road distance from the previous signal to `a` adds
///    `penalty` when unreachable, or `penalty / 2` when below `min_spacing`.
///
/// The total then drops by `coverage_bonus` per distinct pair and rises by
/// `signal_penalty_weight * len / 2`.
///
/// Road distances are memoized per source node, one single-source search
/// each; the graph itself is only read. The cache makes the evaluator
/// `!Sync`: each zone owns its own evaluator.
///
/// # Examples
///
/// ```
/// use u_signals::network::RoadNetwork;
/// use u_signals::zone::TrafficTable;
/// use u_signals::evaluation::SignalEvaluator;
///
/// let network = RoadNetwork::new();
/// let mut traffic = TrafficTable::new();
/// traffic.insert(0, 1, 50.0);
///
/// let evaluator = SignalEvaluator::new(&network, &traffic);
/// // 50 (segment) - 20 (one covered pair) + 1 * 2 / 2 (signal count)
/// assert_eq!(evaluator.evaluate(&[0, 1]), 31.0);
/// ```
#[derive(Debug)]
pub struct SignalEvaluator<'a> {
    network: &'a RoadNetwork,
    traffic: &'a TrafficTable,
    signal_penalty_weight: f64,
    synchronization: bool,
    params: FitnessParams,
    distances: RefCell<HashMap<NodeId, HashMap<NodeId, f64>>>,
}

impl<'a> SignalEvaluator<'a> {
    /// Creates an evaluator with signal penalty weight 1 and no
    /// synchronization.
    pub fn new(network: &'a RoadNetwork, traffic: &'a TrafficTable) -> Self {
        Self {
            network,
            traffic,
            signal_penalty_weight: 1.0,
            synchronization: false,
            params: FitnessParams::default(),
            distances: RefCell::new(HashMap::new()),
        }
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

    /// Replaces the fitness constants.
    pub fn with_params(mut self, params: FitnessParams) -> Self {
        self.params = params;
        self
    }

    /// Fitness constants in use.
    pub fn params(&self) -> &FitnessParams {
        &self.params
    }

    /// Scores a sequence of node ids.
    pub fn evaluate(&self, nodes: &[NodeId]) -> f64 {
        let mut total = 0.0;
        let mut covered = HashSet::new();

        for (i, pair) in nodes.windows(2).enumerate() {
            let (a, b) = (pair[0], pair[1]);
            covered.insert((a, b));

            let mut cost = self.traffic.lookup(a, b).unwrap_or(self.params.penalty);
            if self.synchronization && i > 0 && is_coordinated(a) {
                cost *= self.params.sync_discount;
            }
            if i > 0 {
                cost += self.spacing_penalty(nodes[i - 1], a);
            }
            total += cost;
        }

        total -= self.params.coverage_bonus * covered.len() as f64;
        total + self.signal_penalty_weight * nodes.len() as f64 / 2.0
    }

    /// Extra cost for placing a signal at `to` right after one at `from`.
    fn spacing_penalty(&self, from: NodeId, to: NodeId) -> f64 {
        match self.path_length(from, to) {
            None => self.params.penalty,
            Some(d) if d < self.params.min_spacing => self.params.penalty / 2.0,
            Some(_) => 0.0,
        }
    }

    fn path_length(&self, from: NodeId, to: NodeId) -> Option<f64> {
        let mut cache = self.distances.borrow_mut();
        cache
            .entry(from)
            .or_insert_with(|| self.network.distances_from(from))
            .get(&to)
            .copied()
    }

    /// Number of source nodes whose distances are cached.
    pub fn cached_sources(&self) -> usize {
        self.distances.borrow().len()
    }
}
