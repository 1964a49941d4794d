//! Per-zone optimization inputs: local index space and traffic table.

use std::collections::{HashMap, HashSet};

use crate::network::{NodeId, RoadNetwork};

/// Traffic level per directed road, restricted to one zone.
///
/// # Examples
///
/// ```
/// use u_signals::zone::TrafficTable;
///
/// let mut table = TrafficTable::new();
/// table.insert(1, 2, 40.0);
/// assert_eq!(table.get(2, 1), None);
/// assert_eq!(table.lookup(2, 1), Some(40.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrafficTable {
    entries: HashMap<(NodeId, NodeId), f64>,
}

impl TrafficTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the traffic of road `from -> to`.
    pub fn insert(&mut self, from: NodeId, to: NodeId, traffic: f64) {
        self.entries.insert((from, to), traffic);
    }

    /// Traffic of road `from -> to` only.
    pub fn get(&self, from: NodeId, to: NodeId) -> Option<f64> {
        self.entries.get(&(from, to)).copied()
    }

    /// Traffic of `from -> to`, falling back to `to -> from`.
    pub fn lookup(&self, from: NodeId, to: NodeId) -> Option<f64> {
        self.get(from, to).or_else(|| self.get(to, from))
    }

    /// Number of roads in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no roads.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<((NodeId, NodeId), f64)> for TrafficTable {
    fn from_iter<I: IntoIterator<Item = ((NodeId, NodeId), f64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// The intersections of one zone, addressed by local index, plus the
/// traffic of the roads running inside the zone.
///
/// Signal plans store local indices `0..pool_size()`. Graph queries need
/// node ids; [`ZoneData::to_node_ids`] is the only place the two meet.
#[derive(Debug, Clone, Default)]
pub struct ZoneData {
    intersections: Vec<NodeId>,
    traffic: TrafficTable,
}

impl ZoneData {
    /// Collects the zone's intersections (in network order) and the
    /// traffic of every road whose endpoints both lie in the zone.
    pub fn prepare(network: &RoadNetwork, zone_nodes: &[NodeId]) -> Self {
        let members: HashSet<NodeId> = zone_nodes.iter().copied().collect();
        let intersections = network.nodes().filter(|id| members.contains(id)).collect();
        let traffic = network
            .edges()
            .filter(|(from, to, _)| members.contains(from) && members.contains(to))
            .map(|(from, to, seg)| ((from, to), seg.traffic))
            .collect();
        Self {
            intersections,
            traffic,
        }
    }

    /// Builds zone data from explicit parts.
    pub fn new(intersections: Vec<NodeId>, traffic: TrafficTable) -> Self {
        Self {
            intersections,
            traffic,
        }
    }

    /// Number of candidate signal locations.
    pub fn pool_size(&self) -> usize {
        self.intersections.len()
    }

    /// Intersections in local index order.
    pub fn intersections(&self) -> &[NodeId] {
        &self.intersections
    }

    /// Traffic of roads inside the zone.
    pub fn traffic(&self) -> &TrafficTable {
        &self.traffic
    }

    /// Node id at a local index.
    pub fn node_id(&self, local: usize) -> Option<NodeId> {
        self.intersections.get(local).copied()
    }

    /// Translates local indices to node ids.
    ///
    /// # Panics
    ///
    /// Panics if an index is `>= pool_size()`.
    pub fn to_node_ids(&self, locals: &[usize]) -> Vec<NodeId> {
        locals.iter().map(|&i| self.intersections[i]).collect()
    }
}
