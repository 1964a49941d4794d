//! Directed road network backed by a petgraph [`DiGraph`].

use std::collections::HashMap;

use petgraph::algo::{dijkstra, has_path_connecting};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Opaque intersection identifier, stable for the lifetime of a run.
pub type NodeId = u64;

/// An intersection (graph node) with planar coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    /// Identifier.
    pub id: NodeId,
    /// X-coordinate (longitude or easting).
    pub x: f64,
    /// Y-coordinate (latitude or northing).
    pub y: f64,
}

/// Attributes of a directed road segment (graph edge).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadSegment {
    /// Physical length in meters.
    pub length: f64,
    /// Congestion weight; `0.0` until a labeler assigns one.
    #[serde(default)]
    pub traffic: f64,
}

/// Serializable road record used by [`NetworkData`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Road {
    /// Source intersection.
    pub from: NodeId,
    /// Target intersection.
    pub to: NodeId,
    /// Physical length in meters.
    pub length: f64,
    /// Congestion weight.
    #[serde(default)]
    pub traffic: f64,
}

/// Plain-data form of a [`RoadNetwork`] for interchange (e.g. JSON).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkData {
    /// Intersections in network order.
    pub intersections: Vec<Intersection>,
    /// Directed roads.
    pub roads: Vec<Road>,
}

/// A drivable road network: intersections joined by directed, length- and
/// traffic-weighted road segments.
///
/// Node iteration order is insertion order; zone partitioning relies on it
/// being fixed for the lifetime of the network.
///
/// # Examples
///
/// ```
/// use u_signals::network::RoadNetwork;
///
/// let mut net = RoadNetwork::new();
/// net.add_intersection(1, 0.0, 0.0);
/// net.add_intersection(2, 80.0, 0.0);
/// net.add_intersection(3, 200.0, 0.0);
/// net.add_road(1, 2, 80.0).unwrap();
/// net.add_road(2, 3, 120.0).unwrap();
///
/// assert_eq!(net.shortest_path_length(1, 3), Ok(200.0));
/// assert!(net.has_path(1, 3));
/// assert!(!net.has_path(3, 1));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    graph: DiGraph<Intersection, RoadSegment>,
    index: HashMap<NodeId, NodeIndex>,
}

impl RoadNetwork {
    /// Creates an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an intersection, or moves it if the id is already present.
    pub fn add_intersection(&mut self, id: NodeId, x: f64, y: f64) -> NodeIndex {
        if let Some(&idx) = self.index.get(&id) {
            self.graph[idx].x = x;
            self.graph[idx].y = y;
            return idx;
        }
        let idx = self.graph.add_node(Intersection { id, x, y });
        self.index.insert(id, idx);
        idx
    }

    /// Adds a directed road segment with zero traffic.
    ///
    /// Returns `None` if either endpoint is unknown or `length` is negative
    /// or non-finite.
    pub fn add_road(&mut self, from: NodeId, to: NodeId, length: f64) -> Option<EdgeIndex> {
        if !length.is_finite() || length < 0.0 {
            return None;
        }
        let a = *self.index.get(&from)?;
        let b = *self.index.get(&to)?;
        Some(self.graph.add_edge(
            a,
            b,
            RoadSegment {
                length,
                traffic: 0.0,
            },
        ))
    }

    /// Builds a network from its plain-data form.
    pub fn from_data(data: &NetworkData) -> Result<Self, Error> {
        let mut net = Self::new();
        for node in &data.intersections {
            net.add_intersection(node.id, node.x, node.y);
        }
        for road in &data.roads {
            for id in [road.from, road.to] {
                if !net.contains(id) {
                    return Err(Error::UnknownNode(id));
                }
            }
            let edge = net
                .add_road(road.from, road.to, road.length)
                .ok_or(Error::InvalidRoad {
                    from: road.from,
                    to: road.to,
                    length: road.length,
                })?;
            net.graph[edge].traffic = road.traffic;
        }
        Ok(net)
    }

    /// Converts the network to its plain-data form.
    pub fn to_data(&self) -> NetworkData {
        NetworkData {
            intersections: self.graph.node_indices().map(|i| self.graph[i]).collect(),
            roads: self
                .edges()
                .map(|(from, to, seg)| Road {
                    from,
                    to,
                    length: seg.length,
                    traffic: seg.traffic,
                })
                .collect(),
        }
    }

    /// Builds a `rows × cols` grid with two-way roads of length `spacing`.
    ///
    /// Intersection ids are `row * cols + col`.
    pub fn grid(rows: usize, cols: usize, spacing: f64) -> Self {
        let mut net = Self::new();
        for r in 0..rows {
            for c in 0..cols {
                let id = (r * cols + c) as NodeId;
                net.add_intersection(id, c as f64 * spacing, r as f64 * spacing);
            }
        }
        let id = |r: usize, c: usize| (r * cols + c) as NodeId;
        for r in 0..rows {
            for c in 0..cols {
                if c + 1 < cols {
                    net.add_road(id(r, c), id(r, c + 1), spacing);
                    net.add_road(id(r, c + 1), id(r, c), spacing);
                }
                if r + 1 < rows {
                    net.add_road(id(r, c), id(r + 1, c), spacing);
                    net.add_road(id(r + 1, c), id(r, c), spacing);
                }
            }
        }
        net
    }

    /// Returns `true` if the intersection exists.
    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Number of intersections.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of directed road segments.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Coordinates of an intersection.
    pub fn position(&self, id: NodeId) -> Option<(f64, f64)> {
        self.index.get(&id).map(|&i| (self.graph[i].x, self.graph[i].y))
    }

    /// Intersection ids in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_indices().map(move |i| self.graph[i].id)
    }

    /// Road segments as `(from, to, attributes)`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, &RoadSegment)> + '_ {
        self.graph.edge_references().map(move |e| {
            (
                self.graph[e.source()].id,
                self.graph[e.target()].id,
                e.weight(),
            )
        })
    }

    /// Reassigns the traffic of every road segment.
    ///
    /// `traffic_of(from, to)` is called once per segment in edge order.
    pub fn assign_traffic<F>(&mut self, mut traffic_of: F)
    where
        F: FnMut(NodeId, NodeId) -> f64,
    {
        for edge in self.graph.edge_indices() {
            if let Some((a, b)) = self.graph.edge_endpoints(edge) {
                let (from, to) = (self.graph[a].id, self.graph[b].id);
                self.graph[edge].traffic = traffic_of(from, to);
            }
        }
    }

    /// Shortest-path length from `from` to `to`, weighted by segment length.
    ///
    /// Fails with [`Error::NoPath`] when `to` is unreachable or either
    /// intersection is unknown.
    pub fn shortest_path_length(&self, from: NodeId, to: NodeId) -> Result<f64, Error> {
        let no_path = Error::NoPath { from, to };
        let (Some(&a), Some(&b)) = (self.index.get(&from), self.index.get(&to)) else {
            return Err(no_path);
        };
        let costs = dijkstra(&self.graph, a, Some(b), |e| e.weight().length);
        costs.get(&b).copied().ok_or(no_path)
    }

    /// Returns `true` if a directed route leads from `from` to `to`.
    pub fn has_path(&self, from: NodeId, to: NodeId) -> bool {
        match (self.index.get(&from), self.index.get(&to)) {
            (Some(&a), Some(&b)) => has_path_connecting(&self.graph, a, b, None),
            _ => false,
        }
    }

    /// Shortest-path lengths from `source` to every reachable intersection.
    ///
    /// Empty if `source` is unknown.
    pub fn distances_from(&self, source: NodeId) -> HashMap<NodeId, f64> {
        let Some(&a) = self.index.get(&source) else {
            return HashMap::new();
        };
        dijkstra(&self.graph, a, None, |e| e.weight().length)
            .into_iter()
            .map(|(idx, d)| (self.graph[idx].id, d))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> RoadNetwork {
        // 10 -> 20 -> 30, one-way
        let mut net = RoadNetwork::new();
        net.add_intersection(10, 0.0, 0.0);
        net.add_intersection(20, 50.0, 0.0);
        net.add_intersection(30, 250.0, 0.0);
        net.add_road(10, 20, 50.0).expect("valid");
        net.add_road(20, 30, 200.0).expect("valid");
        net
    }

    #[test]
    fn test_nodes_keep_insertion_order() {
        let net = line();
        assert_eq!(net.nodes().collect::<Vec<_>>(), vec![10, 20, 30]);
        assert_eq!(net.node_count(), 3);
        assert_eq!(net.edge_count(), 2);
    }

    #[test]
    fn test_add_intersection_twice_moves_it() {
        let mut net = line();
        net.add_intersection(20, 1.0, 2.0);
        assert_eq!(net.node_count(), 3);
        assert_eq!(net.position(20), Some((1.0, 2.0)));
    }

    #[test]
    fn test_add_road_rejects_bad_input() {
        let mut net = line();
        assert!(net.add_road(10, 99, 1.0).is_none());
        assert!(net.add_road(10, 30, -1.0).is_none());
        assert!(net.add_road(10, 30, f64::NAN).is_none());
    }

    #[test]
    fn test_shortest_path_length() {
        let net = line();
        assert_eq!(net.shortest_path_length(10, 30), Ok(250.0));
        assert_eq!(net.shortest_path_length(10, 10), Ok(0.0));
    }

    #[test]
    fn test_shortest_path_directed() {
        let net = line();
        assert_eq!(
            net.shortest_path_length(30, 10),
            Err(Error::NoPath { from: 30, to: 10 })
        );
        assert!(!net.has_path(30, 10));
        assert!(net.has_path(10, 30));
    }

    #[test]
    fn test_unknown_nodes_have_no_path() {
        let net = line();
        assert!(net.shortest_path_length(10, 99).is_err());
        assert!(!net.has_path(99, 10));
        assert!(net.distances_from(99).is_empty());
    }

    #[test]
    fn test_distances_from() {
        let net = line();
        let d = net.distances_from(20);
        assert_eq!(d.get(&20), Some(&0.0));
        assert_eq!(d.get(&30), Some(&200.0));
        assert_eq!(d.get(&10), None);
    }

    #[test]
    fn test_grid_layout() {
        let net = RoadNetwork::grid(3, 4, 100.0);
        assert_eq!(net.node_count(), 12);
        // horizontal: 3 rows * 3 links, vertical: 2 * 4 links, both directions
        assert_eq!(net.edge_count(), 2 * (9 + 8));
        assert_eq!(net.position(5), Some((100.0, 100.0)));
        // Manhattan distance from corner to corner
        assert_eq!(net.shortest_path_length(0, 11), Ok(500.0));
    }

    #[test]
    fn test_assign_traffic() {
        let mut net = line();
        net.assign_traffic(|from, to| (from + to) as f64);
        let traffic: Vec<f64> = net.edges().map(|(_, _, s)| s.traffic).collect();
        assert_eq!(traffic, vec![30.0, 50.0]);
    }

    #[test]
    fn test_data_round_trip_keeps_traffic() {
        let mut net = line();
        net.assign_traffic(|_, _| 42.0);
        let rebuilt = RoadNetwork::from_data(&net.to_data()).expect("valid data");
        assert_eq!(rebuilt.to_data(), net.to_data());
    }

    #[test]
    fn test_from_data_unknown_node() {
        let data = NetworkData {
            intersections: vec![Intersection {
                id: 1,
                x: 0.0,
                y: 0.0,
            }],
            roads: vec![Road {
                from: 1,
                to: 2,
                length: 10.0,
                traffic: 0.0,
            }],
        };
        assert_eq!(
            RoadNetwork::from_data(&data).unwrap_err(),
            Error::UnknownNode(2)
        );
    }
}
