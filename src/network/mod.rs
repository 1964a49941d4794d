//! Road network model and its collaborators.
//!
//! - [`RoadNetwork`] — Directed graph of intersections with length/traffic weighted roads
//! - [`TrafficLabeler`] — Rule-based simulated traffic (peak / off-peak)
//! - [`NetworkSource`] — Where networks come from; [`InMemorySource`] serves pre-built ones

mod graph;
mod source;
mod traffic;

pub use graph::{Intersection, NetworkData, NodeId, Road, RoadNetwork, RoadSegment};
pub use source::{InMemorySource, NetworkSource};
pub use traffic::{RoadTier, TrafficLabeler};
