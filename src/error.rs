//! Error types for signal placement.

use crate::network::NodeId;

/// Errors raised while building networks, validating configuration, or
/// preparing zones.
///
/// Unreachable node pairs during fitness evaluation are *not* errors: the
/// evaluator turns them into a penalty. [`Error::NoPath`] only surfaces from
/// direct calls to [`RoadNetwork::shortest_path_length`](crate::network::RoadNetwork::shortest_path_length).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// No route connects the two intersections.
    #[error("no path from {from} to {to}")]
    NoPath {
        /// Source intersection.
        from: NodeId,
        /// Target intersection.
        to: NodeId,
    },

    /// A road references an intersection that is not in the network.
    #[error("unknown intersection: {0}")]
    UnknownNode(NodeId),

    /// A road has a negative or non-finite length.
    #[error("invalid road {from}->{to}: length {length}")]
    InvalidRoad {
        /// Source intersection.
        from: NodeId,
        /// Target intersection.
        to: NodeId,
        /// Rejected length.
        length: f64,
    },

    /// A network source has nothing registered under the requested place.
    #[error("unknown place: {0}")]
    UnknownPlace(String),

    /// Optimizer configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A zone holds fewer intersections than a signal plan needs.
    #[error("zone {zone} has {pool_size} intersections, at least {required} required")]
    ZoneTooSmall {
        /// Zone index.
        zone: usize,
        /// Intersections available in the zone.
        pool_size: usize,
        /// Minimum signals per plan.
        required: usize,
    },
}
