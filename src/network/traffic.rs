//! Rule-based simulated traffic.
//!
//! Roads are tiered by the parity and divisibility of their endpoint ids,
//! and each tier samples an integer traffic level from its own range:
//!
//! | Tier | Rule | Off-peak | Peak |
//! |------|------|----------|------|
//! | Arterial | both endpoints even | 40..=70 | 70..=100 |
//! | Secondary | either endpoint divisible by 5 | 20..=50 | 50..=80 |
//! | Local | otherwise | 10..=30 | 30..=60 |

use rand::Rng;

use super::{NodeId, RoadNetwork};

/// Road classification used by [`TrafficLabeler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoadTier {
    /// Main avenue.
    Arterial,
    /// Connector street.
    Secondary,
    /// Residential street.
    Local,
}

impl RoadTier {
    /// Classifies the road `from -> to`.
    pub fn classify(from: NodeId, to: NodeId) -> Self {
        if from % 2 == 0 && to % 2 == 0 {
            RoadTier::Arterial
        } else if from % 5 == 0 || to % 5 == 0 {
            RoadTier::Secondary
        } else {
            RoadTier::Local
        }
    }

    /// Inclusive traffic range for this tier.
    pub fn traffic_range(self, peak_hour: bool) -> (u32, u32) {
        match (self, peak_hour) {
            (RoadTier::Arterial, true) => (70, 100),
            (RoadTier::Arterial, false) => (40, 70),
            (RoadTier::Secondary, true) => (50, 80),
            (RoadTier::Secondary, false) => (20, 50),
            (RoadTier::Local, true) => (30, 60),
            (RoadTier::Local, false) => (10, 30),
        }
    }
}

/// Assigns simulated traffic to every road of a network.
///
/// # Examples
///
/// ```
/// use u_signals::network::{RoadNetwork, TrafficLabeler};
///
/// let mut net = RoadNetwork::grid(2, 2, 100.0);
/// let mut rng = u_numflow::random::create_rng(7);
/// TrafficLabeler::new(true).label(&mut net, &mut rng);
/// assert!(net.edges().all(|(_, _, seg)| seg.traffic >= 30.0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TrafficLabeler {
    peak_hour: bool,
}

impl TrafficLabeler {
    /// Creates a labeler for peak (`true`) or off-peak traffic.
    pub fn new(peak_hour: bool) -> Self {
        Self { peak_hour }
    }

    /// Whether peak-hour ranges are used.
    pub fn peak_hour(&self) -> bool {
        self.peak_hour
    }

    /// Samples a traffic level for the road `from -> to`.
    pub fn sample<R: Rng>(&self, from: NodeId, to: NodeId, rng: &mut R) -> f64 {
        let (lo, hi) = RoadTier::classify(from, to).traffic_range(self.peak_hour);
        rng.random_range(lo..=hi) as f64
    }

    /// Overwrites the traffic of every road in `network`.
    pub fn label<R: Rng>(&self, network: &mut RoadNetwork, rng: &mut R) {
        network.assign_traffic(|from, to| self.sample(from, to, rng));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(RoadTier::classify(2, 4), RoadTier::Arterial);
        assert_eq!(RoadTier::classify(10, 20), RoadTier::Arterial);
        assert_eq!(RoadTier::classify(5, 7), RoadTier::Secondary);
        assert_eq!(RoadTier::classify(2, 15), RoadTier::Secondary);
        assert_eq!(RoadTier::classify(1, 3), RoadTier::Local);
        assert_eq!(RoadTier::classify(2, 3), RoadTier::Local);
    }

    #[test]
    fn test_labels_within_tier_range() {
        let mut net = RoadNetwork::grid(4, 4, 50.0);
        let mut rng = u_numflow::random::create_rng(42);
        for peak in [false, true] {
            TrafficLabeler::new(peak).label(&mut net, &mut rng);
            for (from, to, seg) in net.edges() {
                let (lo, hi) = RoadTier::classify(from, to).traffic_range(peak);
                assert!(seg.traffic >= lo as f64 && seg.traffic <= hi as f64);
                assert_eq!(seg.traffic.fract(), 0.0);
            }
        }
    }

    #[test]
    fn test_same_seed_same_labels() {
        let mut a = RoadNetwork::grid(3, 3, 50.0);
        let mut b = a.clone();
        TrafficLabeler::new(false).label(&mut a, &mut u_numflow::random::create_rng(9));
        TrafficLabeler::new(false).label(&mut b, &mut u_numflow::random::create_rng(9));
        assert_eq!(a.to_data(), b.to_data());
    }
}
