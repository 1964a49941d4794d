//! Road network sources.

use std::collections::HashMap;

use crate::error::Error;

use super::RoadNetwork;

/// Supplies the drivable road network of a named place.
///
/// Fetching from a mapping service is left to implementors; the optimizer
/// only needs a fully loaded [`RoadNetwork`].
pub trait NetworkSource {
    /// Loads the road network for `place`.
    fn load(&self, place: &str) -> Result<RoadNetwork, Error>;
}

/// A [`NetworkSource`] serving pre-built networks by place name.
///
/// # Examples
///
/// ```
/// use u_signals::network::{InMemorySource, NetworkSource, RoadNetwork};
///
/// let source = InMemorySource::new().with_place("Downtown", RoadNetwork::grid(3, 3, 120.0));
/// assert_eq!(source.load("Downtown").unwrap().node_count(), 9);
/// assert!(source.load("Uptown").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    places: HashMap<String, RoadNetwork>,
}

impl InMemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `network` under `place`, replacing any previous entry.
    pub fn with_place(mut self, place: impl Into<String>, network: RoadNetwork) -> Self {
        self.places.insert(place.into(), network);
        self
    }

    /// Number of registered places.
    pub fn len(&self) -> usize {
        self.places.len()
    }

    /// Returns `true` if no place is registered.
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

impl NetworkSource for InMemorySource {
    fn load(&self, place: &str) -> Result<RoadNetwork, Error> {
        self.places
            .get(place)
            .cloned()
            .ok_or_else(|| Error::UnknownPlace(place.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_place() {
        let source = InMemorySource::new();
        assert!(source.is_empty());
        assert_eq!(
            source.load("Nowhere").unwrap_err(),
            Error::UnknownPlace("Nowhere".into())
        );
    }

    #[test]
    fn test_load_returns_copy() {
        let source = InMemorySource::new().with_place("A", RoadNetwork::grid(2, 2, 10.0));
        let mut net = source.load("A").expect("registered");
        net.add_intersection(100, 0.0, 0.0);
        assert_eq!(source.load("A").expect("registered").node_count(), 4);
        assert_eq!(source.len(), 1);
    }
}
