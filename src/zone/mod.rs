//! Zone partitioning and per-zone data preparation.
//!
//! - [`partition`] — Split the network's nodes into disjoint zones
//! - [`ZoneData`] — A zone's local index space and inner-road traffic
//! - [`TrafficTable`] — Directed traffic lookup with reverse fallback

mod data;
mod partition;

pub use data::{TrafficTable, ZoneData};
pub use partition::partition;
