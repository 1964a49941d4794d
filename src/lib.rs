//! # u-signals
//!
//! Traffic signal placement on road networks. The network is split into
//! zones and each zone runs a differential evolution search over
//! variable-length sets of signal locations, scored by simulated traffic
//! and road-distance spacing.
//!
//! ## Modules
//!
//! - [`network`] — Road network graph, simulated traffic, network sources
//! - [`zone`] — Zone partitioning and per-zone data (local index space, traffic table)
//! - [`evaluation`] — Signal plan fitness
//! - [`de`] — Differential evolution: chromosome, operators, population, runner
//! - [`optimizer`] — Multi-zone driver
//!
//! ## Quick start
//!
//! ```
//! use u_signals::network::{InMemorySource, RoadNetwork};
//! use u_signals::de::DeConfig;
//! use u_signals::optimize_region;
//!
//! let source = InMemorySource::new().with_place("Centro", RoadNetwork::grid(6, 5, 120.0));
//! let config = DeConfig::default()
//!     .with_population_size(10)
//!     .with_generations(20)
//!     .with_seed(7);
//!
//! let (_network, zones) = optimize_region(&source, "Centro", true, config).unwrap();
//! for zone in &zones {
//!     println!("zone {}: {} signals at {:?}", zone.zone, zone.signal_count, zone.signals);
//! }
//! ```

pub mod de;
pub mod error;
pub mod evaluation;
#[cfg(feature = "ffi")]
pub mod ffi;
pub mod network;
pub mod optimizer;
pub mod zone;

pub use error::Error;
pub use optimizer::{optimize_region, ZoneOptimizer, ZoneResult};
