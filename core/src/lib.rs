//! Simulation core for the Drishti railway-safety platform.
//!
//! The modules cover the client-side detection pipeline: a static sensor
//! registry and anomaly catalog, a mock analysis service that fabricates
//! alerts and detections, a persisted simulation store with a sync outbox,
//! and an independent notification store wired to it by a single callback.

pub mod analysis;
pub mod catalog;
pub mod config;
pub mod model;
pub mod notify;
pub mod prelude;
pub mod registry;
pub mod store;
pub mod telemetry;

pub use config::SimulationConfig;
pub use prelude::{LatLng, SimError, SimResult};
