//! `gt-sim`: tick orchestrator for the globe_transit engine.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Fleets    : per class (train, boat, plane): step every vehicle;
//!                  leg boundaries release/claim segments, detour, or wait.
//!   ② Spawners  : each running spawner fires on its interval; while the
//!                  globe is visible and the class is under its cap, plan an
//!                  itinerary and launch one vehicle.
//!   ③ Orbits    : advance every satellite.
//!   ④ Observe   : deliver events, tick stats, and periodic snapshots.
//! ```
//!
//! Each class owns its route graph, reservation table, fleet and spawner
//! ([`ClassRuntime`]).  Vehicle IDs come from one counter shared by all
//! classes and are never reused.
//!
//! # Cargo features
//!
//! | Feature   | Effect                                        |
//! |-----------|-----------------------------------------------|
//! | `fx-hash` | FxHash for the per-class reservation tables.  |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use gt_core::{SimConfig, TransportConfig, VehicleClass};
//! use gt_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(SimConfig::default(), TransportConfig::default())
//!     .graph(VehicleClass::Train, rail)
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;
pub mod spawner;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, RunTotals, SimObserver, TickStats};
pub use sim::{ClassRuntime, Sim, Visibility};
pub use spawner::{plan_itinerary, Spawner};
