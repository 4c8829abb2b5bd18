//! `gt-core`: foundational types for the `globe_transit` simulation engine.
//!
//! This crate is a dependency of every other `gt-*` crate.  It intentionally
//! has no `gt-*` dependencies and minimal external ones (`rand`, `glam` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`ids`]         | `VehicleId`, `LocationId`, `EdgeId`, `SatelliteId`         |
//! | [`geo`]         | `GeoPoint`, haversine distance, globe projection           |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`                            |
//! | [`rng`]         | `VehicleRng` (per-vehicle), `SimRng` (global)              |
//! | [`transport`]   | `VehicleClass` enum                                        |
//! | [`config`]      | `TransportConfig` and the per-class tunables               |
//! | [`error`]       | `GtError`, `GtResult`                                      |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required to load `TransportConfig` from JSON.              |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;
pub mod transport;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    ClassConfig, OrbitConfig, PlaneConfig, PoseBounds, SpeedBand, TrainConfig, TransportConfig,
    WagonBand,
};
pub use error::{GtError, GtResult};
pub use geo::GeoPoint;
pub use ids::{EdgeId, LocationId, SatelliteId, VehicleId};
pub use rng::{SimRng, VehicleRng};
pub use time::{SimClock, SimConfig, Tick};
pub use transport::VehicleClass;
