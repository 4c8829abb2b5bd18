//! `gt-orbit`: satellites circling the globe.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`plane`]     | `OrbitPlane` basis, `min_safe_radius`                     |
//! | [`satellite`] | `Satellite`, `SatelliteKind`, `SatelliteSpec`, poses      |
//! | [`engine`]    | `OrbitEngine` population + tick, `SpeedModifier`          |
//! | [`error`]     | `OrbitError`, `OrbitResult<T>`                            |
//!
//! Orbits are circular.  Each tick advances `angle` by the satellite's
//! effective speed modulo 2π; nothing else about a satellite changes after
//! creation.  The engine runs independently of the route vehicles.

pub mod engine;
pub mod error;
pub mod plane;
pub mod satellite;

#[cfg(test)]
mod tests;

pub use engine::{OrbitEngine, SpeedModifier};
pub use error::{OrbitError, OrbitResult};
pub use plane::{min_safe_radius, OrbitPlane};
pub use satellite::{Satellite, SatelliteKind, SatellitePose, SatelliteSpec};
