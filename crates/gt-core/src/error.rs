//! Engine-wide error type.
//!
//! Sub-crates define their own error enums and wrap `GtError` as one variant
//! via `From`, so configuration failures surface unchanged at the top.

use thiserror::Error;

use crate::{LocationId, VehicleClass};

/// The top-level error type for `gt-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum GtError {
    #[error("location {0} not found")]
    LocationNotFound(LocationId),

    #[error("unknown location name {0:?}")]
    UnknownLocation(String),

    #[error("{class} configuration error: {reason}")]
    ClassConfig {
        class:  VehicleClass,
        reason: String,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `gt-*` crates.
pub type GtResult<T> = Result<T, GtError>;
