//! Spatial-subsystem error type.

use thiserror::Error;

/// Errors produced while building route graphs.
///
/// Planning never errors: an exhausted search is an ordinary `None`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("unknown location {0:?}")]
    UnknownLocation(String),

    #[error("route from {0:?} to itself")]
    SelfLoop(String),

    #[error("no curve geometry between {from:?} and {to:?}")]
    NoCurve { from: String, to: String },
}

pub type SpatialResult<T> = Result<T, SpatialError>;
