use gt_core::{EdgeId, VehicleClass, VehicleId};
use thiserror::Error;

use crate::reservation::SegmentKey;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("itinerary has no legs")]
    EmptyItinerary,

    #[error("edge {0} is not part of the route graph")]
    UnknownEdge(EdgeId),

    #[error("itinerary breaks between leg {at} and leg {}", at + 1)]
    Disconnected { at: usize },

    #[error("segment {key} is held by {holder}")]
    SegmentHeld { key: SegmentKey, holder: VehicleId },

    #[error("{vehicle} class is not {expected}")]
    ClassMismatch { vehicle: VehicleClass, expected: VehicleClass },
}

pub type MobilityResult<T> = Result<T, MobilityError>;
