//! Per-vehicle lifecycle state.

use gt_core::Tick;

use crate::reservation::SegmentKey;

/// Where a vehicle is in its lifecycle.
///
/// ```text
/// Spawned ─► EnRoute ─► (boundary) ─┬─► Transitioning ─► EnRoute ─► …
///                                   ├─► Waiting ─► Transitioning
///                                   ├─► Landed ─► Completed        (planes)
///                                   └─► Completed
/// ```
///
/// `Completed` vehicles are removed at the end of the tick they complete in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleState {
    /// Created this tick; not rendered, not advanced.
    Spawned,
    /// Moving along the current leg.
    EnRoute,
    /// Just switched legs; cleared once clear of both ends of the new leg.
    Transitioning,
    /// Parked at the end of the current leg until `blocked` frees up.
    Waiting { blocked: SegmentKey, since: Tick },
    /// Plane on the ground at its destination.
    Landed { remaining: u32 },
    /// Done; removed at the end of the tick.
    Completed,
}

impl VehicleState {
    #[inline]
    pub fn is_moving(self) -> bool {
        matches!(self, Self::EnRoute | Self::Transitioning)
    }

    #[inline]
    pub fn is_waiting(self) -> bool {
        matches!(self, Self::Waiting { .. })
    }

    #[inline]
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// `true` for states that have a pose on screen.
    #[inline]
    pub fn is_rendered(self) -> bool {
        !matches!(self, Self::Spawned | Self::Completed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Spawned       => "spawned",
            Self::EnRoute       => "en_route",
            Self::Transitioning => "transitioning",
            Self::Waiting { .. } => "waiting",
            Self::Landed { .. } => "landed",
            Self::Completed     => "completed",
        }
    }
}

impl std::fmt::Display for VehicleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
