//! Train wagons.
//!
//! Wagons trail the locomotive at a fixed arc-length spacing, converted to
//! progress units by dividing by the leg length.  A wagon that would sit
//! before the start of the leg is hidden rather than wrapped onto the
//! previous leg.

use gt_core::PoseBounds;
use gt_spatial::RouteEdge;

use crate::pose::{sample_edge, Pose};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainState {
    pub wagons: u8,
}

/// Wagon spacing in progress units on a leg of `length` world units.
#[inline]
pub fn spacing_progress(spacing: f32, length: f32) -> f32 {
    if length.is_finite() && length > f32::EPSILON { spacing / length } else { 0.0 }
}

/// Progress of wagon `index` (1-based) behind a locomotive at `lead`.
#[inline]
pub fn wagon_progress(lead: f32, spacing_progress: f32, index: u8) -> f32 {
    (lead - spacing_progress * index as f32).max(0.0)
}

/// One entry per wagon, `None` where the wagon is hidden this tick.
pub fn wagon_poses(
    edge:    &RouteEdge,
    lead:    f32,
    wagons:  u8,
    spacing: f32,
    bounds:  &PoseBounds,
) -> Vec<Option<Pose>> {
    let step = spacing_progress(spacing, edge.distance);
    (1..=wagons)
        .map(|i| {
            let p = wagon_progress(lead, step, i);
            if p > 0.0 && p <= 1.0 { sample_edge(edge, p, bounds) } else { None }
        })
        .collect()
}
