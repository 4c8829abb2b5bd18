//! Plane flight profile and banking.
//!
//! Planes fly a single leg.  Altitude follows a smoothstep climb over the
//! first `climb` fraction of the leg, holds at cruise, and mirrors the climb
//! on descent.  Longer legs cruise higher and spend a smaller fraction of
//! the trip climbing.

use glam::{Quat, Vec3};
use gt_core::{PlaneConfig, PoseBounds, VehicleRng};
use gt_spatial::RouteEdge;

use crate::pose::{Frame, Pose};

/// Altitude envelope for one leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightProfile {
    pub cruise_altitude: f32,
    /// Fraction of the leg spent climbing (and, mirrored, descending).
    pub climb: f32,
}

impl FlightProfile {
    pub fn for_distance(distance: f32, cfg: &PlaneConfig) -> Self {
        let ratio = if cfg.reference_distance > 0.0 && distance.is_finite() && distance > 0.0 {
            distance / cfg.reference_distance
        } else {
            1.0
        };
        let cruise_altitude = cfg.cruise_altitude * ratio.clamp(1.0, cfg.max_cruise_factor.max(1.0));
        let climb = (cfg.climb_fraction / ratio).clamp(cfg.min_climb_fraction, cfg.max_climb_fraction);
        Self { cruise_altitude, climb }
    }

    /// Height above the route surface at leg fraction `t`.
    pub fn altitude_at(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if self.climb <= 0.0 {
            return self.cruise_altitude;
        }
        let phase = if t < self.climb {
            t / self.climb
        } else if t > 1.0 - self.climb {
            (1.0 - t) / self.climb
        } else {
            1.0
        };
        self.cruise_altitude * smoothstep(phase)
    }
}

#[inline]
fn smoothstep(x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    x * x * (3.0 - 2.0 * x)
}

/// Per-plane mutable flight state.
#[derive(Debug)]
pub struct PlaneState {
    pub profile:     FlightProfile,
    /// Current roll, radians.
    pub bank:        f32,
    pub bank_target: f32,
    pub rng:         VehicleRng,
}

impl PlaneState {
    pub fn new(profile: FlightProfile, rng: VehicleRng) -> Self {
        Self { profile, bank: 0.0, bank_target: 0.0, rng }
    }

    /// Random-walk the bank target and ease the current bank toward it.
    pub fn update_bank(&mut self, cfg: &PlaneConfig) {
        if cfg.bank_step > 0.0 {
            let delta: f32 = self.rng.gen_range(-cfg.bank_step..=cfg.bank_step);
            self.bank_target = (self.bank_target + delta).clamp(-cfg.max_bank, cfg.max_bank);
        }
        self.bank += (self.bank_target - self.bank) * cfg.bank_smoothing;
    }
}

/// Pose of a plane on `edge` at `progress`.
///
/// A landed plane sits on the surface at the destination with wings level.
pub fn plane_pose(
    edge:     &RouteEdge,
    progress: f32,
    state:    &PlaneState,
    landed:   bool,
    bounds:   &PoseBounds,
) -> Option<Pose> {
    let t = progress.clamp(0.0, 1.0);
    let lifted = |t: f32| -> Vec3 {
        let p = edge.point_at(t);
        let alt = if landed { 0.0 } else { state.profile.altitude_at(t) };
        p + p.normalize_or_zero() * alt
    };

    let position = lifted(t);
    if !position.is_finite() || !bounds.contains(position.length()) {
        log::trace!("plane pose at t={t} rejected ({position})");
        return None;
    }

    const H: f32 = 1e-3;
    let (t0, t1) = ((t - H).max(0.0), (t + H).min(1.0));
    let tangent = (lifted(t1) - lifted(t0))
        .try_normalize()
        .unwrap_or_else(|| edge.tangent_at(t));
    let frame = Frame::look_along(tangent, position.normalize_or_zero())?;

    let bank = if landed { 0.0 } else { state.bank };
    let rotation = (Quat::from_axis_angle(frame.forward, bank) * frame.rotation()).normalize();
    let pose = Pose { position, rotation, frame };
    pose.is_finite().then_some(pose)
}
