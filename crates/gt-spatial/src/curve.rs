//! Parametric route curves.
//!
//! The simulation only consumes the [`Curve`] trait; the geometry layer
//! decides what a route looks like.  Two implementations ship with the crate:
//!
//! | Type        | Shape                                                        |
//! |-------------|--------------------------------------------------------------|
//! | [`LineCurve`] | straight segment, exact length (tests, flat maps)          |
//! | [`ArcCurve`]  | great-circle arc over the globe, lifted by a sine bump     |
//!
//! [`CurveProvider`] is the `curve_between(a, b)` hook the route-graph
//! builder uses to obtain geometry for each pair of locations.

use std::f32::consts::PI;
use std::fmt;
use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::network::Location;

/// Arc-length samples used to measure an `ArcCurve`.
const LENGTH_SAMPLES: usize = 64;

/// Parameter step for finite-difference tangents.
const TANGENT_STEP: f32 = 1e-3;

// ── Curve trait ───────────────────────────────────────────────────────────────

/// A parametric 3D path over `t ∈ [0, 1]`.
///
/// Implementations must be `Send + Sync`: one curve is shared read-only by
/// both directed edges of a route and by every vehicle travelling it.
pub trait Curve: Send + Sync + fmt::Debug {
    /// Position at parameter `t`.  Callers clamp `t` to `[0, 1]`.
    fn point_at(&self, t: f32) -> Vec3;

    /// Unit direction of travel at `t`.  May be zero for degenerate curves.
    fn tangent_at(&self, t: f32) -> Vec3;

    /// Total arc length in world units.
    fn length(&self) -> f32;
}

// ── LineCurve ─────────────────────────────────────────────────────────────────

/// A straight segment from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineCurve {
    pub start: Vec3,
    pub end:   Vec3,
}

impl LineCurve {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }
}

impl Curve for LineCurve {
    fn point_at(&self, t: f32) -> Vec3 {
        self.start.lerp(self.end, t)
    }

    fn tangent_at(&self, _t: f32) -> Vec3 {
        (self.end - self.start).normalize_or_zero()
    }

    fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

// ── ArcCurve ──────────────────────────────────────────────────────────────────

/// Great-circle arc between two surface points, raised by
/// `lift * sin(πt)` so routes clear the globe mesh mid-way.
///
/// The arc length is measured once at construction by chord sampling.
#[derive(Debug, Clone)]
pub struct ArcCurve {
    start:  Vec3,
    axis:   Vec3,
    angle:  f32,
    radius: f32,
    lift:   f32,
    length: f32,
}

impl ArcCurve {
    /// `start`/`end` are directions from the globe centre (need not be unit).
    pub fn new(start: Vec3, end: Vec3, radius: f32, lift: f32) -> Self {
        let a = start.normalize_or_zero();
        let b = end.normalize_or_zero();
        let angle = a.dot(b).clamp(-1.0, 1.0).acos();

        // Antipodal or coincident endpoints have no unique rotation plane.
        let cross = a.cross(b);
        let axis = if cross.length_squared() > 1e-12 {
            cross.normalize()
        } else {
            a.any_orthonormal_vector()
        };

        let mut curve = Self { start: a, axis, angle, radius, lift, length: 0.0 };
        curve.length = curve.measure();
        curve
    }

    /// Central angle swept by the arc, radians.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    fn measure(&self) -> f32 {
        let mut total = 0.0;
        let mut prev = self.point_at(0.0);
        for i in 1..=LENGTH_SAMPLES {
            let p = self.point_at(i as f32 / LENGTH_SAMPLES as f32);
            total += prev.distance(p);
            prev = p;
        }
        total
    }
}

impl Curve for ArcCurve {
    fn point_at(&self, t: f32) -> Vec3 {
        let dir = Quat::from_axis_angle(self.axis, self.angle * t) * self.start;
        dir * (self.radius + self.lift * (PI * t).sin())
    }

    fn tangent_at(&self, t: f32) -> Vec3 {
        let lo = (t - TANGENT_STEP).max(0.0);
        let hi = (t + TANGENT_STEP).min(1.0);
        (self.point_at(hi) - self.point_at(lo)).normalize_or_zero()
    }

    fn length(&self) -> f32 {
        self.length
    }
}

// ── CurveProvider ─────────────────────────────────────────────────────────────

/// Supplies the geometry for a route between two locations.
///
/// Returning `None` means "no drawable route"; the graph builder reports it
/// as [`SpatialError::NoCurve`](crate::SpatialError::NoCurve).
pub trait CurveProvider {
    fn curve_between(&self, from: &Location, to: &Location) -> Option<Arc<dyn Curve>>;
}

/// Builds an [`ArcCurve`] for every pair, lifting longer arcs higher.
#[derive(Debug, Clone, Copy)]
pub struct ArcCurveProvider {
    /// Globe radius the arcs start and end on.
    pub radius: f32,
    /// Constant lift at the arc midpoint.
    pub base_lift: f32,
    /// Extra lift per radian of central angle.
    pub lift_per_radian: f32,
}

impl ArcCurveProvider {
    pub fn new(radius: f32, base_lift: f32, lift_per_radian: f32) -> Self {
        Self { radius, base_lift, lift_per_radian }
    }
}

impl CurveProvider for ArcCurveProvider {
    fn curve_between(&self, from: &Location, to: &Location) -> Option<Arc<dyn Curve>> {
        let a = from.pos.to_unit_vector();
        let b = to.pos.to_unit_vector();
        let angle = a.dot(b).clamp(-1.0, 1.0).acos();
        if !angle.is_finite() {
            return None;
        }
        let lift = self.base_lift + self.lift_per_radian * angle;
        Some(Arc::new(ArcCurve::new(a, b, self.radius, lift)))
    }
}
