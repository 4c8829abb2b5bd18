//! Satellites.

use glam::{Mat3, Quat, Vec3};
use gt_core::SatelliteId;

use crate::error::{OrbitError, OrbitResult};
use crate::plane::OrbitPlane;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SatelliteKind {
    Small,
    /// The principal satellite; its speed follows the UI speed modifier.
    Station,
    MarsShip,
}

impl SatelliteKind {
    /// Station and Mars ship point along their velocity; small satellites
    /// keep the orientation they were created with.
    #[inline]
    pub fn orients_along_velocity(self) -> bool {
        !matches!(self, Self::Small)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small    => "small",
            Self::Station  => "station",
            Self::MarsShip => "mars_ship",
        }
    }
}

impl std::fmt::Display for SatelliteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Orbit parameters for [`Satellite::new`].
#[derive(Debug, Clone)]
pub struct SatelliteSpec {
    pub kind:           SatelliteKind,
    pub name:           String,
    pub orbit_radius:   f32,
    /// Radians per tick.
    pub orbit_speed:    f32,
    pub inclination:    f32,
    pub rotation_angle: f32,
    /// Initial phase, radians.
    pub angle:          f32,
    /// Orientation for satellites that do not follow their velocity.
    pub fixed_rotation: Quat,
}

#[derive(Debug, Clone)]
pub struct Satellite {
    pub id:             SatelliteId,
    pub kind:           SatelliteKind,
    pub name:           String,
    pub orbit_radius:   f32,
    pub orbit_speed:    f32,
    pub inclination:    f32,
    pub rotation_angle: f32,
    /// Current phase in `[0, 2π)`.
    pub angle:          f32,
    pub plane:          OrbitPlane,
    pub fixed_rotation: Quat,
}

/// Rendered state of one satellite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SatellitePose {
    pub id:       SatelliteId,
    pub kind:     SatelliteKind,
    pub position: Vec3,
    pub rotation: Quat,
}

impl Satellite {
    /// Fails if the radius is below `min_radius` or the speed is not finite.
    pub fn new(id: SatelliteId, spec: SatelliteSpec, min_radius: f32) -> OrbitResult<Self> {
        if spec.orbit_radius.is_nan() || spec.orbit_radius < min_radius {
            return Err(OrbitError::BelowSafeRadius {
                name:   spec.name,
                radius: spec.orbit_radius,
                min:    min_radius,
            });
        }
        if !spec.orbit_speed.is_finite() {
            return Err(OrbitError::InvalidSpeed { name: spec.name, speed: spec.orbit_speed });
        }
        Ok(Self {
            id,
            kind:           spec.kind,
            plane:          OrbitPlane::new(spec.inclination, spec.rotation_angle),
            name:           spec.name,
            orbit_radius:   spec.orbit_radius,
            orbit_speed:    spec.orbit_speed,
            inclination:    spec.inclination,
            rotation_angle: spec.rotation_angle,
            angle:          spec.angle.rem_euclid(std::f32::consts::TAU),
            fixed_rotation: spec.fixed_rotation,
        })
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position_at(self.angle)
    }

    #[inline]
    pub fn position_at(&self, angle: f32) -> Vec3 {
        self.plane.position(self.orbit_radius, angle)
    }

    pub(crate) fn advance(&mut self, speed: f32) {
        self.angle = (self.angle + speed).rem_euclid(std::f32::consts::TAU);
    }

    /// Pose at the current angle; `speed` is this tick's effective speed.
    pub fn pose(&self, speed: f32) -> SatellitePose {
        let position = self.position();
        let rotation = if self.kind.orients_along_velocity() {
            self.velocity_rotation(position, speed)
        } else {
            self.fixed_rotation
        };
        SatellitePose { id: self.id, kind: self.kind, position, rotation }
    }

    fn velocity_rotation(&self, position: Vec3, speed: f32) -> Quat {
        let forward = (self.position_at(self.angle + speed) - position)
            .try_normalize()
            .unwrap_or_else(|| self.plane.tangent(self.angle));
        let radial = position.normalize_or_zero();
        let up = (radial - forward * radial.dot(forward)).try_normalize().unwrap_or(self.plane.normal);
        let side = up.cross(forward);
        Quat::from_mat3(&Mat3::from_cols(side, up, forward)).normalize()
    }
}
