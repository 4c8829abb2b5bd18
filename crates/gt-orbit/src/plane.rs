//! Orbital plane basis.

use glam::Vec3;

/// Orthonormal basis of a circular orbit.
///
/// The plane normal is tilted `inclination` radians away from `+Y` and
/// swung `rotation` radians around it.  Positions on the orbit are
/// `r * (cos(a) * right + sin(a) * forward)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitPlane {
    pub normal:  Vec3,
    pub right:   Vec3,
    pub forward: Vec3,
}

impl OrbitPlane {
    pub fn new(inclination: f32, rotation: f32) -> Self {
        let (si, ci) = inclination.sin_cos();
        let (sr, cr) = rotation.sin_cos();
        let normal = Vec3::new(si * cr, ci, si * sr).normalize();

        // An equatorial orbit has its normal on the Y axis.
        let right = normal
            .cross(Vec3::Y)
            .try_normalize()
            .unwrap_or_else(|| normal.cross(Vec3::X).normalize());
        let forward = normal.cross(right).normalize();
        Self { normal, right, forward }
    }

    /// Point on the orbit of `radius` at `angle`.
    #[inline]
    pub fn position(&self, radius: f32, angle: f32) -> Vec3 {
        let (s, c) = angle.sin_cos();
        radius * (c * self.right + s * self.forward)
    }

    /// Unit direction of travel at `angle` for a positive angular speed.
    #[inline]
    pub fn tangent(&self, angle: f32) -> Vec3 {
        let (s, c) = angle.sin_cos();
        (-s * self.right + c * self.forward).normalize()
    }
}

/// Smallest radius that keeps an orbit of `inclination` clear of the body.
///
/// Clearance scales from 1× for an equatorial orbit to 2× for a polar one.
pub fn min_safe_radius(body_radius: f32, clearance: f32, inclination: f32) -> f32 {
    body_radius + clearance * (1.0 + inclination.sin().abs())
}
