//! Geographic coordinate type and globe projection.
//!
//! `GeoPoint` uses `f32` (single-precision) latitude/longitude, matching the
//! precision of the rendering layer's `f32` vectors.  The globe is a sphere
//! centred on the origin with +Y pointing at the north pole.

use glam::Vec3;

/// A geographic coordinate (degrees) stored as single-precision floats.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f32,
    pub lon: f32,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f32, lon: f32) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in kilometres on a 6,371 km sphere.
    pub fn distance_km(self, other: GeoPoint) -> f32 {
        const R: f32 = 6_371.0; // mean Earth radius, km

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R * c
    }

    /// Unit vector from the globe centre through this coordinate.
    ///
    /// Uses the polar-angle convention of the rendering layer: the north pole
    /// maps to +Y and longitude 0 lies on the -X/+Z half-plane.
    pub fn to_unit_vector(self) -> Vec3 {
        let phi   = (90.0 - self.lat).to_radians();
        let theta = (self.lon + 180.0).to_radians();
        Vec3::new(
            -phi.sin() * theta.cos(),
            phi.cos(),
            phi.sin() * theta.sin(),
        )
    }

    /// Position on (or above) a globe of the given radius.
    #[inline]
    pub fn to_globe(self, radius: f32) -> Vec3 {
        self.to_unit_vector() * radius
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lon)
    }
}
