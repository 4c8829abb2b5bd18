//! `OrbitEngine`: the satellite population and its per-tick advance.

use std::f32::consts::{PI, TAU};

use glam::{EulerRot, Quat};
use gt_core::{OrbitConfig, SatelliteId, SimRng};

use crate::error::{OrbitError, OrbitResult};
use crate::plane::min_safe_radius;
use crate::satellite::{Satellite, SatelliteKind, SatellitePose, SatelliteSpec};

/// UI-driven slowdown of the principal satellite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedModifier {
    pub marker_on_screen: bool,
    pub hovered:          bool,
    pub marker_slowdown:  f32,
    pub hover_slowdown:   f32,
}

impl SpeedModifier {
    pub fn new(cfg: &OrbitConfig) -> Self {
        Self {
            marker_on_screen: false,
            hovered:          false,
            marker_slowdown:  cfg.marker_slowdown,
            hover_slowdown:   cfg.hover_slowdown,
        }
    }

    pub fn factor(&self) -> f32 {
        let mut f = 1.0;
        if self.marker_on_screen {
            f *= self.marker_slowdown;
        }
        if self.hovered {
            f *= self.hover_slowdown;
        }
        f
    }
}

#[derive(Debug, Clone)]
pub struct OrbitEngine {
    satellites:  Vec<Satellite>,
    body_radius: f32,
    clearance:   f32,
    modifier:    SpeedModifier,
}

impl OrbitEngine {
    /// An engine with no satellites.
    pub fn empty(cfg: &OrbitConfig) -> Self {
        Self {
            satellites:  Vec::new(),
            body_radius: cfg.body_radius,
            clearance:   cfg.clearance,
            modifier:    SpeedModifier::new(cfg),
        }
    }

    /// The standard population: `small_count` small satellites with random
    /// planes and phases, one station, and one Mars ship.
    ///
    /// Configured station and ship radii below the safe minimum are raised
    /// to it.
    pub fn populate(cfg: &OrbitConfig, rng: &mut SimRng) -> OrbitResult<Self> {
        let mut engine = Self::empty(cfg);

        for i in 0..cfg.small_count {
            let inclination = rng.gen_range(0.0..PI);
            let floor = engine.min_safe_radius(inclination);
            let radius = rng.gen_range(cfg.small_radius.0..=cfg.small_radius.1).max(floor);
            let fixed_rotation = Quat::from_euler(
                EulerRot::YXZ,
                rng.gen_range(0.0..TAU),
                rng.gen_range(0.0..TAU),
                rng.gen_range(0.0..TAU),
            );
            engine.add(SatelliteSpec {
                kind:           SatelliteKind::Small,
                name:           format!("SAT-{:02}", i + 1),
                orbit_radius:   radius,
                orbit_speed:    rng.gen_range(cfg.small_speed.0..=cfg.small_speed.1),
                inclination,
                rotation_angle: rng.gen_range(0.0..TAU),
                angle:          rng.gen_range(0.0..TAU),
                fixed_rotation,
            })?;
        }

        let station_radius = engine.clamped_radius("station", cfg.station_radius, cfg.station_inclination);
        engine.add(SatelliteSpec {
            kind:           SatelliteKind::Station,
            name:           "ISS".to_owned(),
            orbit_radius:   station_radius,
            orbit_speed:    cfg.station_speed,
            inclination:    cfg.station_inclination,
            rotation_angle: rng.gen_range(0.0..TAU),
            angle:          rng.gen_range(0.0..TAU),
            fixed_rotation: Quat::IDENTITY,
        })?;

        let ship_radius = engine.clamped_radius("mars ship", cfg.mars_ship_radius, cfg.mars_ship_inclination);
        engine.add(SatelliteSpec {
            kind:           SatelliteKind::MarsShip,
            name:           "Mars Ship".to_owned(),
            orbit_radius:   ship_radius,
            orbit_speed:    cfg.mars_ship_speed,
            inclination:    cfg.mars_ship_inclination,
            rotation_angle: rng.gen_range(0.0..TAU),
            angle:          rng.gen_range(0.0..TAU),
            fixed_rotation: Quat::IDENTITY,
        })?;

        log::debug!("orbit engine populated with {} satellites", engine.len());
        Ok(engine)
    }

    fn clamped_radius(&self, what: &str, radius: f32, inclination: f32) -> f32 {
        let floor = self.min_safe_radius(inclination);
        if radius < floor {
            log::warn!("{what} orbit radius {radius} raised to safe minimum {floor}");
            floor
        } else {
            radius
        }
    }

    pub fn min_safe_radius(&self, inclination: f32) -> f32 {
        min_safe_radius(self.body_radius, self.clearance, inclination)
    }

    /// Add one satellite, rejecting orbits below the safe radius.
    pub fn add(&mut self, spec: SatelliteSpec) -> OrbitResult<SatelliteId> {
        let id = satellite_id(self.satellites.len())?;
        let min = self.min_safe_radius(spec.inclination);
        self.satellites.push(Satellite::new(id, spec, min)?);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.satellites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.satellites.is_empty()
    }

    pub fn get(&self, id: SatelliteId) -> Option<&Satellite> {
        self.satellites.get(id.index())
    }

    pub fn satellites(&self) -> &[Satellite] {
        &self.satellites
    }

    pub fn modifier(&self) -> SpeedModifier {
        self.modifier
    }

    pub fn set_marker_on_screen(&mut self, on_screen: bool) {
        self.modifier.marker_on_screen = on_screen;
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.modifier.hovered = hovered;
    }

    /// This tick's angular speed of `sat`.
    pub fn effective_speed(&self, sat: &Satellite) -> f32 {
        scaled_speed(sat, self.modifier.factor())
    }

    /// Advance every satellite by its effective speed.
    pub fn tick(&mut self) {
        let factor = self.modifier.factor();
        for sat in &mut self.satellites {
            let speed = scaled_speed(sat, factor);
            sat.advance(speed);
        }
    }

    pub fn poses(&self) -> Vec<SatellitePose> {
        self.satellites
            .iter()
            .map(|s| s.pose(self.effective_speed(s)))
            .collect()
    }
}

/// Id for the satellite at `index`.  The last `u16` is the invalid sentinel.
pub(crate) fn satellite_id(index: usize) -> OrbitResult<SatelliteId> {
    SatelliteId::try_from(index)
        .ok()
        .filter(|&id| id != SatelliteId::INVALID)
        .ok_or(OrbitError::TooManySatellites { count: index })
}

#[inline]
fn scaled_speed(sat: &Satellite, factor: f32) -> f32 {
    match sat.kind {
        SatelliteKind::Station => sat.orbit_speed * factor,
        _ => sat.orbit_speed,
    }
}
