//! Transport tunables supplied to the engine by the embedding application.
//!
//! Nothing in the simulation hardcodes speeds, populations or spawn rates;
//! everything lives in [`TransportConfig`] so a host can substitute its own
//! values.  With the `serde` feature every struct deserializes with
//! `#[serde(default)]`, so a JSON file only needs to list what it overrides.
//!
//! # Units
//!
//! Distances are world units of the rendered globe (the default globe radius
//! is 100).  Speeds are world units per tick; the mobility crate converts
//! them into progress-per-tick by dividing by the route's arc length.

use crate::{GtError, GtResult, VehicleClass};

// ── Bands ─────────────────────────────────────────────────────────────────────

/// Travel speed for routes up to `max_distance` world units long.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeedBand {
    pub max_distance:   f32,
    pub units_per_tick: f32,
}

/// Number of wagons for train routes up to `max_distance` world units long.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WagonBand {
    pub max_distance: u32,
    pub wagons:       u8,
}

/// Pick the first band whose `max_distance` covers `distance`, falling back
/// to the last band for anything longer.
fn pick_band<T, F>(bands: &[T], distance: f32, max_of: F) -> Option<&T>
where
    F: Fn(&T) -> f32,
{
    bands
        .iter()
        .find(|b| distance <= max_of(b))
        .or_else(|| bands.last())
}

// ── ClassConfig ───────────────────────────────────────────────────────────────

/// Spawning and movement tunables shared by every vehicle class.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClassConfig {
    /// Ticks between spawn attempts.
    pub spawn_interval_ticks: u64,
    /// Population cap; no spawns while this many vehicles are active.
    pub max_active: usize,
    /// Probability that a spawn attempts a multi-stop itinerary.
    pub multi_stop_probability: f64,
    /// Inclusive hop-count range for multi-stop itineraries.
    pub min_hops: usize,
    pub max_hops: usize,
    /// How many random segments to try before giving up on a spawn.
    pub spawn_attempts: usize,
    /// Speed by route length, sorted by ascending `max_distance`.
    pub speed_bands: Vec<SpeedBand>,
    /// Ticks between trail-particle requests for a moving vehicle.
    pub trail_interval_ticks: u64,
}

impl ClassConfig {
    /// World units per tick for a route of `distance` units.
    pub fn units_per_tick(&self, distance: f32) -> f32 {
        pick_band(&self.speed_bands, distance, |b| b.max_distance)
            .map(|b| b.units_per_tick)
            .unwrap_or(0.0)
    }

    /// Progress-per-tick along a route of `distance` units.
    ///
    /// Degenerate routes (zero or non-finite length) complete in one tick.
    pub fn progress_speed(&self, distance: f32) -> f32 {
        if !distance.is_finite() || distance <= f32::EPSILON {
            return 1.0;
        }
        (self.units_per_tick(distance) / distance).clamp(f32::EPSILON, 1.0)
    }

    fn validate(&self, class: VehicleClass) -> GtResult<()> {
        let fail = |reason: &str| GtError::ClassConfig { class, reason: reason.to_owned() };

        if self.spawn_interval_ticks == 0 {
            return Err(fail("spawn_interval_ticks must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.multi_stop_probability) {
            return Err(fail("multi_stop_probability must be within [0, 1]"));
        }
        if self.min_hops > self.max_hops {
            return Err(fail("min_hops exceeds max_hops"));
        }
        if self.multi_stop_probability > 0.0 && self.max_hops < 2 {
            return Err(fail("multi-stop itineraries need max_hops >= 2"));
        }
        if self.speed_bands.is_empty() {
            return Err(fail("speed_bands is empty"));
        }
        if self.speed_bands.iter().any(|b| !(b.units_per_tick > 0.0)) {
            return Err(fail("every speed band needs a positive units_per_tick"));
        }
        if self.speed_bands.windows(2).any(|w| w[0].max_distance > w[1].max_distance) {
            return Err(fail("speed_bands must be sorted by max_distance"));
        }
        Ok(())
    }

    fn train() -> Self {
        Self {
            spawn_interval_ticks:   180,
            max_active:             12,
            multi_stop_probability: 0.4,
            min_hops:               2,
            max_hops:               4,
            spawn_attempts:         8,
            speed_bands: vec![
                SpeedBand { max_distance: 20.0,  units_per_tick: 0.06 },
                SpeedBand { max_distance: 60.0,  units_per_tick: 0.10 },
                SpeedBand { max_distance: 400.0, units_per_tick: 0.16 },
            ],
            trail_interval_ticks: 6,
        }
    }

    fn boat() -> Self {
        Self {
            spawn_interval_ticks:   240,
            max_active:             10,
            multi_stop_probability: 0.3,
            min_hops:               2,
            max_hops:               3,
            spawn_attempts:         8,
            speed_bands: vec![
                SpeedBand { max_distance: 40.0,  units_per_tick: 0.04 },
                SpeedBand { max_distance: 400.0, units_per_tick: 0.07 },
            ],
            trail_interval_ticks: 10,
        }
    }

    fn plane() -> Self {
        Self {
            spawn_interval_ticks:   120,
            max_active:             15,
            multi_stop_probability: 0.0,
            min_hops:               1,
            max_hops:               1,
            spawn_attempts:         4,
            speed_bands: vec![
                SpeedBand { max_distance: 30.0,  units_per_tick: 0.15 },
                SpeedBand { max_distance: 90.0,  units_per_tick: 0.25 },
                SpeedBand { max_distance: 400.0, units_per_tick: 0.35 },
            ],
            trail_interval_ticks: 4,
        }
    }
}

impl Default for ClassConfig {
    fn default() -> Self {
        Self::train()
    }
}

// ── Class-specific extras ─────────────────────────────────────────────────────

/// Train-only tunables.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrainConfig {
    /// Wagon count by route length, sorted by ascending `max_distance`.
    pub wagon_bands: Vec<WagonBand>,
    /// Arc-length gap between consecutive wagons, world units.
    pub wagon_spacing: f32,
    /// Hop cap for the alternate-route search when the next leg is held.
    pub alternate_max_hops: usize,
}

impl TrainConfig {
    pub fn wagons_for(&self, distance: f32) -> u8 {
        pick_band(&self.wagon_bands, distance, |b| b.max_distance as f32)
            .map(|b| b.wagons)
            .unwrap_or(0)
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            wagon_bands: vec![
                WagonBand { max_distance: 30,  wagons: 2 },
                WagonBand { max_distance: 80,  wagons: 4 },
                WagonBand { max_distance: 400, wagons: 6 },
            ],
            wagon_spacing:      0.6,
            alternate_max_hops: 4,
        }
    }
}

/// Plane-only tunables: flight envelope, landing hold and banking.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlaneConfig {
    /// Ticks a plane spends in `Landed`, counting the landing tick; 0 removes
    /// it on arrival.
    pub landed_hold_ticks: u32,
    /// Cruise altitude above the route curve for a reference-length route.
    pub cruise_altitude: f32,
    /// Route length at which the cruise altitude applies unscaled.
    pub reference_distance: f32,
    /// Upper bound on the distance scaling of the cruise altitude.
    pub max_cruise_factor: f32,
    /// Fraction of a reference-length route spent climbing (and descending).
    pub climb_fraction: f32,
    /// Bounds for the distance-scaled climb fraction.
    pub min_climb_fraction: f32,
    pub max_climb_fraction: f32,
    /// Roll limit, radians.
    pub max_bank: f32,
    /// Largest random change of the bank target per tick, radians.
    pub bank_step: f32,
    /// Fraction of the gap to the bank target closed each tick.
    pub bank_smoothing: f32,
}

impl Default for PlaneConfig {
    fn default() -> Self {
        Self {
            landed_hold_ticks:  90,
            cruise_altitude:    2.0,
            reference_distance: 50.0,
            max_cruise_factor:  2.5,
            climb_fraction:     0.25,
            min_climb_fraction: 0.08,
            max_climb_fraction: 0.35,
            max_bank:           0.35,
            bank_step:          0.05,
            bank_smoothing:     0.08,
        }
    }
}

/// Satellite population and orbit-speed tunables.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OrbitConfig {
    /// Radius of the central body (the globe).
    pub body_radius: f32,
    /// Minimum gap between an orbit and the body surface.
    pub clearance: f32,
    /// Number of ordinary satellites.
    pub small_count: usize,
    pub small_radius: (f32, f32),
    /// Angular speed range, radians per tick.
    pub small_speed: (f32, f32),
    pub station_radius: f32,
    pub station_speed: f32,
    /// Radians.
    pub station_inclination: f32,
    pub mars_ship_radius: f32,
    pub mars_ship_speed: f32,
    pub mars_ship_inclination: f32,
    /// Station speed multiplier while its marker is on screen.
    pub marker_slowdown: f32,
    /// Additional multiplier while the station is hovered.
    pub hover_slowdown: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            body_radius:           100.0,
            clearance:             6.0,
            small_count:           12,
            small_radius:          (112.0, 140.0),
            small_speed:           (0.002, 0.006),
            station_radius:        115.0,
            station_speed:         0.006,
            station_inclination:   0.9,
            mars_ship_radius:      160.0,
            mars_ship_speed:       0.002,
            mars_ship_inclination: 0.2,
            marker_slowdown:       0.5,
            hover_slowdown:        0.5,
        }
    }
}

/// Distance-from-centre window a sampled position must fall into to be
/// drawn.  Samples outside it (or non-finite) are hidden for that tick.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PoseBounds {
    pub min_radius: f32,
    pub max_radius: f32,
}

impl PoseBounds {
    #[inline]
    pub fn contains(&self, distance_from_centre: f32) -> bool {
        distance_from_centre.is_finite()
            && distance_from_centre >= self.min_radius
            && distance_from_centre <= self.max_radius
    }
}

impl Default for PoseBounds {
    fn default() -> Self {
        Self { min_radius: 95.0, max_radius: 200.0 }
    }
}

// ── TransportConfig ───────────────────────────────────────────────────────────

/// Everything the engine needs to know that is not geometry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TransportConfig {
    pub train:       ClassConfig,
    pub boat:        ClassConfig,
    pub plane:       ClassConfig,
    pub train_extra: TrainConfig,
    pub plane_extra: PlaneConfig,
    pub orbit:       OrbitConfig,
    pub pose_bounds: PoseBounds,
}

impl TransportConfig {
    pub fn class(&self, class: VehicleClass) -> &ClassConfig {
        match class {
            VehicleClass::Train => &self.train,
            VehicleClass::Boat  => &self.boat,
            VehicleClass::Plane => &self.plane,
        }
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> GtResult<()> {
        for class in VehicleClass::ALL {
            self.class(class).validate(class)?;
        }
        if self.plane.multi_stop_probability > 0.0 {
            return Err(GtError::ClassConfig {
                class:  VehicleClass::Plane,
                reason: "planes fly single legs; multi_stop_probability must be 0".into(),
            });
        }
        if self.train_extra.wagon_spacing < 0.0 {
            return Err(GtError::Config("wagon_spacing must not be negative".into()));
        }
        let p = &self.plane_extra;
        if p.min_climb_fraction > p.max_climb_fraction || p.max_climb_fraction >= 0.5 {
            return Err(GtError::Config(
                "climb fraction bounds must satisfy min <= max < 0.5".into(),
            ));
        }
        let o = &self.orbit;
        if o.small_radius.0 > o.small_radius.1 || o.small_speed.0 > o.small_speed.1 {
            return Err(GtError::Config("orbit ranges must be (min, max)".into()));
        }
        if self.pose_bounds.min_radius >= self.pose_bounds.max_radius {
            return Err(GtError::Config("pose_bounds.min_radius must be below max_radius".into()));
        }
        Ok(())
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            train:       ClassConfig::train(),
            boat:        ClassConfig::boat(),
            plane:       ClassConfig::plane(),
            train_extra: TrainConfig::default(),
            plane_extra: PlaneConfig::default(),
            orbit:       OrbitConfig::default(),
            pose_bounds: PoseBounds::default(),
        }
    }
}
