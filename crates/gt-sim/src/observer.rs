//! Simulation observer trait for rendering hooks and data collection.

use glam::Vec3;
use gt_core::{Tick, VehicleClass, VehicleId};
use gt_mobility::{Frame, MobilityEvent, VehiclePose};
use gt_orbit::SatellitePose;

/// Per-tick counters, passed to [`SimObserver::on_tick_end`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickStats {
    pub tick:           Tick,
    pub created:        usize,
    pub removed:        usize,
    pub rerouted:       usize,
    pub blocked:        usize,
    pub trail_requests: usize,
    /// Active vehicles per class after the tick, by `VehicleClass::index`.
    pub active:         [usize; 3],
    pub waiting:        usize,
    pub held_segments:  usize,
}

impl TickStats {
    pub fn total_active(&self) -> usize {
        self.active.iter().sum()
    }

    pub(crate) fn count(&mut self, event: &MobilityEvent) {
        match event {
            MobilityEvent::Created { .. }    => self.created += 1,
            MobilityEvent::Removed { .. }    => self.removed += 1,
            MobilityEvent::Rerouted { .. }   => self.rerouted += 1,
            MobilityEvent::Blocked { .. }    => self.blocked += 1,
            MobilityEvent::TrailSpawn { .. } => self.trail_requests += 1,
        }
    }
}

/// Running totals over a whole simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTotals {
    pub ticks:    u64,
    pub created:  u64,
    pub removed:  u64,
    pub rerouted: u64,
}

impl RunTotals {
    pub(crate) fn add(&mut self, stats: &TickStats) {
        self.ticks    += 1;
        self.created  += stats.created as u64;
        self.removed  += stats.removed as u64;
        self.rerouted += stats.rerouted as u64;
    }
}

/// Callbacks invoked by [`Sim`][crate::Sim] at key points in the tick.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Events for a tick are delivered after
/// every fleet has stepped, in the order they happened.
///
/// # Example: spawn counter
///
/// ```rust,ignore
/// struct Spawns(usize);
///
/// impl SimObserver for Spawns {
///     fn on_vehicle_created(&mut self, _: Tick, _: VehicleId, _: VehicleClass) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait SimObserver {
    fn on_tick_start(&mut self, _tick: Tick) {}

    fn on_tick_end(&mut self, _tick: Tick, _stats: &TickStats) {}

    /// Every lifecycle event, including those with a dedicated hook below.
    fn on_event(&mut self, _tick: Tick, _event: &MobilityEvent) {}

    fn on_vehicle_created(&mut self, _tick: Tick, _id: VehicleId, _class: VehicleClass) {}

    fn on_vehicle_removed(&mut self, _tick: Tick, _id: VehicleId, _class: VehicleClass) {}

    /// A visible moving vehicle asks for a trail particle.
    fn on_trail_spawn(
        &mut self,
        _tick:     Tick,
        _id:       VehicleId,
        _class:    VehicleClass,
        _position: Vec3,
        _frame:    &Frame,
    ) {}

    /// Called every `config.output_interval_ticks` ticks with all poses.
    fn on_snapshot(&mut self, _tick: Tick, _vehicles: &[VehiclePose], _satellites: &[SatellitePose]) {}

    /// Called once after the final tick of [`Sim::run`][crate::Sim::run].
    fn on_sim_end(&mut self, _final_tick: Tick, _totals: &RunTotals) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

pub(crate) fn dispatch<O: SimObserver + ?Sized>(observer: &mut O, tick: Tick, event: &MobilityEvent) {
    observer.on_event(tick, event);
    match *event {
        MobilityEvent::Created { id, class } => observer.on_vehicle_created(tick, id, class),
        MobilityEvent::Removed { id, class } => observer.on_vehicle_removed(tick, id, class),
        MobilityEvent::TrailSpawn { id, class, position, ref frame } => {
            observer.on_trail_spawn(tick, id, class, position, frame)
        }
        MobilityEvent::Rerouted { .. } | MobilityEvent::Blocked { .. } => {}
    }
}
