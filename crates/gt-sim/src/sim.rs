//! The `Sim` struct and its tick loop.

use gt_core::{
    SimClock, SimConfig, SimRng, Tick, TransportConfig, VehicleClass, VehicleId,
};
use gt_mobility::{
    Fleet, FleetContext, MobilityEvent, ReservationTable, Vehicle, VehiclePose,
};
use gt_orbit::{OrbitEngine, SatellitePose};
use gt_spatial::{Itinerary, ItineraryPlanner, RandomWalkPlanner, RouteGraph};

use crate::observer::{dispatch, RunTotals, SimObserver, TickStats};
use crate::spawner::{plan_itinerary, Spawner};
use crate::SimResult;

// ── Visibility ────────────────────────────────────────────────────────────────

/// Host-controlled visibility flags.
///
/// Spawning and trail requests pause unless both flags are set; vehicles
/// keep moving either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub globe_visible:    bool,
    pub transport_active: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self { globe_visible: true, transport_active: true }
    }
}

impl Visibility {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.globe_visible && self.transport_active
    }
}

// ── Per-class runtime ─────────────────────────────────────────────────────────

/// Everything owned by one vehicle class.
#[derive(Debug)]
pub struct ClassRuntime {
    pub class:        VehicleClass,
    pub graph:        RouteGraph,
    pub reservations: ReservationTable,
    pub fleet:        Fleet,
    pub spawner:      Spawner,
}

impl ClassRuntime {
    pub fn new(class: VehicleClass, graph: RouteGraph, transport: &TransportConfig) -> Self {
        Self {
            class,
            graph,
            reservations: ReservationTable::new(),
            fleet:        Fleet::for_class(class, transport),
            spawner:      Spawner::new(class, transport.class(class).spawn_interval_ticks),
        }
    }

    pub fn poses(&self, transport: &TransportConfig) -> Vec<VehiclePose> {
        self.fleet.poses(&self.graph, transport)
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// Each tick, in order:
///
/// 1. Every class fleet steps its vehicles (trains, then boats, then
///    planes).  Segment releases are visible to vehicles stepped later in
///    the same tick.
/// 2. Each running spawner fires on its interval and, while the globe is
///    visible and the class is below its cap, launches one vehicle.
///    Launching after the step keeps new vehicles off screen for the tick
///    they are created in.
/// 3. Satellites advance.
/// 4. Events are delivered to the observer, followed by `on_tick_end`.
///    Vehicles put on the map with [`Sim::launch`] between steps report
///    their `Created` event with the next step.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<P: ItineraryPlanner = RandomWalkPlanner> {
    pub config:     SimConfig,
    pub transport:  TransportConfig,
    pub clock:      SimClock,
    /// Indexed by [`VehicleClass::index`].
    pub classes:    Vec<ClassRuntime>,
    pub orbit:      OrbitEngine,
    pub planner:    P,
    pub visibility: Visibility,
    pub totals:     RunTotals,
    pub(crate) rng:          SimRng,
    pub(crate) next_vehicle: u32,
    pub(crate) events:       Vec<MobilityEvent>,
}

impl<P: ItineraryPlanner> Sim<P> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while self.clock.current_tick < self.config.end_tick() {
            self.step(observer);
        }
        let totals = self.totals;
        log::info!(
            "simulation finished at {}: {} created, {} removed, {} reroutes, {} active",
            self.clock.current_tick,
            totals.created,
            totals.removed,
            totals.rerouted,
            self.active_count(),
        );
        observer.on_sim_end(self.clock.current_tick, &totals);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer);
        }
        Ok(())
    }

    /// Advance one tick.
    pub fn step<O: SimObserver + ?Sized>(&mut self, observer: &mut O) -> TickStats {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);

        self.advance_fleets(now);
        self.run_spawners(now);
        self.orbit.tick();

        let mut stats = TickStats { tick: now, ..TickStats::default() };
        for event in &self.events {
            stats.count(event);
            dispatch(observer, now, event);
        }
        self.events.clear();
        for rt in &self.classes {
            stats.active[rt.class.index()] = rt.fleet.len();
            stats.waiting += rt.fleet.waiting_count();
            stats.held_segments += rt.reservations.held_count();
        }
        self.totals.add(&stats);
        observer.on_tick_end(now, &stats);

        let interval = self.config.output_interval_ticks;
        if interval > 0 && now.0.is_multiple_of(interval) {
            let vehicles = self.vehicle_poses();
            let satellites = self.satellite_poses();
            observer.on_snapshot(now, &vehicles, &satellites);
        }

        self.clock.advance();
        stats
    }

    pub fn now(&self) -> Tick {
        self.clock.current_tick
    }

    pub fn class(&self, class: VehicleClass) -> &ClassRuntime {
        &self.classes[class.index()]
    }

    pub fn active_count(&self) -> usize {
        self.classes.iter().map(|rt| rt.fleet.len()).sum()
    }

    /// Poses of every rendered vehicle, all classes.
    pub fn vehicle_poses(&self) -> Vec<VehiclePose> {
        self.classes
            .iter()
            .flat_map(|rt| rt.poses(&self.transport))
            .collect()
    }

    pub fn satellite_poses(&self) -> Vec<SatellitePose> {
        self.orbit.poses()
    }

    // ── Host controls ─────────────────────────────────────────────────────

    pub fn set_globe_visible(&mut self, visible: bool) {
        self.visibility.globe_visible = visible;
    }

    pub fn set_transport_active(&mut self, active: bool) {
        self.visibility.transport_active = active;
    }

    pub fn start_spawner(&mut self, class: VehicleClass) {
        let now = self.clock.current_tick;
        self.classes[class.index()].spawner.start(now);
    }

    pub fn stop_spawner(&mut self, class: VehicleClass) {
        self.classes[class.index()].spawner.stop();
    }

    pub fn start_all_spawners(&mut self) {
        VehicleClass::ALL.into_iter().for_each(|c| self.start_spawner(c));
    }

    pub fn stop_all_spawners(&mut self) {
        VehicleClass::ALL.into_iter().for_each(|c| self.stop_spawner(c));
    }

    pub fn set_marker_on_screen(&mut self, on_screen: bool) {
        self.orbit.set_marker_on_screen(on_screen);
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.orbit.set_hovered(hovered);
    }

    /// Drop every active vehicle and release its segments.
    ///
    /// Spawners keep their schedule; removals reach the observer on the next
    /// step.
    pub fn clear_vehicles(&mut self) {
        for rt in &mut self.classes {
            rt.fleet.clear(&mut rt.reservations, &mut self.events);
        }
        log::info!("cleared all vehicles at {}", self.clock.current_tick);
    }

    /// Put a vehicle on `itinerary` right now, bypassing the spawner.
    ///
    /// Fails if the itinerary is invalid for the class graph or its first
    /// segment is held.  The event reaches the observer on the next step.
    pub fn launch(&mut self, class: VehicleClass, itinerary: Itinerary) -> SimResult<VehicleId> {
        let now = self.clock.current_tick;
        let id = VehicleId(self.next_vehicle);
        let rt = &mut self.classes[class.index()];
        let vehicle = Vehicle::new(id, class, itinerary, &rt.graph, &self.transport, now, &mut self.rng)?;
        rt.fleet.launch(vehicle, &rt.graph, &mut rt.reservations, &mut self.events)?;
        self.next_vehicle += 1;
        Ok(id)
    }

    // ── Tick phases ───────────────────────────────────────────────────────

    fn advance_fleets(&mut self, now: Tick) {
        let visible = self.visibility.is_active();
        for rt in &mut self.classes {
            let mut ctx = FleetContext {
                now,
                graph:        &rt.graph,
                reservations: &mut rt.reservations,
                planner:      &self.planner,
                config:       &self.transport,
                visible,
            };
            rt.fleet.tick(&mut ctx, &mut self.events);
        }
    }

    fn run_spawners(&mut self, now: Tick) {
        let active = self.visibility.is_active();
        for rt in &mut self.classes {
            if !rt.spawner.poll(now) {
                continue;
            }
            let cfg = self.transport.class(rt.class);
            if !active || rt.fleet.len() >= cfg.max_active {
                continue;
            }
            let Some(itinerary) =
                plan_itinerary(rt.class, cfg, &rt.graph, &rt.reservations, &self.planner, &mut self.rng)
            else {
                log::trace!("{} spawner found no free segment", rt.class);
                continue;
            };

            let id = VehicleId(self.next_vehicle);
            let launched = Vehicle::new(id, rt.class, itinerary, &rt.graph, &self.transport, now, &mut self.rng)
                .and_then(|v| rt.fleet.launch(v, &rt.graph, &mut rt.reservations, &mut self.events));
            match launched {
                Ok(_)  => self.next_vehicle += 1,
                Err(e) => log::trace!("{} spawn skipped: {e}", rt.class),
            }
        }
    }
}
