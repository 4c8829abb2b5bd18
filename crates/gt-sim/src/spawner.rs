//! Periodic vehicle spawning.

use gt_core::{ClassConfig, SimRng, Tick, VehicleClass};
use gt_mobility::ReservationTable;
use gt_spatial::{random_edge, Itinerary, ItineraryPlanner, RouteGraph};

/// Interval timer for one vehicle class.
///
/// A running spawner fires once every `interval` ticks.  Whether a firing
/// actually produces a vehicle is up to the caller (population cap,
/// visibility, free segments).
#[derive(Debug, Clone)]
pub struct Spawner {
    pub class: VehicleClass,
    interval:  u64,
    running:   bool,
    next_at:   Tick,
}

impl Spawner {
    pub fn new(class: VehicleClass, interval: u64) -> Self {
        Self { class, interval: interval.max(1), running: false, next_at: Tick::ZERO }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn interval(&self) -> u64 {
        self.interval
    }

    /// Start firing; the first firing is one interval after `now`.
    pub fn start(&mut self, now: Tick) {
        if !self.running {
            self.running = true;
            self.next_at = now + self.interval;
            log::info!("{} spawner started (every {} ticks)", self.class, self.interval);
        }
    }

    /// Stop firing.  Vehicles already on the map are unaffected.
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            log::info!("{} spawner stopped", self.class);
        }
    }

    /// `true` if the spawner fires at `now`.
    pub fn poll(&mut self, now: Tick) -> bool {
        if !self.running || now < self.next_at {
            return false;
        }
        self.next_at = now + self.interval;
        true
    }
}

/// Choose an itinerary for a new vehicle of `class`.
///
/// Reserving classes roll `multi_stop_probability` for a multi-stop walk
/// and otherwise, or when the walk's first leg is taken, fall back to a
/// random free segment.  Planes take any random segment.
pub fn plan_itinerary<P: ItineraryPlanner + ?Sized>(
    class:        VehicleClass,
    cfg:          &ClassConfig,
    graph:        &RouteGraph,
    reservations: &ReservationTable,
    planner:      &P,
    rng:          &mut SimRng,
) -> Option<Itinerary> {
    if graph.edge_count() == 0 {
        return None;
    }
    let reserves = class.uses_reservations();
    let free = |e| {
        let edge = graph.edge(e);
        !reserves || reservations.is_available(edge.from, edge.to)
    };

    if reserves && cfg.multi_stop_probability > 0.0 && rng.gen_bool(cfg.multi_stop_probability) {
        let lo = cfg.min_hops.max(2);
        let hops = rng.gen_range(lo..=cfg.max_hops.max(lo));
        if let Some(it) = planner.multi_stop(graph, hops, rng) {
            if it.legs.first().is_some_and(|&e| free(e)) {
                return Some(it);
            }
            log::trace!("{class} multi-stop walk is empty or starts on a held segment; falling back");
        }
    }

    random_edge(graph, rng, cfg.spawn_attempts, free).map(Itinerary::single)
}
