//! A single vehicle and its class-specific state.

use gt_core::{EdgeId, LocationId, SimRng, Tick, TransportConfig, VehicleClass, VehicleId};
use gt_spatial::{Itinerary, RouteEdge, RouteGraph};

use crate::error::{MobilityError, MobilityResult};
use crate::plane::{FlightProfile, PlaneState};
use crate::state::VehicleState;
use crate::train::TrainState;

/// Class-specific state.
#[derive(Debug)]
pub enum VehicleKind {
    Train(TrainState),
    Boat,
    Plane(PlaneState),
}

/// Rate-limits trail-particle requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailTimer {
    pub interval: u64,
    pub last:     Option<Tick>,
}

impl TrailTimer {
    pub fn new(interval: u64) -> Self {
        Self { interval, last: None }
    }

    #[inline]
    pub fn is_due(&self, now: Tick) -> bool {
        match self.last {
            None       => true,
            Some(last) => now.since(last) >= self.interval,
        }
    }

    #[inline]
    pub fn mark(&mut self, now: Tick) {
        self.last = Some(now);
    }
}

#[derive(Debug)]
pub struct Vehicle {
    pub id:         VehicleId,
    pub class:      VehicleClass,
    pub legs:       Vec<EdgeId>,
    pub leg_index:  usize,
    /// Fraction of the current leg covered, `[0, 1]`.
    pub progress:   f32,
    /// Progress gained per tick on the current leg.
    pub speed:      f32,
    /// Advancing ticks spent on the current leg.
    pub ticks_on_leg: u32,
    pub state:      VehicleState,
    pub multi_stop: bool,
    pub spawned_at: Tick,
    pub trail:      TrailTimer,
    pub kind:       VehicleKind,
}

impl Vehicle {
    /// Build a vehicle at the start of `itinerary`.
    ///
    /// Fails if the itinerary is empty, references edges outside `graph`, or
    /// has a gap between consecutive legs.
    pub fn new(
        id:        VehicleId,
        class:     VehicleClass,
        itinerary: Itinerary,
        graph:     &RouteGraph,
        config:    &TransportConfig,
        now:       Tick,
        rng:       &mut SimRng,
    ) -> MobilityResult<Self> {
        validate_itinerary(&itinerary, graph)?;
        let multi_stop = itinerary.is_multi_stop();
        let first = graph.edge(itinerary.legs[0]);
        let class_cfg = config.class(class);

        let kind = match class {
            VehicleClass::Train => VehicleKind::Train(TrainState {
                wagons: config.train_extra.wagons_for(first.distance),
            }),
            VehicleClass::Boat => VehicleKind::Boat,
            VehicleClass::Plane => VehicleKind::Plane(PlaneState::new(
                FlightProfile::for_distance(first.distance, &config.plane_extra),
                rng.vehicle_rng(id),
            )),
        };

        Ok(Self {
            id,
            class,
            legs: itinerary.legs,
            leg_index: 0,
            progress: 0.0,
            speed: class_cfg.progress_speed(first.distance),
            ticks_on_leg: 0,
            state: VehicleState::Spawned,
            multi_stop,
            spawned_at: now,
            trail: TrailTimer::new(class_cfg.trail_interval_ticks),
            kind,
        })
    }

    #[inline]
    pub fn current_edge(&self) -> EdgeId {
        self.legs[self.leg_index]
    }

    #[inline]
    pub fn next_edge(&self) -> Option<EdgeId> {
        self.legs.get(self.leg_index + 1).copied()
    }

    #[inline]
    pub fn is_last_leg(&self) -> bool {
        self.leg_index + 1 >= self.legs.len()
    }

    /// Legs after the current one.
    #[inline]
    pub fn remaining_legs(&self) -> usize {
        self.legs.len() - self.leg_index - 1
    }

    pub fn current<'g>(&self, graph: &'g RouteGraph) -> &'g RouteEdge {
        graph.edge(self.current_edge())
    }

    /// Start of the current leg.
    pub fn origin(&self, graph: &RouteGraph) -> LocationId {
        self.current(graph).from
    }

    /// End of the current leg.
    pub fn destination(&self, graph: &RouteGraph) -> LocationId {
        self.current(graph).to
    }

    /// Last stop of the whole itinerary.
    pub fn final_stop(&self, graph: &RouteGraph) -> LocationId {
        self.legs.last().map_or(LocationId::INVALID, |&e| graph.edge(e).to)
    }

    pub fn wagons(&self) -> u8 {
        match &self.kind {
            VehicleKind::Train(t) => t.wagons,
            _ => 0,
        }
    }

    /// Move onto the next leg.  The caller must already hold its segment.
    pub(crate) fn advance_leg(&mut self, graph: &RouteGraph, config: &TransportConfig) {
        self.leg_index += 1;
        self.progress = 0.0;
        self.ticks_on_leg = 0;
        self.speed = config.class(self.class).progress_speed(self.current(graph).distance);
        self.state = VehicleState::Transitioning;
    }

    /// One advancing tick.  Progress is derived from the tick count so a leg
    /// takes exactly [`ticks_to_cover`] ticks whatever the rounding of `speed`.
    pub(crate) fn advance_progress(&mut self) {
        self.ticks_on_leg = self.ticks_on_leg.saturating_add(1);
        self.progress = if self.ticks_on_leg >= ticks_to_cover(self.speed) {
            1.0
        } else {
            (self.ticks_on_leg as f32 * self.speed).min(1.0)
        };
    }

    /// Drop every leg after the current one and continue on `detour`.
    pub(crate) fn replace_tail(&mut self, detour: Vec<EdgeId>) {
        self.legs.truncate(self.leg_index + 1);
        self.legs.extend(detour);
    }
}

/// Advancing ticks needed to finish a leg at `speed`: `ceil(1 / speed)`.
///
/// `1 / speed` is inexact for speeds like 0.01 or 1/3, so a sliver is shaved
/// off before rounding up.
pub fn ticks_to_cover(speed: f32) -> u32 {
    ((1.0 / speed) - 1e-4).ceil().max(1.0) as u32
}

fn validate_itinerary(itinerary: &Itinerary, graph: &RouteGraph) -> MobilityResult<()> {
    if itinerary.is_empty() {
        return Err(MobilityError::EmptyItinerary);
    }
    if let Some(&bad) = itinerary.legs.iter().find(|e| e.index() >= graph.edge_count()) {
        return Err(MobilityError::UnknownEdge(bad));
    }
    if let Some(at) = itinerary
        .legs
        .windows(2)
        .position(|w| graph.edge(w[0]).to != graph.edge(w[1]).from)
    {
        return Err(MobilityError::Disconnected { at });
    }
    Ok(())
}
