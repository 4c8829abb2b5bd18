//! `Fleet`: dense per-class vehicle storage and the per-tick state machine.
//!
//! # Tick order
//!
//! Every vehicle is stepped once per tick in insertion order:
//!
//! 1. `Completed` vehicles are skipped.
//! 2. `Spawned` vehicles become `EnRoute` without moving, so a vehicle is
//!    never rendered in the tick it was created.
//! 3. `Landed` planes count down their hold and then complete.
//! 4. A vehicle at the end of its leg (`progress >= 1.0`) runs the boundary
//!    handler: release the finished segment, then claim the next one, detour
//!    around it (trains), or wait.
//! 5. Anything else advances by `speed`, capped at `1.0`.
//!
//! Vehicles that completed are removed after the whole fleet has stepped,
//! so indices stay stable for the rest of the tick.

use glam::Vec3;
use gt_core::{EdgeId, LocationId, Tick, TransportConfig, VehicleClass, VehicleId};
use gt_spatial::{ItineraryPlanner, RouteGraph};

use crate::error::{MobilityError, MobilityResult};
use crate::plane::plane_pose;
use crate::pose::{sample_edge, Frame, Pose};
use crate::reservation::{ReservationTable, SegmentKey};
use crate::state::VehicleState;
use crate::train::wagon_poses;
use crate::vehicle::{Vehicle, VehicleKind};

/// What a vehicle does when the next segment is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentionPolicy {
    /// No reservations at all (planes).
    Unreserved,
    /// Wait at the stop until the segment frees up (boats).
    Wait,
    /// Try a detour of at most `max_hops` legs first, then wait (trains).
    RerouteOrWait { max_hops: usize },
}

impl ContentionPolicy {
    pub fn for_class(class: VehicleClass, config: &TransportConfig) -> Self {
        match class {
            VehicleClass::Train => Self::RerouteOrWait { max_hops: config.train_extra.alternate_max_hops },
            VehicleClass::Boat  => Self::Wait,
            VehicleClass::Plane => Self::Unreserved,
        }
    }

    #[inline]
    pub fn reserves(self) -> bool {
        !matches!(self, Self::Unreserved)
    }
}

/// Lifecycle notifications produced while stepping a fleet.
#[derive(Debug, Clone, PartialEq)]
pub enum MobilityEvent {
    Created   { id: VehicleId, class: VehicleClass },
    Removed   { id: VehicleId, class: VehicleClass },
    /// The next leg was held; the rest of the itinerary was replaced by a
    /// detour of `detour_legs` legs to the same final stop.
    Rerouted  { id: VehicleId, detour_legs: usize },
    /// The vehicle started waiting for `blocked`.
    Blocked   { id: VehicleId, blocked: SegmentKey },
    /// The vehicle wants a trail particle at `position`.
    TrailSpawn { id: VehicleId, class: VehicleClass, position: Vec3, frame: Frame },
}

/// Renderable state of one vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct VehiclePose {
    pub id:     VehicleId,
    pub class:  VehicleClass,
    pub state:  VehicleState,
    /// `None` hides the body this tick.
    pub body:   Option<Pose>,
    /// Trains only; one entry per wagon.
    pub wagons: Vec<Option<Pose>>,
}

/// Everything a fleet needs from the outside for one tick.
pub struct FleetContext<'a, P: ItineraryPlanner + ?Sized> {
    pub now:          Tick,
    pub graph:        &'a RouteGraph,
    pub reservations: &'a mut ReservationTable,
    pub planner:      &'a P,
    pub config:       &'a TransportConfig,
    /// Trail requests are only emitted while the class is visible.
    pub visible:      bool,
}

/// All active vehicles of one class.
#[derive(Debug)]
pub struct Fleet {
    pub class:    VehicleClass,
    pub policy:   ContentionPolicy,
    pub vehicles: Vec<Vehicle>,
}

impl Fleet {
    pub fn new(class: VehicleClass, policy: ContentionPolicy) -> Self {
        Self { class, policy, vehicles: Vec::new() }
    }

    pub fn for_class(class: VehicleClass, config: &TransportConfig) -> Self {
        Self::new(class, ContentionPolicy::for_class(class, config))
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn get(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.iter()
    }

    pub fn waiting_count(&self) -> usize {
        self.vehicles.iter().filter(|v| v.state.is_waiting()).count()
    }

    /// Add `vehicle`, claiming its first segment if the class reserves.
    ///
    /// On error the vehicle is dropped and the table is unchanged.
    pub fn launch(
        &mut self,
        vehicle:      Vehicle,
        graph:        &RouteGraph,
        reservations: &mut ReservationTable,
        events:       &mut Vec<MobilityEvent>,
    ) -> MobilityResult<VehicleId> {
        if vehicle.class != self.class {
            return Err(MobilityError::ClassMismatch { vehicle: vehicle.class, expected: self.class });
        }
        let first = vehicle.current(graph);
        if self.policy.reserves() && !reservations.reserve(first.from, first.to, vehicle.id) {
            let key = SegmentKey::of_edge(first);
            let holder = reservations.holder(first.from, first.to).unwrap_or_default();
            return Err(MobilityError::SegmentHeld { key, holder });
        }

        log::debug!(
            "{} {} spawned on {} → {} ({} legs)",
            self.class,
            vehicle.id,
            graph.name(first.from),
            graph.name(first.to),
            vehicle.legs.len(),
        );
        let id = vehicle.id;
        events.push(MobilityEvent::Created { id, class: self.class });
        self.vehicles.push(vehicle);
        Ok(id)
    }

    /// Step every vehicle once, then drop the ones that completed.
    pub fn tick<P: ItineraryPlanner + ?Sized>(
        &mut self,
        ctx:    &mut FleetContext<'_, P>,
        events: &mut Vec<MobilityEvent>,
    ) {
        let policy = self.policy;
        for vehicle in &mut self.vehicles {
            step_vehicle(vehicle, policy, ctx, events);
        }

        let class = self.class;
        let graph = ctx.graph;
        let reservations = &mut *ctx.reservations;
        self.vehicles.retain(|v| {
            if !v.state.is_completed() {
                return true;
            }
            // Normally a no-op: the last segment was released at the boundary.
            let edge = graph.edge(v.current_edge());
            reservations.release(edge.from, edge.to, v.id);
            log::debug!("{class} {} removed after {} legs", v.id, v.legs.len());
            events.push(MobilityEvent::Removed { id: v.id, class });
            false
        });
    }

    /// Release every reservation and drop every vehicle.
    pub fn clear(&mut self, reservations: &mut ReservationTable, events: &mut Vec<MobilityEvent>) {
        for v in self.vehicles.drain(..) {
            reservations.release_all(v.id);
            events.push(MobilityEvent::Removed { id: v.id, class: self.class });
        }
    }

    /// Current poses of all rendered vehicles.
    pub fn poses(&self, graph: &RouteGraph, config: &TransportConfig) -> Vec<VehiclePose> {
        self.vehicles
            .iter()
            .filter(|v| v.state.is_rendered())
            .map(|v| vehicle_pose(v, graph, config))
            .collect()
    }
}

/// Renderable state of a single vehicle.
pub fn vehicle_pose(v: &Vehicle, graph: &RouteGraph, config: &TransportConfig) -> VehiclePose {
    let edge = v.current(graph);
    let bounds = &config.pose_bounds;
    let (body, wagons) = match &v.kind {
        VehicleKind::Train(t) => (
            sample_edge(edge, v.progress, bounds),
            wagon_poses(edge, v.progress, t.wagons, config.train_extra.wagon_spacing, bounds),
        ),
        VehicleKind::Boat => (sample_edge(edge, v.progress, bounds), Vec::new()),
        VehicleKind::Plane(p) => {
            let landed = matches!(v.state, VehicleState::Landed { .. });
            (plane_pose(edge, v.progress, p, landed, bounds), Vec::new())
        }
    };
    VehiclePose { id: v.id, class: v.class, state: v.state, body, wagons }
}

// ── State machine ─────────────────────────────────────────────────────────────

fn step_vehicle<P: ItineraryPlanner + ?Sized>(
    v:      &mut Vehicle,
    policy: ContentionPolicy,
    ctx:    &mut FleetContext<'_, P>,
    events: &mut Vec<MobilityEvent>,
) {
    match v.state {
        VehicleState::Completed => return,
        VehicleState::Spawned => {
            v.state = VehicleState::EnRoute;
            return;
        }
        VehicleState::Landed { remaining } => {
            v.state = match remaining {
                0 | 1 => VehicleState::Completed,
                n => VehicleState::Landed { remaining: n - 1 },
            };
            return;
        }
        _ => {}
    }

    if v.progress >= 1.0 {
        at_boundary(v, policy, ctx, events);
    } else {
        v.advance_progress();
        // Fast legs can jump the whole window; the leg end clears it too.
        let progress = v.progress;
        if v.state == VehicleState::Transitioning
            && progress > 0.1
            && (progress < 0.9 || progress >= 1.0)
        {
            v.state = VehicleState::EnRoute;
        }
        if let VehicleKind::Plane(p) = &mut v.kind {
            p.update_bank(&ctx.config.plane_extra);
        }
    }

    if ctx.visible && v.state == VehicleState::EnRoute && v.trail.is_due(ctx.now) {
        if let Some(pose) = vehicle_pose(v, ctx.graph, ctx.config).body {
            events.push(MobilityEvent::TrailSpawn {
                id:       v.id,
                class:    v.class,
                position: pose.position,
                frame:    pose.frame,
            });
            v.trail.mark(ctx.now);
        }
    }
}

fn at_boundary<P: ItineraryPlanner + ?Sized>(
    v:      &mut Vehicle,
    policy: ContentionPolicy,
    ctx:    &mut FleetContext<'_, P>,
    events: &mut Vec<MobilityEvent>,
) {
    if !policy.reserves() {
        let hold = ctx.config.plane_extra.landed_hold_ticks;
        v.state = if v.class == VehicleClass::Plane && hold > 0 {
            VehicleState::Landed { remaining: hold }
        } else {
            VehicleState::Completed
        };
        return;
    }

    let graph = ctx.graph;
    let done = v.current(graph);
    ctx.reservations.release(done.from, done.to, v.id);

    let Some(next_id) = v.next_edge() else {
        v.state = VehicleState::Completed;
        return;
    };
    let next = graph.edge(next_id);

    if ctx.reservations.reserve(next.from, next.to, v.id) {
        if v.state.is_waiting() {
            log::trace!("{} {} resumes after waiting", v.class, v.id);
        }
        v.advance_leg(graph, ctx.config);
        return;
    }

    if let ContentionPolicy::RerouteOrWait { max_hops } = policy {
        if let Some(detour) = find_detour(v, done.from, max_hops, ctx) {
            let first = graph.edge(detour[0]);
            if ctx.reservations.reserve(first.from, first.to, v.id) {
                log::debug!(
                    "{} {} rerouted at {} toward {} via {} legs",
                    v.class,
                    v.id,
                    graph.name(done.to),
                    graph.name(v.final_stop(graph)),
                    detour.len(),
                );
                events.push(MobilityEvent::Rerouted { id: v.id, detour_legs: detour.len() });
                v.replace_tail(detour);
                v.advance_leg(graph, ctx.config);
                return;
            }
        }
    }

    if !v.state.is_waiting() {
        let blocked = SegmentKey::of_edge(next);
        log::trace!("{} {} waiting for {blocked}", v.class, v.id);
        events.push(MobilityEvent::Blocked { id: v.id, blocked });
        v.state = VehicleState::Waiting { blocked, since: ctx.now };
    }
    v.progress = 1.0;
}

/// A free route from the current stop to the itinerary's final stop that
/// does not turn back to `came_from`.
fn find_detour<P: ItineraryPlanner + ?Sized>(
    v:         &Vehicle,
    came_from: LocationId,
    max_hops:  usize,
    ctx:       &FleetContext<'_, P>,
) -> Option<Vec<EdgeId>> {
    let graph = ctx.graph;
    let reservations = &*ctx.reservations;
    let id = v.id;
    let usable = |e: EdgeId| {
        let e = graph.edge(e);
        reservations.is_available_for(e.from, e.to, id)
    };
    ctx.planner
        .alternate(graph, v.destination(graph), v.final_stop(graph), Some(came_from), max_hops, &usable)
        .filter(|d| !d.is_empty())
}
