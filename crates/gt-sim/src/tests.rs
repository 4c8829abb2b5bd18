//! Integration tests for gt-sim.

use std::collections::HashSet;

use gt_core::{GeoPoint, SimConfig, SpeedBand, Tick, TransportConfig, VehicleClass, VehicleId};
use gt_mobility::VehiclePose;
use gt_orbit::SatellitePose;
use gt_spatial::{build_graph, ArcCurveProvider, Location, LocationKind, RouteGraph};

use crate::{NoopObserver, RunTotals, Sim, SimBuilder, SimObserver, TickStats};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(total_ticks: u64, seed: u64) -> SimConfig {
    SimConfig {
        total_ticks,
        seed:                  Some(seed),
        tick_duration_ms:      16,
        output_interval_ticks: total_ticks.max(1),
    }
}

/// Fast vehicles and frequent spawns so short runs see plenty of contention.
fn busy_transport() -> TransportConfig {
    let mut t = TransportConfig::default();
    for class in [&mut t.train, &mut t.boat, &mut t.plane] {
        class.speed_bands = vec![SpeedBand { max_distance: 1000.0, units_per_tick: 5.0 }];
        class.spawn_interval_ticks = 3;
        class.max_active = 6;
        class.trail_interval_ticks = 2;
    }
    t.train.multi_stop_probability = 0.8;
    t.boat.multi_stop_probability = 0.8;
    t.plane_extra.landed_hold_ticks = 5;
    t
}

/// Square A-B-C-D with a hub E connected to every corner.
fn world() -> RouteGraph {
    let loc = |name: &str, lat, lon| Location::new(name, GeoPoint::new(lat, lon), LocationKind::City);
    let locations = [
        loc("A", 0.0, 0.0),
        loc("B", 0.0, 20.0),
        loc("C", 20.0, 20.0),
        loc("D", 20.0, 0.0),
        loc("E", 10.0, 10.0),
    ];
    let routes = [
        ("A", "B"), ("B", "C"), ("C", "D"), ("D", "A"),
        ("A", "E"), ("B", "E"), ("C", "E"), ("D", "E"),
    ];
    build_graph(&locations, &routes, &ArcCurveProvider::new(100.0, 0.5, 2.0)).expect("valid world")
}

fn busy_sim(seed: u64) -> Sim {
    SimBuilder::new(test_config(10_000, seed), busy_transport())
        .graph(VehicleClass::Train, world())
        .graph(VehicleClass::Boat, world())
        .graph(VehicleClass::Plane, world())
        .build()
        .unwrap()
}

#[derive(Default)]
struct Recorder {
    created:   Vec<VehicleId>,
    removed:   Vec<VehicleId>,
    trails:    usize,
    snapshots: Vec<Tick>,
    stats:     Vec<TickStats>,
    ended:     Option<(Tick, RunTotals)>,
}

impl SimObserver for Recorder {
    fn on_tick_end(&mut self, _tick: Tick, stats: &TickStats) {
        self.stats.push(stats.clone());
    }

    fn on_vehicle_created(&mut self, _tick: Tick, id: VehicleId, _class: VehicleClass) {
        self.created.push(id);
    }

    fn on_vehicle_removed(&mut self, _tick: Tick, id: VehicleId, _class: VehicleClass) {
        self.removed.push(id);
    }

    fn on_trail_spawn(
        &mut self,
        _tick:     Tick,
        _id:       VehicleId,
        _class:    VehicleClass,
        _position: glam::Vec3,
        _frame:    &gt_mobility::Frame,
    ) {
        self.trails += 1;
    }

    fn on_snapshot(&mut self, tick: Tick, _v: &[VehiclePose], _s: &[SatellitePose]) {
        self.snapshots.push(tick);
    }

    fn on_sim_end(&mut self, final_tick: Tick, totals: &RunTotals) {
        self.ended = Some((final_tick, *totals));
    }
}

// ── SimBuilder ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::SimError;

    #[test]
    fn builds_with_defaults() {
        let transport = TransportConfig::default();
        let sim = SimBuilder::new(test_config(10, 1), transport.clone()).build().unwrap();
        assert_eq!(sim.classes.len(), 3);
        for class in VehicleClass::ALL {
            assert_eq!(sim.class(class).class, class);
            assert!(sim.class(class).graph.is_empty());
            assert!(sim.class(class).spawner.is_running());
        }
        assert_eq!(sim.orbit.len(), transport.orbit.small_count + 2);
    }

    #[test]
    fn satellites_and_spawners_can_be_disabled() {
        let sim = SimBuilder::new(test_config(10, 1), TransportConfig::default())
            .satellites(false)
            .spawners_running(false)
            .build()
            .unwrap();
        assert!(sim.orbit.is_empty());
        assert!(VehicleClass::ALL.iter().all(|&c| !sim.class(c).spawner.is_running()));
    }

    #[test]
    fn invalid_transport_config_errors() {
        let mut transport = TransportConfig::default();
        transport.plane.multi_stop_probability = 0.5;
        let result = SimBuilder::new(test_config(10, 1), transport).build();
        assert!(matches!(result, Err(SimError::Core(_))));
    }

    #[test]
    fn zero_tick_duration_errors() {
        let mut config = test_config(10, 1);
        config.tick_duration_ms = 0;
        let result = SimBuilder::new(config, TransportConfig::default()).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }
}

// ── Spawner & itinerary choice ────────────────────────────────────────────────

#[cfg(test)]
mod spawner_tests {
    use gt_core::{EdgeId, LocationId, SimRng};
    use gt_mobility::ReservationTable;
    use gt_spatial::{Itinerary, ItineraryPlanner, RandomWalkPlanner};

    use super::*;
    use crate::{plan_itinerary, Spawner};

    /// Hands back a multi-stop itinerary with no legs.
    struct EmptyWalkPlanner;

    impl ItineraryPlanner for EmptyWalkPlanner {
        fn multi_stop(&self, _graph: &RouteGraph, _hops: usize, _rng: &mut SimRng) -> Option<Itinerary> {
            Some(Itinerary { legs: Vec::new() })
        }

        fn alternate(
            &self,
            _graph:      &RouteGraph,
            _from:       LocationId,
            _to:         LocationId,
            _avoid_from: Option<LocationId>,
            _max_hops:   usize,
            _usable:     &dyn Fn(EdgeId) -> bool,
        ) -> Option<Vec<EdgeId>> {
            None
        }
    }

    #[test]
    fn poll_fires_on_interval_while_running() {
        let mut s = Spawner::new(VehicleClass::Boat, 3);
        assert!(!s.poll(Tick(3)));

        s.start(Tick(0));
        assert!(!s.poll(Tick(1)));
        assert!(s.poll(Tick(3)));
        assert!(!s.poll(Tick(4)));
        assert!(s.poll(Tick(6)));

        s.stop();
        assert!(!s.poll(Tick(9)));
    }

    #[test]
    fn zero_interval_is_raised_to_one() {
        let mut s = Spawner::new(VehicleClass::Train, 0);
        assert_eq!(s.interval(), 1);
        s.start(Tick(0));
        assert!(s.poll(Tick(1)));
        assert!(s.poll(Tick(2)));
    }

    #[test]
    fn certain_multi_stop_gives_connected_walk() {
        let g = world();
        let mut cfg = busy_transport().train;
        cfg.multi_stop_probability = 1.0;
        let table = ReservationTable::new();
        let mut rng = SimRng::new(5);
        for _ in 0..50 {
            let it = plan_itinerary(VehicleClass::Train, &cfg, &g, &table, &RandomWalkPlanner, &mut rng).unwrap();
            assert!(it.is_multi_stop());
            assert!(it.is_connected(&g));
            assert!(it.len() <= cfg.max_hops);
        }
    }

    #[test]
    fn empty_multi_stop_walk_falls_back_to_a_single_leg() {
        let g = world();
        let mut cfg = busy_transport().train;
        cfg.multi_stop_probability = 1.0;
        let table = ReservationTable::new();
        let mut rng = SimRng::new(5);
        for _ in 0..20 {
            let it = plan_itinerary(VehicleClass::Train, &cfg, &g, &table, &EmptyWalkPlanner, &mut rng).unwrap();
            assert_eq!(it.len(), 1);
        }
    }

    #[test]
    fn planes_get_single_legs() {
        let g = world();
        let cfg = busy_transport().plane;
        let table = ReservationTable::new();
        let mut rng = SimRng::new(5);
        for _ in 0..20 {
            let it = plan_itinerary(VehicleClass::Plane, &cfg, &g, &table, &RandomWalkPlanner, &mut rng).unwrap();
            assert_eq!(it.len(), 1);
        }
    }

    #[test]
    fn fully_reserved_graph_yields_nothing() {
        let g = world();
        let cfg = busy_transport().boat;
        let mut table = ReservationTable::new();
        for e in &g.edges {
            table.reserve(e.from, e.to, VehicleId(999));
        }
        let mut rng = SimRng::new(5);
        for _ in 0..20 {
            assert!(plan_itinerary(VehicleClass::Boat, &cfg, &g, &table, &RandomWalkPlanner, &mut rng).is_none());
        }
    }

    #[test]
    fn empty_graph_yields_nothing() {
        let cfg = busy_transport().train;
        let mut rng = SimRng::new(5);
        let it = plan_itinerary(
            VehicleClass::Train, &cfg, &RouteGraph::empty(), &ReservationTable::new(), &RandomWalkPlanner, &mut rng,
        );
        assert!(it.is_none());
    }
}

// ── Tick loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tick_tests {
    use assert_approx_eq::assert_approx_eq;
    use gt_spatial::Itinerary;

    use super::*;
    use crate::SimError;

    #[test]
    fn reservations_stay_exclusive_over_a_long_run() {
        let mut sim = busy_sim(42);
        for _ in 0..1500 {
            sim.step(&mut NoopObserver);
            for class in [VehicleClass::Train, VehicleClass::Boat] {
                let rt = sim.class(class);
                for v in rt.fleet.iter() {
                    let held = rt.reservations.held_by(v.id);
                    assert!(held.len() <= 1, "{} holds {held:?}", v.id);
                    if v.state.is_moving() {
                        let e = v.current(&rt.graph);
                        assert_eq!(rt.reservations.holder(e.from, e.to), Some(v.id));
                    }
                }
                assert!(rt.reservations.held_count() <= rt.fleet.len());
            }
            assert_eq!(sim.class(VehicleClass::Plane).reservations.entry_count(), 0);
        }
        assert!(sim.totals.created > 0);
    }

    #[test]
    fn progress_is_bounded() {
        let mut sim = busy_sim(3);
        for _ in 0..400 {
            sim.step(&mut NoopObserver);
            for rt in &sim.classes {
                assert!(rt.fleet.iter().all(|v| (0.0..=1.0).contains(&v.progress)));
            }
        }
    }

    #[test]
    fn same_seed_same_run() {
        let mut a = busy_sim(7);
        let mut b = busy_sim(7);
        let mut ra = Recorder::default();
        let mut rb = Recorder::default();
        a.run_ticks(500, &mut ra).unwrap();
        b.run_ticks(500, &mut rb).unwrap();
        assert_eq!(ra.stats, rb.stats);
        assert_eq!(ra.created, rb.created);
        assert_eq!(a.vehicle_poses(), b.vehicle_poses());
        assert_eq!(a.satellite_poses(), b.satellite_poses());
    }

    #[test]
    fn satellites_stay_on_their_orbit_radius() {
        let mut sim = busy_sim(17);
        sim.run_ticks(250, &mut NoopObserver).unwrap();
        let poses = sim.satellite_poses();
        assert_eq!(poses.len(), sim.orbit.len());
        assert!(!poses.is_empty());
        for (sat, pose) in sim.orbit.satellites().iter().zip(&poses) {
            assert_eq!(sat.id, pose.id);
            assert_approx_eq!(pose.position.length(), sat.orbit_radius, 1e-2);
        }
    }

    #[test]
    fn population_cap_is_respected() {
        let mut sim = busy_sim(11);
        let mut rec = Recorder::default();
        sim.run_ticks(600, &mut rec).unwrap();
        for s in &rec.stats {
            for class in VehicleClass::ALL {
                assert!(s.active[class.index()] <= sim.transport.class(class).max_active);
            }
        }
    }

    #[test]
    fn vehicle_ids_are_unique_across_classes() {
        let mut sim = busy_sim(13);
        let mut rec = Recorder::default();
        sim.run_ticks(600, &mut rec).unwrap();
        let unique: HashSet<_> = rec.created.iter().collect();
        assert_eq!(unique.len(), rec.created.len());
        assert!(!rec.created.is_empty());
    }

    #[test]
    fn stopped_spawners_let_traffic_drain() {
        let mut sim = busy_sim(21);
        let mut rec = Recorder::default();
        sim.run_ticks(300, &mut rec).unwrap();
        sim.stop_all_spawners();
        sim.run_ticks(3000, &mut rec).unwrap();
        assert_eq!(sim.active_count(), 0);
        assert_eq!(sim.totals.created, sim.totals.removed);
        assert_eq!(rec.created.len(), rec.removed.len());
        for rt in &sim.classes {
            assert_eq!(rt.reservations.held_count(), 0);
        }
    }

    #[test]
    fn clear_vehicles_releases_everything() {
        let mut sim = busy_sim(8);
        let mut rec = Recorder::default();
        sim.run_ticks(200, &mut rec).unwrap();
        assert!(sim.active_count() > 0);

        sim.clear_vehicles();
        assert_eq!(sim.active_count(), 0);
        for rt in &sim.classes {
            assert_eq!(rt.reservations.held_count(), 0);
        }
        sim.stop_all_spawners();
        sim.step(&mut rec);
        assert_eq!(rec.created.len(), rec.removed.len());
    }

    #[test]
    fn hidden_globe_pauses_spawning_and_trails_but_not_motion() {
        let mut sim = busy_sim(5);
        sim.set_globe_visible(false);
        let g = &sim.class(VehicleClass::Boat).graph;
        let e = g.find_edge(g.location_by_name("A").unwrap(), g.location_by_name("B").unwrap()).unwrap();
        let id = sim.launch(VehicleClass::Boat, Itinerary::single(e)).unwrap();

        let mut rec = Recorder::default();
        sim.run_ticks(5, &mut rec).unwrap();
        assert_eq!(rec.created, vec![id]);
        assert_eq!(rec.trails, 0);
        assert!(sim.class(VehicleClass::Boat).fleet.get(id).unwrap().progress > 0.0);

        sim.set_globe_visible(true);
        sim.run_ticks(5, &mut rec).unwrap();
        assert!(rec.trails > 0);
    }

    #[test]
    fn inactive_transport_pauses_spawning() {
        let mut sim = busy_sim(5);
        sim.set_transport_active(false);
        let mut rec = Recorder::default();
        sim.run_ticks(100, &mut rec).unwrap();
        assert!(rec.created.is_empty());
    }

    #[test]
    fn launch_on_held_segment_fails() {
        let mut sim = SimBuilder::new(test_config(100, 1), busy_transport())
            .graph(VehicleClass::Train, world())
            .spawners_running(false)
            .build()
            .unwrap();
        let g = &sim.class(VehicleClass::Train).graph;
        let (a, b) = (g.location_by_name("A").unwrap(), g.location_by_name("B").unwrap());
        let (ab, ba) = (g.find_edge(a, b).unwrap(), g.find_edge(b, a).unwrap());

        let first = sim.launch(VehicleClass::Train, Itinerary::single(ab)).unwrap();
        let err = sim.launch(VehicleClass::Train, Itinerary::single(ba)).unwrap_err();
        assert!(matches!(err, SimError::Mobility(_)));
        assert_eq!(sim.class(VehicleClass::Train).reservations.holder(a, b), Some(first));
    }

    #[test]
    fn run_reports_snapshots_and_end() {
        let mut config = test_config(30, 9);
        config.output_interval_ticks = 10;
        let mut sim = SimBuilder::new(config, busy_transport())
            .graph(VehicleClass::Boat, world())
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        sim.run(&mut rec).unwrap();

        assert_eq!(rec.snapshots, vec![Tick(0), Tick(10), Tick(20)]);
        assert_eq!(rec.stats.len(), 30);
        let (end, totals) = rec.ended.unwrap();
        assert_eq!(end, Tick(30));
        assert_eq!(totals.ticks, 30);
        assert_eq!(totals.created as usize, rec.created.len());
    }

    #[test]
    fn orbit_controls_pass_through() {
        let mut sim = busy_sim(1);
        sim.set_marker_on_screen(true);
        sim.set_hovered(true);
        let m = sim.orbit.modifier();
        assert!(m.marker_on_screen && m.hovered);
    }

    #[test]
    fn spawned_event_counts_match_stats() {
        let mut sim = busy_sim(17);
        let mut rec = Recorder::default();
        sim.run_ticks(400, &mut rec).unwrap();
        let created: usize = rec.stats.iter().map(|s| s.created).sum();
        let removed: usize = rec.stats.iter().map(|s| s.removed).sum();
        assert_eq!(created, rec.created.len());
        assert_eq!(removed, rec.removed.len());
        let last = rec.stats.last().unwrap();
        assert_eq!(last.total_active(), sim.active_count());
    }
}
