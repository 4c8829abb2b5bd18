//! Fluent builder for constructing a [`Sim`].

use gt_core::{SimConfig, SimRng, TransportConfig, VehicleClass};
use gt_orbit::OrbitEngine;
use gt_spatial::{ItineraryPlanner, RandomWalkPlanner, RouteGraph};

use crate::sim::{ClassRuntime, Sim, Visibility};
use crate::{SimError, SimResult};

/// Fluent builder for [`Sim<P>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: total ticks, seed, tick duration, snapshot interval
/// - [`TransportConfig`]: per-class tunables, validated in [`build`](Self::build)
///
/// # Optional inputs (have defaults)
///
/// | Method                  | Default                          |
/// |-------------------------|----------------------------------|
/// | `.graph(class, g)`      | `RouteGraph::empty()` per class  |
/// | `.planner(p)`           | `RandomWalkPlanner`              |
/// | `.spawners_running(b)`  | `true`                           |
/// | `.satellites(b)`        | `true` (standard population)     |
/// | `.visibility(v)`        | globe visible, transport active  |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, TransportConfig::default())
///     .graph(VehicleClass::Train, rail)
///     .graph(VehicleClass::Boat, sea)
///     .graph(VehicleClass::Plane, air)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<P: ItineraryPlanner = RandomWalkPlanner> {
    config:           SimConfig,
    transport:        TransportConfig,
    graphs:           [Option<RouteGraph>; 3],
    planner:          P,
    spawners_running: bool,
    satellites:       bool,
    visibility:       Visibility,
}

impl SimBuilder<RandomWalkPlanner> {
    pub fn new(config: SimConfig, transport: TransportConfig) -> Self {
        Self {
            config,
            transport,
            graphs:           [None, None, None],
            planner:          RandomWalkPlanner,
            spawners_running: true,
            satellites:       true,
            visibility:       Visibility::default(),
        }
    }
}

impl<P: ItineraryPlanner> SimBuilder<P> {
    /// Route graph for `class`.
    pub fn graph(mut self, class: VehicleClass, graph: RouteGraph) -> Self {
        self.graphs[class.index()] = Some(graph);
        self
    }

    /// Swap in a different itinerary planner.
    pub fn planner<Q: ItineraryPlanner>(self, planner: Q) -> SimBuilder<Q> {
        SimBuilder {
            config:           self.config,
            transport:        self.transport,
            graphs:           self.graphs,
            planner,
            spawners_running: self.spawners_running,
            satellites:       self.satellites,
            visibility:       self.visibility,
        }
    }

    /// Whether spawners start running at tick 0.
    pub fn spawners_running(mut self, running: bool) -> Self {
        self.spawners_running = running;
        self
    }

    /// Whether to populate the standard satellites.
    pub fn satellites(mut self, enabled: bool) -> Self {
        self.satellites = enabled;
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Validate the configuration, seed the RNG, populate satellites, and
    /// return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<P>> {
        self.transport.validate()?;
        if self.config.tick_duration_ms == 0 {
            return Err(SimError::Config("tick_duration_ms must be at least 1".into()));
        }

        let mut rng = SimRng::from_seed_opt(self.config.seed);
        let orbit = if self.satellites {
            OrbitEngine::populate(&self.transport.orbit, &mut rng.child(1))?
        } else {
            OrbitEngine::empty(&self.transport.orbit)
        };

        let [train, boat, plane] = self.graphs;
        let mut classes = Vec::with_capacity(3);
        for (class, graph) in VehicleClass::ALL.into_iter().zip([train, boat, plane]) {
            let graph = graph.unwrap_or_else(|| {
                log::info!("no {class} graph supplied; {class} spawner will stay idle");
                RouteGraph::empty()
            });
            classes.push(ClassRuntime::new(class, graph, &self.transport));
        }

        let mut sim = Sim {
            clock:        self.config.make_clock(),
            config:       self.config,
            transport:    self.transport,
            classes,
            orbit,
            planner:      self.planner,
            visibility:   self.visibility,
            totals:       Default::default(),
            rng,
            next_vehicle: 0,
            events:       Vec::new(),
        };
        if self.spawners_running {
            sim.start_all_spawners();
        }
        Ok(sim)
    }
}
