//! Route graph representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `LocationId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edges[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Edges are sorted (stably) by source location and indexed by `EdgeId`, so
//! a location's outgoing edges are a contiguous scan in insertion order.
//!
//! # Shared geometry
//!
//! A bidirectional route stores ONE curve.  The forward edge walks it from
//! `t = 0` to `t = 1`; the reverse edge shares the same `Arc<dyn Curve>` and
//! is flagged `needs_reverse`, so [`RouteEdge::point_at`] samples it at
//! `1 - t` and flips the tangent.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest `LocationId`,
//! used to snap clicked globe positions to a city/port/airport.

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec3;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use gt_core::{EdgeId, GeoPoint, LocationId};

use crate::curve::{Curve, CurveProvider};
use crate::{SpatialError, SpatialResult};

// ── Location ──────────────────────────────────────────────────────────────────

/// What kind of place a location is.  Informational; each vehicle class gets
/// its own graph anyway.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LocationKind {
    City,
    Port,
    Airport,
}

/// A named point on the globe.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub name: String,
    pub pos:  GeoPoint,
    pub kind: LocationKind,
}

impl Location {
    pub fn new(name: impl Into<String>, pos: GeoPoint, kind: LocationKind) -> Self {
        Self { name: name.into(), pos, kind }
    }
}

// ── RouteEdge ─────────────────────────────────────────────────────────────────

/// A directed route between two locations.
#[derive(Clone, Debug)]
pub struct RouteEdge {
    pub from:  LocationId,
    pub to:    LocationId,
    pub curve: Arc<dyn Curve>,
    /// Arc length of `curve`, measured once at build time.
    pub distance: f32,
    /// `true` if this edge walks `curve` backwards.
    pub needs_reverse: bool,
}

impl RouteEdge {
    /// Position at progress `t`, clamped to `[0, 1]`, in travel direction.
    pub fn point_at(&self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        if self.needs_reverse {
            self.curve.point_at(1.0 - t)
        } else {
            self.curve.point_at(t)
        }
    }

    /// Direction of travel at progress `t`.
    pub fn tangent_at(&self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        if self.needs_reverse {
            -self.curve.tangent_at(1.0 - t)
        } else {
            self.curve.tangent_at(t)
        }
    }
}

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone)]
struct LocationEntry {
    point: [f32; 2], // [lat, lon]
    id:    LocationId,
}

impl RTreeObject for LocationEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for LocationEntry {
    /// Squared Euclidean distance in lat/lon space.  Good enough to pick the
    /// nearest of a few hundred well-separated locations.
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── RouteGraph ────────────────────────────────────────────────────────────────

/// Directed route multigraph in CSR format plus a spatial index.
///
/// Read-only once built; share it by reference (or `Arc`) between the
/// spawner, the planner and the fleet.  Construct via [`RouteGraphBuilder`]
/// or [`build_graph`].
pub struct RouteGraph {
    /// Location records, indexed by `LocationId`.
    pub locations: Vec<Location>,

    /// CSR row pointer.  Length = `location_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Edge records, indexed by `EdgeId`, sorted by source location.
    pub edges: Vec<RouteEdge>,

    name_index:  HashMap<String, LocationId>,
    spatial_idx: RTree<LocationEntry>,
}

impl RouteGraph {
    /// A graph with no locations.  Spawners on an empty graph never spawn.
    pub fn empty() -> Self {
        RouteGraphBuilder::new().build()
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(id.index())
    }

    /// Location name, or `"?"` for an unknown id (logging helper).
    pub fn name(&self, id: LocationId) -> &str {
        self.location(id).map_or("?", |l| l.name.as_str())
    }

    pub fn location_by_name(&self, name: &str) -> Option<LocationId> {
        self.name_index.get(name).copied()
    }

    /// The edge record for `id`.
    ///
    /// # Panics
    /// Panics if `id` did not come from this graph.
    #[inline]
    pub fn edge(&self, id: EdgeId) -> &RouteEdge {
        &self.edges[id.index()]
    }

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    /// Empty for ids outside the graph.
    #[inline]
    pub fn out_edges(&self, node: LocationId) -> impl Iterator<Item = EdgeId> + '_ {
        let (start, end) = self.out_range(node);
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: LocationId) -> usize {
        let (start, end) = self.out_range(node);
        end - start
    }

    /// First edge `from → to`, if any.
    pub fn find_edge(&self, from: LocationId, to: LocationId) -> Option<EdgeId> {
        self.out_edges(from).find(|&e| self.edge(e).to == to)
    }

    /// Nearest location to `pos`, or `None` for an empty graph.
    pub fn snap_to_location(&self, pos: GeoPoint) -> Option<LocationId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|e| e.id)
    }

    fn out_range(&self, node: LocationId) -> (usize, usize) {
        let n = node.index();
        if n + 1 >= self.node_out_start.len() {
            return (0, 0);
        }
        (self.node_out_start[n] as usize, self.node_out_start[n + 1] as usize)
    }
}

impl std::fmt::Debug for RouteGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteGraph")
            .field("locations", &self.locations.len())
            .field("edges", &self.edges.len())
            .finish()
    }
}

// ── RouteGraphBuilder ─────────────────────────────────────────────────────────

/// Construct a [`RouteGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use glam::Vec3;
/// use gt_core::GeoPoint;
/// use gt_spatial::{LineCurve, LocationKind, RouteGraphBuilder};
///
/// let mut b = RouteGraphBuilder::new();
/// let a = b.add_location("A", GeoPoint::new(0.0, 0.0), LocationKind::City);
/// let c = b.add_location("C", GeoPoint::new(0.0, 1.0), LocationKind::City);
/// b.add_route(a, c, Arc::new(LineCurve::new(Vec3::ZERO, Vec3::X)));
/// let g = b.build();
/// assert_eq!(g.edge_count(), 2); // forward + shared-geometry reverse
/// ```
#[derive(Default)]
pub struct RouteGraphBuilder {
    locations: Vec<Location>,
    names:     HashMap<String, LocationId>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:          LocationId,
    to:            LocationId,
    curve:         Arc<dyn Curve>,
    needs_reverse: bool,
}

impl RouteGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a location and return its `LocationId` (sequential from 0).
    ///
    /// Names are unique: adding an existing name returns the existing id.
    pub fn add_location(
        &mut self,
        name: impl Into<String>,
        pos:  GeoPoint,
        kind: LocationKind,
    ) -> LocationId {
        let name = name.into();
        if let Some(&id) = self.names.get(&name) {
            log::warn!("duplicate location {name:?}; keeping the first definition");
            return id;
        }
        let id = LocationId(self.locations.len() as u32);
        self.names.insert(name.clone(), id);
        self.locations.push(Location { name, pos, kind });
        id
    }

    pub fn location_id(&self, name: &str) -> Option<LocationId> {
        self.names.get(name).copied()
    }

    /// Add a **directed** edge walking `curve` forwards.
    pub fn add_directed_route(&mut self, from: LocationId, to: LocationId, curve: Arc<dyn Curve>) {
        self.raw_edges.push(RawEdge { from, to, curve, needs_reverse: false });
    }

    /// Add edges in **both directions** sharing one curve.  The `b → a` edge
    /// is marked `needs_reverse`.
    pub fn add_route(&mut self, a: LocationId, b: LocationId, curve: Arc<dyn Curve>) {
        self.raw_edges.push(RawEdge { from: a, to: b, curve: Arc::clone(&curve), needs_reverse: false });
        self.raw_edges.push(RawEdge { from: b, to: a, curve, needs_reverse: true });
    }

    /// Add a bidirectional route between two named locations, asking
    /// `provider` for the geometry.
    pub fn add_route_by_name(
        &mut self,
        provider: &dyn CurveProvider,
        a:        &str,
        b:        &str,
    ) -> SpatialResult<()> {
        let ia = self.location_id(a).ok_or_else(|| SpatialError::UnknownLocation(a.to_owned()))?;
        let ib = self.location_id(b).ok_or_else(|| SpatialError::UnknownLocation(b.to_owned()))?;
        if ia == ib {
            return Err(SpatialError::SelfLoop(a.to_owned()));
        }
        let curve = provider
            .curve_between(&self.locations[ia.index()], &self.locations[ib.index()])
            .ok_or_else(|| SpatialError::NoCurve { from: a.to_owned(), to: b.to_owned() })?;
        self.add_route(ia, ib, curve);
        Ok(())
    }

    pub fn location_count(&self) -> usize { self.locations.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`RouteGraph`].
    ///
    /// Edge distances are measured here, once per edge.
    pub fn build(self) -> RouteGraph {
        let node_count = self.locations.len();

        // Stable sort keeps per-location insertion order deterministic.
        let mut raw = self.raw_edges;
        raw.retain(|e| e.from.index() < node_count && e.to.index() < node_count);
        raw.sort_by_key(|e| e.from.0);

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }

        let edges: Vec<RouteEdge> = raw
            .into_iter()
            .map(|e| RouteEdge {
                from:          e.from,
                to:            e.to,
                distance:      e.curve.length(),
                curve:         e.curve,
                needs_reverse: e.needs_reverse,
            })
            .collect();
        debug_assert_eq!(node_out_start[node_count] as usize, edges.len());

        let entries: Vec<LocationEntry> = self
            .locations
            .iter()
            .enumerate()
            .map(|(i, l)| LocationEntry {
                point: [l.pos.lat, l.pos.lon],
                id:    LocationId(i as u32),
            })
            .collect();

        RouteGraph {
            locations:   self.locations,
            node_out_start,
            edges,
            name_index:  self.names,
            spatial_idx: RTree::bulk_load(entries),
        }
    }
}

/// Build a graph from a location list and named bidirectional routes.
pub fn build_graph(
    locations: &[Location],
    routes:    &[(&str, &str)],
    provider:  &dyn CurveProvider,
) -> SpatialResult<RouteGraph> {
    let mut b = RouteGraphBuilder::new();
    for l in locations {
        b.add_location(l.name.clone(), l.pos, l.kind);
    }
    for (from, to) in routes {
        b.add_route_by_name(provider, from, to)?;
    }
    Ok(b.build())
}
