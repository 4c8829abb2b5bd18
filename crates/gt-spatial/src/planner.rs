//! Itinerary planning: random multi-stop walks and alternate-route search.
//!
//! # Pluggability
//!
//! The simulation calls planning through the [`ItineraryPlanner`] trait, so
//! hosts can swap in smarter planners (weighted walks, scenic routes)
//! without touching the vehicle state machine.  The default
//! [`RandomWalkPlanner`] reproduces the classic behaviour: a uniformly random
//! walk with immediate-backtrack avoidance, and a hop-bounded breadth-first
//! detour search.
//!
//! Planning never fails loudly.  `None` means "fall back": spawn a
//! single-segment vehicle instead, or keep waiting at the current stop.

use std::collections::VecDeque;

use gt_core::{EdgeId, LocationId, SimRng};

use crate::network::RouteGraph;

// ── Itinerary ─────────────────────────────────────────────────────────────────

/// An ordered list of connected route edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Itinerary {
    pub legs: Vec<EdgeId>,
}

impl Itinerary {
    /// A one-leg itinerary.
    pub fn single(edge: EdgeId) -> Self {
        Self { legs: vec![edge] }
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// `true` for two or more legs.
    pub fn is_multi_stop(&self) -> bool {
        self.legs.len() >= 2
    }

    /// Every stop in visiting order, origin first.
    pub fn stops(&self, graph: &RouteGraph) -> Vec<LocationId> {
        let mut stops = Vec::with_capacity(self.legs.len() + 1);
        if let Some(&first) = self.legs.first() {
            stops.push(graph.edge(first).from);
        }
        stops.extend(self.legs.iter().map(|&e| graph.edge(e).to));
        stops
    }

    /// `true` if each leg starts where the previous one ended.
    pub fn is_connected(&self, graph: &RouteGraph) -> bool {
        self.legs
            .windows(2)
            .all(|w| graph.edge(w[0]).to == graph.edge(w[1]).from)
    }
}

// ── ItineraryPlanner trait ────────────────────────────────────────────────────

/// Pluggable itinerary planning.
pub trait ItineraryPlanner {
    /// Plan a multi-stop itinerary of up to `hop_count` legs.
    ///
    /// Returns `None` if no walk of at least two legs could be formed.
    fn multi_stop(&self, graph: &RouteGraph, hop_count: usize, rng: &mut SimRng) -> Option<Itinerary>;

    /// Find a detour from `from` to `to` that does not use the direct
    /// `from → to` edge, never enters `avoid_from`, uses at most `max_hops`
    /// edges, and only uses edges for which `usable` returns `true`.
    fn alternate(
        &self,
        graph:      &RouteGraph,
        from:       LocationId,
        to:         LocationId,
        avoid_from: Option<LocationId>,
        max_hops:   usize,
        usable:     &dyn Fn(EdgeId) -> bool,
    ) -> Option<Vec<EdgeId>>;
}

/// The default planner.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomWalkPlanner;

impl ItineraryPlanner for RandomWalkPlanner {
    fn multi_stop(&self, graph: &RouteGraph, hop_count: usize, rng: &mut SimRng) -> Option<Itinerary> {
        find_multi_stop_route(graph, hop_count, rng)
    }

    fn alternate(
        &self,
        graph:      &RouteGraph,
        from:       LocationId,
        to:         LocationId,
        avoid_from: Option<LocationId>,
        max_hops:   usize,
        usable:     &dyn Fn(EdgeId) -> bool,
    ) -> Option<Vec<EdgeId>> {
        find_alternate_route(graph, from, to, avoid_from, max_hops, usable)
    }
}

// ── Random walk ───────────────────────────────────────────────────────────────

/// Random walk of up to `hop_count` legs from a uniformly random location.
///
/// Each step picks uniformly among outgoing edges whose destination is not
/// the location just left, which rules out `A → B → A` but not longer
/// cycles.  The walk stops early at a dead end.
pub fn find_multi_stop_route(graph: &RouteGraph, hop_count: usize, rng: &mut SimRng) -> Option<Itinerary> {
    if hop_count < 2 || graph.is_empty() {
        return None;
    }

    let mut current = LocationId(rng.gen_range(0..graph.location_count() as u32));
    let mut previous: Option<LocationId> = None;
    let mut legs = Vec::with_capacity(hop_count);
    let mut candidates: Vec<EdgeId> = Vec::new();

    for _ in 0..hop_count {
        candidates.clear();
        candidates.extend(
            graph
                .out_edges(current)
                .filter(|&e| Some(graph.edge(e).to) != previous),
        );
        let Some(&edge) = rng.choose(&candidates) else {
            break;
        };
        legs.push(edge);
        previous = Some(current);
        current = graph.edge(edge).to;
    }

    (legs.len() >= 2).then_some(Itinerary { legs })
}

/// Pick a uniformly random edge for which `usable` holds, trying at most
/// `attempts` times.
pub fn random_edge(
    graph:    &RouteGraph,
    rng:      &mut SimRng,
    attempts: usize,
    usable:   impl Fn(EdgeId) -> bool,
) -> Option<EdgeId> {
    if graph.edge_count() == 0 {
        return None;
    }
    (0..attempts.max(1))
        .map(|_| EdgeId(rng.gen_range(0..graph.edge_count() as u32)))
        .find(|&e| usable(e))
}

// ── Alternate route ───────────────────────────────────────────────────────────

/// Hop-bounded breadth-first search for a detour (see
/// [`ItineraryPlanner::alternate`]).  Returns the shortest detour by hop
/// count; ties go to the earliest-inserted edges.
pub fn find_alternate_route(
    graph:      &RouteGraph,
    from:       LocationId,
    to:         LocationId,
    avoid_from: Option<LocationId>,
    max_hops:   usize,
    usable:     &dyn Fn(EdgeId) -> bool,
) -> Option<Vec<EdgeId>> {
    let n = graph.location_count();
    if from == to || max_hops == 0 || from.index() >= n || to.index() >= n {
        return None;
    }

    // prev_edge[v] = edge that first reached v; depth[v] = hops from `from`.
    let mut prev_edge = vec![EdgeId::INVALID; n];
    let mut depth     = vec![0usize; n];
    let mut visited   = vec![false; n];
    visited[from.index()] = true;
    if let Some(avoid) = avoid_from {
        if avoid.index() < n {
            visited[avoid.index()] = true;
        }
    }

    let mut queue = VecDeque::from([from]);
    while let Some(node) = queue.pop_front() {
        if depth[node.index()] >= max_hops {
            continue;
        }
        for edge in graph.out_edges(node) {
            let next = graph.edge(edge).to;
            // The direct hop is the one that is blocked.
            if node == from && next == to {
                continue;
            }
            if visited[next.index()] || !usable(edge) {
                continue;
            }
            visited[next.index()]   = true;
            prev_edge[next.index()] = edge;
            depth[next.index()]     = depth[node.index()] + 1;
            if next == to {
                return Some(reconstruct(graph, &prev_edge, to));
            }
            queue.push_back(next);
        }
    }
    None
}

fn reconstruct(graph: &RouteGraph, prev_edge: &[EdgeId], to: LocationId) -> Vec<EdgeId> {
    let mut edges = Vec::new();
    let mut cur = to;
    loop {
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        edges.push(e);
        cur = graph.edge(e).from;
    }
    edges.reverse();
    edges
}
