//! Synthetic world shared by every run of the demo.
//!
//! Rail links join nearby cities, sea lanes join ports, and air routes
//! join airports across oceans.  Coordinates are rough real-world values.

use gt_core::GeoPoint;
use gt_spatial::{build_graph, ArcCurveProvider, Location, LocationKind, RouteGraph, SpatialResult};

pub const BODY_RADIUS: f32 = 100.0;

const CITIES: [(&str, f32, f32); 6] = [
    ("Paris",     48.86,   2.35),
    ("Lyon",      45.76,   4.84),
    ("Brussels",  50.85,   4.35),
    ("Frankfurt", 50.11,   8.68),
    ("Zurich",    47.38,   8.54),
    ("Milan",     45.46,   9.19),
];

const RAIL: [(&str, &str); 8] = [
    ("Paris", "Lyon"),
    ("Paris", "Brussels"),
    ("Brussels", "Frankfurt"),
    ("Paris", "Frankfurt"),
    ("Frankfurt", "Zurich"),
    ("Lyon", "Zurich"),
    ("Zurich", "Milan"),
    ("Lyon", "Milan"),
];

const PORTS: [(&str, f32, f32); 6] = [
    ("Rotterdam",  51.92,   4.48),
    ("Lisbon",     38.72,  -9.14),
    ("Dakar",      14.69, -17.44),
    ("New York",   40.71, -74.01),
    ("Halifax",    44.65, -63.57),
    ("Recife",     -8.05, -34.88),
];

const SEA: [(&str, &str); 7] = [
    ("Rotterdam", "Lisbon"),
    ("Lisbon", "Dakar"),
    ("Lisbon", "Halifax"),
    ("Halifax", "New York"),
    ("Dakar", "Recife"),
    ("Recife", "New York"),
    ("Rotterdam", "Halifax"),
];

const AIRPORTS: [(&str, f32, f32); 5] = [
    ("CDG",  49.01,    2.55),
    ("JFK",  40.64,  -73.78),
    ("GRU", -23.43,  -46.47),
    ("NRT",  35.77,  140.39),
    ("DXB",  25.25,   55.36),
];

const AIR: [(&str, &str); 7] = [
    ("CDG", "JFK"),
    ("CDG", "DXB"),
    ("JFK", "GRU"),
    ("GRU", "CDG"),
    ("DXB", "NRT"),
    ("NRT", "JFK"),
    ("DXB", "GRU"),
];

fn locations(raw: &[(&str, f32, f32)], kind: LocationKind) -> Vec<Location> {
    raw.iter()
        .map(|&(name, lat, lon)| Location::new(name, GeoPoint::new(lat, lon), kind))
        .collect()
}

/// Rail, sea and air graphs, in that order.
pub fn build_world() -> SpatialResult<[RouteGraph; 3]> {
    let rail = build_graph(
        &locations(&CITIES, LocationKind::City),
        &RAIL,
        &ArcCurveProvider::new(BODY_RADIUS, 0.3, 0.0),
    )?;
    let sea = build_graph(
        &locations(&PORTS, LocationKind::Port),
        &SEA,
        &ArcCurveProvider::new(BODY_RADIUS, 0.2, 0.0),
    )?;
    // Planes climb off the arc themselves; the curve only needs a little
    // bulge on long hauls.
    let air = build_graph(
        &locations(&AIRPORTS, LocationKind::Airport),
        &AIR,
        &ArcCurveProvider::new(BODY_RADIUS, 0.3, 1.5),
    )?;
    Ok([rail, sea, air])
}
