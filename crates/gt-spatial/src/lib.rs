//! `gt-spatial`: route geometry, route graphs, and itinerary planning.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`curve`]   | `Curve` trait, `LineCurve`, `ArcCurve`, `CurveProvider`         |
//! | [`network`] | `RouteGraph` (CSR + R-tree), `RouteGraphBuilder`, `build_graph` |
//! | [`planner`] | `ItineraryPlanner` trait, `RandomWalkPlanner`, `Itinerary`      |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on location types.         |

pub mod curve;
pub mod error;
pub mod network;
pub mod planner;


pub use curve::{ArcCurve, ArcCurveProvider, Curve, CurveProvider, LineCurve};
pub use error::{SpatialError, SpatialResult};
pub use network::{build_graph, Location, LocationKind, RouteEdge, RouteGraph, RouteGraphBuilder};
pub use planner::{
    find_alternate_route, find_multi_stop_route, random_edge, Itinerary, ItineraryPlanner,
    RandomWalkPlanner,
};
