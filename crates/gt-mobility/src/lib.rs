//! `gt-mobility`: vehicles, route reservations, and per-tick fleet advancement.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                      |
//! |-----------------|---------------------------------------------------------------|
//! | [`reservation`] | `ReservationTable`, `SegmentKey`: ownership-checked segments |
//! | [`state`]       | `VehicleState` lifecycle enum                                 |
//! | [`vehicle`]     | `Vehicle`, `VehicleKind`, `TrailTimer`                        |
//! | [`fleet`]       | `Fleet`: dense storage + the tick state machine              |
//! | [`pose`]        | `Frame`, `Pose`, surface-aligned curve sampling               |
//! | [`train`]       | Wagon spacing and wagon poses                                 |
//! | [`plane`]       | `FlightProfile`, banking, plane poses                         |
//! | [`error`]       | `MobilityError`, `MobilityResult<T>`                          |
//!
//! # Movement model
//!
//! Vehicles advance a normalised `progress ∈ [0, 1]` along the current leg
//! by a per-leg `speed` each tick.  Trains and boats hold a reservation on
//! the segment they occupy; at a leg boundary the finished segment is
//! released before the next one is claimed, so a vehicle holds at most one
//! segment at a time.  Planes never reserve.
//!
//! # Feature flags
//!
//! | Flag      | Effect                                         |
//! |-----------|------------------------------------------------|
//! | `fx-hash` | FxHash instead of SipHash for reservations.    |

pub mod error;
pub mod fleet;
pub mod plane;
pub mod pose;
pub mod reservation;
pub mod state;
pub mod train;
pub mod vehicle;


pub use error::{MobilityError, MobilityResult};
pub use fleet::{vehicle_pose, ContentionPolicy, Fleet, FleetContext, MobilityEvent, VehiclePose};
pub use plane::{plane_pose, FlightProfile, PlaneState};
pub use pose::{sample_edge, Frame, Pose};
pub use reservation::{ReservationTable, SegmentKey};
pub use state::VehicleState;
pub use train::{spacing_progress, wagon_poses, wagon_progress, TrainState};
pub use vehicle::{ticks_to_cover, TrailTimer, Vehicle, VehicleKind};
