//! Vehicle class enum shared across the mobility and simulation crates.

/// The class of a route-following vehicle.
///
/// Each class has its own route graph, reservation table, fleet and spawner.
/// Satellites are not a `VehicleClass`: they live in the orbit engine.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VehicleClass {
    Train,
    Boat,
    Plane,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 3] = [VehicleClass::Train, VehicleClass::Boat, VehicleClass::Plane];

    /// `true` if vehicles of this class contend for route segments.
    #[inline]
    pub fn uses_reservations(self) -> bool {
        !matches!(self, VehicleClass::Plane)
    }

    /// Dense index for per-class arrays.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            VehicleClass::Train => 0,
            VehicleClass::Boat  => 1,
            VehicleClass::Plane => 2,
        }
    }

    /// Human-readable label, useful for CSV column values.
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleClass::Train => "train",
            VehicleClass::Boat  => "boat",
            VehicleClass::Plane => "plane",
        }
    }
}

impl std::fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
