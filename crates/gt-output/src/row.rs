//! Plain data row types written by output backends.

use gt_mobility::VehiclePose;

/// One vehicle's pose at a snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleSnapshotRow {
    pub tick:           u64,
    pub vehicle_id:     u32,
    pub class:          &'static str,
    pub state:          &'static str,
    /// `None` while the body is hidden (invalid sample).
    pub position:       Option<[f32; 3]>,
    /// Quaternion `x, y, z, w`; `None` while hidden.
    pub rotation:       Option<[f32; 4]>,
    pub wagons_visible: u8,
}

impl VehicleSnapshotRow {
    pub fn from_pose(tick: u64, pose: &VehiclePose) -> Self {
        Self {
            tick,
            vehicle_id:     pose.id.0,
            class:          pose.class.as_str(),
            state:          pose.state.as_str(),
            position:       pose.body.map(|b| b.position.to_array()),
            rotation:       pose.body.map(|b| b.rotation.to_array()),
            wagons_visible: pose.wagons.iter().filter(|w| w.is_some()).count() as u8,
        }
    }
}

/// Summary statistics for one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:           u64,
    pub elapsed_ms:     u64,
    pub created:        u64,
    pub removed:        u64,
    pub rerouted:       u64,
    pub blocked:        u64,
    pub trail_requests: u64,
    pub active_trains:  u64,
    pub active_boats:   u64,
    pub active_planes:  u64,
    pub waiting:        u64,
    pub held_segments:  u64,
}
