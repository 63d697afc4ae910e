//! Plain data row types written by output backends.

use ct_core::LightState;

/// One vehicle's position at a snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleSnapshotRow {
    pub tick:       u64,
    pub vehicle_id: u32,
    pub x:          i32,
    pub y:          i32,
    /// `false` once the vehicle has arrived.
    pub active:     bool,
}

/// One light group's state at a snapshot tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightSnapshotRow {
    pub tick:  u64,
    /// Group name, e.g. `sema_0`.
    pub light: String,
    pub state: LightState,
}

/// Counts for one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:            u64,
    pub moved:           u64,
    pub blocked:         u64,
    pub arrived:         u64,
    pub light_changes:   u64,
    pub active_vehicles: u64,
}
