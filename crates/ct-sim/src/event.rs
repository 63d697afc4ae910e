//! Per-tick events and summaries reported to observers.

use ct_agent::{BlockReason, LightChange};
use ct_core::{Coord, Direction, LightId, Tick, VehicleId};

/// One notable outcome inside a tick, in the order it happened.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TickEvent {
    /// A congestion watch opened or closed its direction.
    WatchToggled {
        cell:      Coord,
        direction: Direction,
        closed:    bool,
    },
    VehicleMoved {
        vehicle:   VehicleId,
        from:      Coord,
        to:        Coord,
        direction: Direction,
    },
    VehicleBlocked {
        vehicle: VehicleId,
        at:      Coord,
        reason:  BlockReason,
    },
    /// Trip finished.  Follows the `VehicleMoved` of the final move, if any.
    VehicleArrived {
        vehicle: VehicleId,
        at:      Coord,
    },
    /// A light turn changed a group's state.  `light` is the instance whose
    /// turn it was, which may belong to a different group than `change`.
    LightChanged {
        light:  LightId,
        change: LightChange,
    },
}

/// Counts for one completed tick.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct TickSummary {
    pub tick:            Tick,
    pub moved:           usize,
    pub blocked:         usize,
    pub arrived:         usize,
    pub light_changes:   usize,
    /// Vehicles still travelling after the tick.
    pub active_vehicles: usize,
}
