//! What one agent turn did.  Reported to the scheduler, never an error.

use ct_core::{Coord, Direction, GroupId, LightState};

/// Why an active vehicle stayed put.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum BlockReason {
    /// A red light stands on the vehicle's cell.
    Signal,
    /// The chosen destination already holds a vehicle.
    Occupied,
    /// No allowed direction survived the parking-rejection retry.
    NoLegalMove,
}

impl BlockReason {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockReason::Signal      => "signal",
            BlockReason::Occupied    => "occupied",
            BlockReason::NoLegalMove => "no_legal_move",
        }
    }
}

/// Result of one vehicle turn.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum VehicleTurn {
    /// Already arrived on an earlier tick.  Nothing happens.
    Inactive,
    /// Found itself at its destination at the start of the turn.
    Arrived,
    /// Advanced one cell.  `arrived` is set when the new cell ends the trip.
    Moved {
        from:      Coord,
        to:        Coord,
        direction: Direction,
        arrived:   bool,
    },
    Blocked(BlockReason),
}

impl VehicleTurn {
    /// `true` if this turn ended the vehicle's trip.
    #[inline]
    pub fn arrived(&self) -> bool {
        matches!(self, VehicleTurn::Arrived | VehicleTurn::Moved { arrived: true, .. })
    }
}

/// A group-wide light state transition made during one light turn.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct LightChange {
    pub group: GroupId,
    pub from:  LightState,
    pub to:    LightState,
}
