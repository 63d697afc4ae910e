//! Occupant handles and the `OccupiesCell` capability.
//!
//! The grid never stores agents themselves, only small `Copy` handles.  Code
//! that needs to know "is there a vehicle here?" asks the grid, never the
//! concrete agent type, so vehicle logic and light logic stay independent of
//! each other.

use ct_core::{Coord, LightId, VehicleId};

/// What kind of agent an occupant handle refers to.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum AgentKind {
    Vehicle,
    TrafficLight,
}

/// A handle stored in a grid cell's occupant list.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Occupant {
    Vehicle(VehicleId),
    Light(LightId),
}

impl Occupant {
    #[inline]
    pub fn kind(self) -> AgentKind {
        match self {
            Occupant::Vehicle(_) => AgentKind::Vehicle,
            Occupant::Light(_)   => AgentKind::TrafficLight,
        }
    }
}

/// Capability shared by every agent that sits on the grid.
///
/// Implemented by `ct_agent::Vehicle` and `ct_agent::TrafficLight`; the grid
/// uses it to place agents without naming their concrete types.
pub trait OccupiesCell {
    /// The cell the agent currently occupies.
    fn cell(&self) -> Coord;

    /// The handle stored in the grid for this agent.
    fn occupant(&self) -> Occupant;

    #[inline]
    fn kind(&self) -> AgentKind {
        self.occupant().kind()
    }
}
