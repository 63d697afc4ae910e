//! Read-only inputs handed to navigation policies and vehicle turns.

use ct_core::{Coord, DirectionSet, LightId, LightState, VehicleId};
use ct_grid::Grid;

/// Everything a [`NavigationPolicy`][crate::NavigationPolicy] may look at
/// when picking a direction.
///
/// Built fresh for every choice, so `candidates` already reflects any
/// directions the parking-rejection retry has removed.
pub struct NavContext<'a> {
    pub vehicle:    VehicleId,
    /// The vehicle's current cell.
    pub cell:       Coord,
    /// The vehicle's target parking cell.
    pub target:     Coord,
    /// Directions still on the table.  Never empty when a policy is called.
    pub candidates: DirectionSet,
    /// Live grid, as updated by earlier turns this tick.
    pub grid:       &'a Grid,
}

/// Read access to light state, keyed by light instance.
///
/// Implemented by [`LightPool`][crate::LightPool]; vehicle turns are generic
/// over it so vehicle logic never depends on how lights are stored.
pub trait SignalView {
    fn state_of(&self, light: LightId) -> LightState;
}

/// No lights anywhere.  Every lookup answers `Idle`.
impl SignalView for () {
    fn state_of(&self, _light: LightId) -> LightState {
        LightState::Idle
    }
}
