//! Roster entries for the per-tick scheduler.

use ct_core::{LightId, VehicleId};

/// One entry in the shuffled per-tick roster.
///
/// The scheduler dispatches on the variant instead of inspecting agent types
/// at runtime.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum AgentRef {
    Vehicle(VehicleId),
    Light(LightId),
}

impl AgentRef {
    #[inline]
    pub fn is_vehicle(self) -> bool {
        matches!(self, AgentRef::Vehicle(_))
    }
}

impl From<VehicleId> for AgentRef {
    fn from(id: VehicleId) -> Self {
        AgentRef::Vehicle(id)
    }
}

impl From<LightId> for AgentRef {
    fn from(id: LightId) -> Self {
        AgentRef::Light(id)
    }
}
