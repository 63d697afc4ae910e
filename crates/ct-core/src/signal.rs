//! Traffic-light state shared by the topology loader, agents, and snapshots.

/// The state of one traffic-light group.
///
/// `Idle` is the neutral state a light falls back to when nobody is waiting
/// in its monitored zone.  Vehicles treat it like `Green`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LightState {
    #[default]
    Red,
    Green,
    Idle,
}

impl LightState {
    /// `true` if a vehicle standing on the light's cell may advance.
    #[inline]
    pub fn is_go(self) -> bool {
        !matches!(self, LightState::Red)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LightState::Red   => "red",
            LightState::Green => "green",
            LightState::Idle  => "idle",
        }
    }
}

impl std::fmt::Display for LightState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
