//! The global snapshot: where every vehicle is and what every light shows.
//!
//! # JSON form
//!
//! ```json
//! {"vehicles":[{"x":3,"y":0},{"x":5,"y":2}],"trafficLights":{"sema_0":"green"}}
//! ```
//!
//! Vehicles are listed in `VehicleId` order; arrived vehicles stay in the
//! list at their final cell.  Lights are keyed by group name.

use std::collections::BTreeMap;

use serde::Serialize;

use ct_core::{Coord, LightState};

/// Position of one vehicle.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize)]
pub struct VehiclePosition {
    pub x: i32,
    pub y: i32,
    /// Still travelling.  Not part of the JSON form.
    #[serde(skip)]
    pub active: bool,
}

impl VehiclePosition {
    #[inline]
    pub fn coord(&self) -> Coord {
        Coord::new(self.x, self.y)
    }
}

/// A read-only picture of the simulation at one moment.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub vehicles:       Vec<VehiclePosition>,
    pub traffic_lights: BTreeMap<String, LightState>,
}

impl Snapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
