//! `ct-core` — foundational types for the `rust_ct` grid traffic simulator.
//!
//! This crate is a dependency of every other `ct-*` crate.  It has no `ct-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `VehicleId`, `LightId`, `GroupId`                     |
//! | [`coord`]       | `Coord`, Manhattan distance, Moore neighbourhood      |
//! | [`direction`]   | `Direction` (8 canonical directions), `DirectionSet`  |
//! | [`signal`]      | `LightState` (red / green / idle)                     |
//! | [`time`]        | `Tick`, `SimConfig`                                   |
//! | [`rng`]         | `AgentRng` (per-vehicle), `SimRng` (scheduler)        |
//! | [`error`]       | `CtError`, `CtResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | `Serialize`/`Deserialize` on public types; `ct-grid`'s JSON loader needs it. |

pub mod coord;
pub mod direction;
pub mod error;
pub mod ids;
pub mod rng;
pub mod signal;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use coord::Coord;
pub use direction::{Direction, DirectionSet};
pub use error::{CtError, CtResult};
pub use ids::{GroupId, LightId, VehicleId};
pub use rng::{AgentRng, SimRng};
pub use signal::LightState;
pub use time::{SimConfig, Tick};
