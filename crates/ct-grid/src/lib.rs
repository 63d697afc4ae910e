//! `ct-grid` — the city grid, its occupancy index, and map topology.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`grid`]        | `Grid`, `Cell` (static flags + occupant handles)           |
//! | [`occupant`]    | `Occupant`, `AgentKind`, `OccupiesCell` capability trait   |
//! | [`directions`]  | `DirectionGraph`, `DirectionGraphBuilder`, `CongestionWatch` |
//! | [`parking`]     | `ParkingSet`                                               |
//! | [`topology`]    | `TopologyConfig` (serde), `Topology` (validated), `LightGroup` |
//! | [`loader`]      | `Topology::from_json_str` / `from_json_reader` / `load_json` |
//! | [`error`]       | `GridError`, `GridResult<T>`                               |
//!
//! # Ownership
//!
//! A `Topology` is consumed by `ct_sim::SimBuilder`, which moves the `Grid`
//! into the `Sim`.  From then on the `Sim` is the single writer; agent turn
//! functions borrow the grid mutably one at a time.

pub mod directions;
pub mod error;
pub mod grid;
pub mod loader;
pub mod occupant;
pub mod parking;
pub mod topology;


pub use directions::{CongestionWatch, DirectionGraph, DirectionGraphBuilder};
pub use error::{GridError, GridResult};
pub use grid::{Cell, Grid};
pub use occupant::{AgentKind, Occupant, OccupiesCell};
pub use parking::ParkingSet;
pub use topology::{DirectionLists, LightDef, LightGroup, Topology, TopologyConfig, WatchDef};
