//! `ct-agent` — the two agent kinds and the rules they act by.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                     |
//! |----------------|--------------------------------------------------------------|
//! | [`agent`]      | `AgentRef` (tagged roster entry)                             |
//! | [`context`]    | `NavContext<'a>`, `SignalView`                               |
//! | [`navigation`] | `NavigationPolicy` trait                                     |
//! | [`policy`]     | `UniformRandom`, `WeightedRandom` (default), `Greedy`        |
//! | [`vehicle`]    | `Vehicle`, `VehicleStatus`, `Fleet` (vehicles + their RNGs)  |
//! | [`light`]      | `TrafficLight`, `LightPool` (group state and negotiation)    |
//! | [`outcome`]    | `VehicleTurn`, `BlockReason`, `LightChange`                  |
//!
//! # Design notes
//!
//! Vehicles and lights never name each other's concrete types.  A vehicle
//! learns whether it may leave a light's cell through the [`SignalView`]
//! trait; a light counts vehicles through `Grid` occupancy.  Both act on one
//! shared `&mut Grid`, one turn at a time, so every turn sees the moves made
//! earlier in the same tick.

pub mod agent;
pub mod context;
pub mod light;
pub mod navigation;
pub mod outcome;
pub mod policy;
pub mod vehicle;


pub use agent::AgentRef;
pub use context::{NavContext, SignalView};
pub use light::{LightPool, TrafficLight};
pub use navigation::NavigationPolicy;
pub use outcome::{BlockReason, LightChange, VehicleTurn};
pub use policy::{Greedy, UniformRandom, WeightedRandom};
pub use vehicle::{Fleet, Vehicle, VehicleStatus};
