//! `ct-sim` — the tick scheduler for the rust_ct traffic simulator.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Watches   — congestion watches close or restore their directions.
//!   ② Roster    — every vehicle and every light instance as an AgentRef.
//!   ③ Shuffle   — SimRng permutes the roster.
//!   ④ Turns     — each agent acts once against the shared grid:
//!                   vehicle → arrival check, red-light gate, direction
//!                             choice with parking retry, occupancy gate
//!                   light   → count monitored zone, negotiate with
//!                             opposites, write group-wide state
//!   ⑤ Report    — TickSummary to the observer; Snapshot on intervals.
//! ```
//!
//! # Cargo features
//!
//! | Feature   | Effect                                       |
//! |-----------|----------------------------------------------|
//! | `fx-hash` | FxHash instead of SipHash for the group-name index. |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ct_agent::WeightedRandom;
//! use ct_core::SimConfig;
//! use ct_grid::Topology;
//! use ct_sim::{NoopObserver, SimBuilder};
//!
//! let topology = Topology::load_json(Path::new("map.json"))?;
//! let config = SimConfig { total_ticks: 200, seed: 42, vehicle_count: 10, ..SimConfig::default() };
//! let mut sim = SimBuilder::new(config, topology, WeightedRandom::default()).build()?;
//! sim.run(&mut NoopObserver);
//! println!("{}", sim.snapshot().to_json()?);
//! ```

pub mod builder;
pub mod error;
pub mod event;
pub mod observer;
pub mod sim;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use builder::{SimBuilder, VehicleSpec};
pub use error::{SimError, SimResult};
pub use event::{TickEvent, TickSummary};
pub use observer::{EventLog, NoopObserver, SimObserver};
pub use sim::Sim;
pub use snapshot::{Snapshot, VehiclePosition};
